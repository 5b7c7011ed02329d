//! Control commands forwarded from the HTTP API to the window actuator.

pub mod gateway;

pub use gateway::{CommandAccepted, CommandGateway, ControlAction, Publisher};
