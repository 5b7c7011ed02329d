//! Input sources feeding the sensor store.
//!
//! Current input sources:
//! - `mqtt`: sensor topics published by the window controller

pub mod mqtt;
