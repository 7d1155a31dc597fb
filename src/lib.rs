//! Live slideshow server.
//!
//! Holds a single shared slide, lets a producer replace it over HTTP and
//! pushes every change to all connected viewers over WebSocket.

pub mod config;
pub mod error;
pub mod server;
pub mod slideshow;

pub use error::{Error, Result};
