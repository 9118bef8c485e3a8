//! Core types for the Nightpulse analytics pipeline: the event taxonomy,
//! session identity, device classification, and dashboard metric shapes.

pub mod device;
pub mod error;
pub mod metrics;
pub mod record;
pub mod session;
pub mod taxonomy;

pub use device::{DeviceClass, DeviceClassifier};
pub use error::{Error, Result};
pub use metrics::*;
pub use record::*;
pub use session::*;
pub use taxonomy::*;
