pub mod alert;
pub mod cv;
pub mod error;
pub mod model;
pub mod monitor;
pub mod result;
pub mod setting;
pub mod tracing;

pub use error::Error;
pub use result::Result;
