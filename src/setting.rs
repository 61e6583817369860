pub use self::config::{AlertConfig, CameraConfig, Config, DebugConfig, DetectorConfig};

pub mod config;
