use std::{
    fs,
    io::{ErrorKind, Write},
    path::PathBuf,
};

use crate::{error::Error, result::Result};

#[derive(serde::Deserialize, serde::Serialize, Clone, Debug)]
pub struct Config {
    pub camera: CameraConfig,
    pub detector: DetectorConfig,
    pub alert: AlertConfig,
    pub debug: DebugConfig,
}

#[derive(serde::Deserialize, serde::Serialize, Clone, Debug)]
pub struct CameraConfig {
    pub index: i32,
}

#[derive(serde::Deserialize, serde::Serialize, Clone, Debug)]
pub struct DetectorConfig {
    pub cascade_path: PathBuf,
    pub landmark_model_path: PathBuf,
    pub cuda: bool,
}

#[derive(serde::Deserialize, serde::Serialize, Clone, Debug)]
pub struct AlertConfig {
    /// Eyes scoring below this are counted as closed.
    pub close_threshold: f32,
    /// Consecutive closed frames before the alert fires.
    pub frame_threshold: u32,
    pub sound_path: PathBuf,
}

#[derive(serde::Deserialize, serde::Serialize, Clone, Debug)]
pub struct DebugConfig {
    pub write_eye_crops: bool,
    pub crop_prefix: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            camera: CameraConfig { index: 0 },
            detector: DetectorConfig {
                cascade_path: PathBuf::from("models/haarcascade_frontalface_default.xml"),
                landmark_model_path: PathBuf::from("models/landmarks_68.onnx"),
                cuda: false,
            },
            alert: AlertConfig {
                close_threshold: 0.3,
                frame_threshold: 15,
                sound_path: PathBuf::from("alert-sound.mp3"),
            },
            debug: DebugConfig {
                write_eye_crops: false,
                crop_prefix: "eye".into(),
            },
        }
    }
}

impl Config {
    pub fn get() -> Result<Config> {
        let config_dir = Self::get_config_dir()?;

        let config_str = match fs::read_to_string(config_dir.clone()) {
            Ok(config) => config,
            Err(err) => {
                if err.kind() == ErrorKind::NotFound {
                    return Self::upsert_new(config_dir);
                }
                return Ok(Self::default());
            }
        };

        match config::Config::builder()
            .add_source(config::File::from_str(
                &config_str,
                config::FileFormat::Json,
            ))
            .build()
            .map_err(Error::ConfigError)?
            .try_deserialize::<Config>()
        {
            Ok(cfg) => Ok(cfg),
            Err(_) => Self::upsert_new(config_dir),
        }
    }

    fn get_config_dir() -> Result<PathBuf> {
        Ok(std::env::current_dir()
            .map_err(|_| Error::UnknownError("failed to get current directory".into()))?
            .join("config.json"))
    }

    fn upsert_new(config_dir: PathBuf) -> Result<Config> {
        let config = Self::default();
        Self::upsert_config_file(config_dir, &config)?;
        Ok(config)
    }

    fn upsert_config_file(config_dir: PathBuf, config: &Config) -> Result<()> {
        fs::File::create(config_dir)
            .map_err(|err| Error::UnknownError(Box::new(err)))?
            .write_all(
                serde_json::to_string(config)
                    .map_err(|err| Error::UnknownError(Box::new(err)))?
                    .as_bytes(),
            )
            .map_err(|err| Error::UnknownError(Box::new(err)))
    }
}

#[cfg(test)]
mod test {
    use super::Config;

    #[test]
    fn default_config_survives_a_json_round_trip() {
        let serialized = serde_json::to_string(&Config::default()).expect("Failed to serialize");
        let parsed = config::Config::builder()
            .add_source(config::File::from_str(
                &serialized,
                config::FileFormat::Json,
            ))
            .build()
            .expect("Failed to build config")
            .try_deserialize::<Config>()
            .expect("Failed to deserialize");

        assert_eq!(parsed.alert.close_threshold, 0.3);
        assert_eq!(parsed.alert.frame_threshold, 15);
        assert_eq!(parsed.camera.index, 0);
        assert!(!parsed.debug.write_eye_crops);
    }
}
