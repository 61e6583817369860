use opencv::{core, objdetect, prelude::*};

use landmark_model::LandmarkModel;

use crate::{cv::Matrix, setting::DetectorConfig, Error, Result};
pub use data::{EyeRegion, Landmarks, TensorData, LANDMARKS_LEN};

mod landmark_model;

pub mod data;

// https://onnxruntime.ai/docs/install/
pub struct Model {
    faces: objdetect::CascadeClassifier,
    landmarks: LandmarkModel,
}

impl Model {
    #[tracing::instrument(name = "Initializing detector models", skip(config), err)]
    pub fn new(config: &DetectorConfig) -> Result<Self> {
        if !config.cascade_path.exists() {
            return Err(Error::UnknownError(
                format!(
                    "face cascade not found at {}",
                    config.cascade_path.display()
                )
                .into(),
            ));
        }
        let cascade_path = config.cascade_path.to_str().ok_or_else(|| {
            Error::UnknownError("face cascade path is not valid utf-8".into())
        })?;

        Ok(Self {
            faces: objdetect::CascadeClassifier::new(cascade_path).map_err(Error::CVError)?,
            landmarks: LandmarkModel::new(config.landmark_model_path.clone())?,
        })
    }

    /// Zero-or-one landmark set for an 8-bit single-channel frame. When
    /// several faces are present the largest bounding box wins.
    pub fn locate(&mut self, gray: &Matrix) -> Result<Option<Landmarks>> {
        let mut faces = core::Vector::<core::Rect>::new();
        self.faces
            .detect_multi_scale(
                &gray.0,
                &mut faces,
                1.1,
                3,
                0,
                core::Size::new(30, 30),
                core::Size::new(0, 0),
            )
            .map_err(Error::CVError)?;

        let Some(face) = faces.iter().max_by_key(|rect| rect.area()) else {
            return Ok(None);
        };
        self.landmarks.run(gray, face).map(Some)
    }
}

#[tracing::instrument(err)]
pub fn register_ort(config: &DetectorConfig) -> Result<()> {
    let onnx_env = ort::init().with_name("vigil_landmark_locator");

    let onnx_env = match config.cuda {
        true => onnx_env.with_execution_providers([ort::CUDAExecutionProvider::default()
            .build()
            .error_on_failure()]),
        false => onnx_env,
    };

    onnx_env.commit().map_err(Error::ModelError)?;
    Ok(())
}

fn start_session_from_file(onnx_path: std::path::PathBuf) -> Result<ort::Session> {
    ort::Session::builder()
        .map_err(Error::ModelError)?
        .with_intra_threads(4)
        .map_err(Error::ModelError)?
        .commit_from_file(onnx_path)
        .map_err(Error::ModelError)
}
