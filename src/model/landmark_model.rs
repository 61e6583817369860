use opencv::{core, prelude::*};

use crate::{cv::Matrix, Error, Result};

use super::data::{Landmarks, TensorData, LANDMARKS_LEN};

// square crop side the landmark net was trained on
const INPUT_SIDE: usize = 112;

const INPUT_NAME: &str = "input";
const OUTPUT_NAME: &str = "output";

// [1, 3, 112, 112] in | 136 crop-normalized coordinates out
pub struct LandmarkModel(pub ort::Session);

impl LandmarkModel {
    #[tracing::instrument(name = "Initialize landmark model", err)]
    pub fn new(onnx_path: std::path::PathBuf) -> Result<Self> {
        if !onnx_path.exists() {
            return Err(Error::UnknownError(
                format!(
                    "landmark model not found at {}; make sure the .onnx file is present and uncorrupted",
                    onnx_path.display()
                )
                .into(),
            ));
        }
        Ok(Self(super::start_session_from_file(onnx_path)?))
    }

    pub fn run(&self, gray: &Matrix, face: core::Rect) -> Result<Landmarks> {
        let Some(roi) = gray.crop(face)? else {
            return Err(Error::InvalidFrameError(
                "face region lies outside the frame".into(),
            ));
        };
        let input = Self::to_tensor(&roi.resize((INPUT_SIDE as i32, INPUT_SIDE as i32))?)?;

        let outputs = self
            .0
            .run(ort::inputs![INPUT_NAME => input.view()].map_err(Error::ModelError)?)
            .map_err(Error::ModelError)?;
        let output = outputs[OUTPUT_NAME]
            .try_extract_tensor::<f32>()
            .map_err(Error::ModelError)?;

        let coords: Vec<f32> = output.iter().copied().collect();
        if coords.len() != LANDMARKS_LEN * 2 {
            return Err(Error::InvalidModelIOError(format!(
                "expected {} landmark coordinates, got {}",
                LANDMARKS_LEN * 2,
                coords.len()
            )));
        }

        // crop-normalized -> frame pixel coordinates
        Landmarks::try_from(
            coords
                .chunks_exact(2)
                .map(|point| {
                    [
                        face.x as f32 + point[0] * face.width as f32,
                        face.y as f32 + point[1] * face.height as f32,
                    ]
                })
                .collect::<Vec<[f32; 2]>>(),
        )
    }

    fn to_tensor(roi: &Matrix) -> Result<TensorData> {
        let bytes = roi.data_bytes().map_err(Error::CVError)?;
        // single gray channel replicated across the three input planes
        Ok(ndarray::Array::from_shape_fn(
            (1, 3, INPUT_SIDE, INPUT_SIDE),
            |(_, _, y, x)| bytes[y * INPUT_SIDE + x] as f32 / 255.,
        ))
    }
}
