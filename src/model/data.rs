pub use landmarks::{EyeRegion, Landmarks, LANDMARKS_LEN};

pub mod landmarks;

pub type TensorData = ndarray::Array<f32, ndarray::Dim<[usize; 4]>>;
