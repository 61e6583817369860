use opencv::{core, prelude::*, videoio};

pub use matrix::Matrix;

pub mod matrix;

pub struct CV(videoio::VideoCapture);

impl CV {
    pub fn new(index: i32) -> crate::Result<Self> {
        //https://docs.opencv.org/3.4/d4/d15/group__videoio__flags__base.html
        let cam =
            videoio::VideoCapture::new(index, videoio::CAP_ANY).map_err(crate::Error::CVError)?;

        if !cam.is_opened().map_err(crate::Error::CVError)? {
            return Err(crate::Error::UnknownError(
                format!(
                    "Unable to open camera device {}; try another index or check camera permissions",
                    index
                )
                .into(),
            ));
        }

        Ok(Self(cam))
    }

    /// `Ok(None)` is a transient empty read; the caller backs off and retries.
    pub fn next_frame(&mut self) -> crate::Result<Option<Matrix>> {
        let mut frame = core::Mat::default();
        let grabbed = self.read(&mut frame).map_err(crate::Error::CVError)?;
        if !grabbed || frame.size().map_err(crate::Error::CVError)?.width <= 0 {
            return Ok(None);
        }
        Ok(Some(Matrix::from(frame)))
    }

    pub fn release(&mut self) -> crate::Result<()> {
        self.0.release().map_err(crate::Error::CVError)
    }
}

impl std::ops::Deref for CV {
    type Target = videoio::VideoCapture;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl std::ops::DerefMut for CV {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}
