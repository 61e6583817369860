use opencv::{core, imgcodecs, imgproc, prelude::*};

#[derive(Debug, Clone)]
pub struct Matrix(pub core::Mat);

impl Matrix {
    /// Single-channel 8-bit view of the frame, as the landmark locator expects.
    pub fn to_gray(&self) -> crate::Result<Self> {
        if self.depth() != core::CV_8U {
            return Err(crate::Error::InvalidFrameError(format!(
                "unsupported bit depth: {}",
                self.depth()
            )));
        }
        match self.channels() {
            1 => Ok(Self(self.0.clone())),
            3 => {
                let mut gray = core::Mat::default();
                imgproc::cvt_color(&self.0, &mut gray, imgproc::COLOR_BGR2GRAY, 0)
                    .map_err(crate::Error::CVError)?;
                Ok(Self(gray))
            }
            channels => Err(crate::Error::InvalidFrameError(format!(
                "unsupported channel count: {}",
                channels
            ))),
        }
    }

    /// Three-channel copy for drawing colored overlays on a gray frame.
    pub fn to_bgr(&self) -> crate::Result<Self> {
        match self.channels() {
            3 => Ok(Self(self.0.clone())),
            1 => {
                let mut bgr = core::Mat::default();
                imgproc::cvt_color(&self.0, &mut bgr, imgproc::COLOR_GRAY2BGR, 0)
                    .map_err(crate::Error::CVError)?;
                Ok(Self(bgr))
            }
            channels => Err(crate::Error::InvalidFrameError(format!(
                "unsupported channel count: {}",
                channels
            ))),
        }
    }

    pub fn resize(&self, size: (i32, i32)) -> crate::Result<Self> {
        let curr_size = self.size().map_err(crate::Error::CVError)?;
        if curr_size.width == size.0 && curr_size.height == size.1 {
            return Ok(Self(self.0.clone()));
        }
        let mut new_mat = core::Mat::default();
        imgproc::resize(
            &self.0,
            &mut new_mat,
            core::Size_::new(size.0, size.1),
            0.,
            0.,
            if curr_size.width > size.0 && curr_size.height > size.1 {
                imgproc::INTER_AREA
            } else {
                imgproc::INTER_LINEAR
            },
        )
        .map_err(crate::Error::CVError)?;
        Ok(Self(new_mat))
    }

    /// Copy of `rect` clipped to the frame bounds; `None` when the clipped
    /// region collapses to zero area.
    pub fn crop(&self, rect: core::Rect) -> crate::Result<Option<Self>> {
        let size = self.size().map_err(crate::Error::CVError)?;
        if size.width <= 0 || size.height <= 0 {
            return Ok(None);
        }
        let x1 = rect.x.clamp(0, size.width);
        let y1 = rect.y.clamp(0, size.height);
        let x2 = (rect.x + rect.width).clamp(0, size.width);
        let y2 = (rect.y + rect.height).clamp(0, size.height);
        if x2 <= x1 || y2 <= y1 {
            return Ok(None);
        }
        let roi = core::Mat::roi(&self.0, core::Rect::new(x1, y1, x2 - x1, y2 - y1))
            .map_err(crate::Error::CVError)?;
        Ok(Some(Self(roi.try_clone().map_err(crate::Error::CVError)?)))
    }

    pub fn write(&self, path: &str) -> crate::Result<()> {
        let written = imgcodecs::imwrite(path, &self.0, &core::Vector::<i32>::new())
            .map_err(crate::Error::CVError)?;
        if !written {
            return Err(crate::Error::InvalidFrameError(format!(
                "failed to encode {}",
                path
            )));
        }
        Ok(())
    }
}

impl From<core::Mat> for Matrix {
    fn from(value: core::Mat) -> Self {
        Self(value)
    }
}

impl std::ops::Deref for Matrix {
    type Target = core::Mat;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl std::ops::DerefMut for Matrix {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

#[cfg(test)]
mod test {
    use opencv::core::{self, MatTraitConst};

    use super::Matrix;

    fn test_matrix(rows: i32, cols: i32, typ: i32) -> Matrix {
        Matrix::from(
            core::Mat::new_rows_cols_with_default(rows, cols, typ, core::Scalar::all(100.))
                .expect("Failed to create test matrix"),
        )
    }

    #[test]
    fn converts_bgr_frames_to_single_channel() {
        let gray = test_matrix(4, 6, core::CV_8UC3)
            .to_gray()
            .expect("Failed to convert to gray");
        assert_eq!(gray.channels(), 1);
        assert_eq!(gray.size().unwrap(), core::Size::new(6, 4));
    }

    #[test]
    fn rejects_unsupported_channel_counts() {
        assert!(test_matrix(4, 4, core::CV_8UC2).to_gray().is_err());
    }

    #[test]
    fn rejects_non_8bit_frames() {
        assert!(test_matrix(4, 4, core::CV_32FC3).to_gray().is_err());
    }

    #[test]
    fn crop_is_clipped_to_the_frame_bounds() {
        let matrix = test_matrix(100, 200, core::CV_8UC1);
        let crop = matrix
            .crop(core::Rect::new(150, -20, 500, 60))
            .expect("Failed to crop")
            .expect("Clipped region should not collapse");
        let size = crop.size().unwrap();
        assert_eq!(size, core::Size::new(50, 40));
    }

    #[test]
    fn crop_outside_the_frame_produces_nothing() {
        let matrix = test_matrix(100, 200, core::CV_8UC1);
        assert!(matrix
            .crop(core::Rect::new(300, 10, 50, 50))
            .expect("Failed to crop")
            .is_none());
    }

    #[test]
    fn zero_area_crop_produces_nothing() {
        let matrix = test_matrix(100, 200, core::CV_8UC1);
        assert!(matrix
            .crop(core::Rect::new(10, 10, 0, 40))
            .expect("Failed to crop")
            .is_none());
    }

    #[test]
    fn matrix_contains_correct_bounds_on_resize() {
        let resized = test_matrix(200, 300, core::CV_8UC3)
            .resize((150, 125))
            .expect("Failed to resize");
        let size = resized.size().unwrap();
        assert_eq!(size.width * size.height, 150 * 125);
    }
}
