use opencv::{core, imgproc, prelude::*};

use crate::{
    cv::Matrix,
    model::{EyeRegion, Landmarks},
    Error, Result,
};

use super::estimator::{AlertLevel, DrowsinessState};

pub fn draw(
    display: &mut Matrix,
    state: &DrowsinessState,
    level: AlertLevel,
    landmarks: Option<&Landmarks>,
) -> Result<()> {
    if let Some(landmarks) = landmarks {
        draw_eye(display, &landmarks.left_eye())?;
        draw_eye(display, &landmarks.right_eye())?;
    }

    let size = display.size().map_err(Error::CVError)?;
    imgproc::put_text(
        &mut display.0,
        &format!("EAR: {:.2}", state.score),
        core::Point::new(10, size.height - 10),
        imgproc::FONT_HERSHEY_SIMPLEX,
        0.6,
        core::Scalar::new(255., 255., 0., 0.),
        2,
        imgproc::LINE_8,
        false,
    )
    .map_err(Error::CVError)?;

    if level == AlertLevel::Warn {
        imgproc::put_text(
            &mut display.0,
            "DROWSY! ALERT!",
            core::Point::new(10, 30),
            imgproc::FONT_HERSHEY_SIMPLEX,
            0.8,
            core::Scalar::new(0., 0., 255., 0.),
            2,
            imgproc::LINE_8,
            false,
        )
        .map_err(Error::CVError)?;
    }
    Ok(())
}

fn draw_eye(display: &mut Matrix, eye: &EyeRegion) -> Result<()> {
    let points: core::Vector<core::Point> = eye
        .iter()
        .map(|[x, y]| core::Point::new(x.round() as i32, y.round() as i32))
        .collect();
    imgproc::polylines(
        &mut display.0,
        &points,
        true,
        core::Scalar::new(0., 255., 0., 0.),
        1,
        imgproc::LINE_8,
        0,
    )
    .map_err(Error::CVError)
}

/// Clipped crops of both eye regions, overwritten each detection cycle.
/// Regions that collapse after clipping write nothing.
pub fn write_eye_crops(frame: &Matrix, landmarks: &Landmarks, prefix: &str) -> Result<()> {
    write_crop(frame, &landmarks.left_eye(), &format!("{}-left.jpg", prefix))?;
    write_crop(frame, &landmarks.right_eye(), &format!("{}-right.jpg", prefix))
}

fn write_crop(frame: &Matrix, eye: &EyeRegion, path: &str) -> Result<()> {
    let Some(crop) = frame.crop(eye.bounding_box())? else {
        return Ok(());
    };
    crop.write(path)
}

#[cfg(test)]
mod test {
    use opencv::core::{self, MatTraitConst};

    use crate::{
        cv::Matrix,
        model::{Landmarks, LANDMARKS_LEN},
    };

    use super::{draw, AlertLevel, DrowsinessState};

    #[test]
    fn drawing_marks_the_display_frame() {
        let mut display = Matrix::from(
            core::Mat::new_rows_cols_with_default(240, 320, core::CV_8UC3, core::Scalar::all(0.))
                .expect("Failed to create display"),
        );
        let mut points = [[100., 100.]; LANDMARKS_LEN];
        for (idx, point) in points.iter_mut().enumerate().take(48).skip(36) {
            point[0] = 100. + (idx - 36) as f32 * 4.;
            point[1] = 100. + (idx % 2) as f32 * 6.;
        }
        let landmarks = Landmarks(points);

        draw(
            &mut display,
            &DrowsinessState {
                consecutive_closed: 20,
                score: 0.21,
            },
            AlertLevel::Warn,
            Some(&landmarks),
        )
        .expect("Failed to draw");

        let unmarked = core::Mat::new_rows_cols_with_default(
            240,
            320,
            core::CV_8UC3,
            core::Scalar::all(0.),
        )
        .expect("Failed to create reference");
        let mut diff = core::Mat::default();
        core::absdiff(&display.0, &unmarked, &mut diff).expect("Failed to diff");
        assert!(core::count_non_zero(&diff.reshape(1, 0).expect("Failed to flatten")).unwrap() > 0);
    }
}
