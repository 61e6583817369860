use std::{thread, time::Duration};

use opencv::highgui;

use crate::{
    alert::Alarm,
    cv::{Matrix, CV},
    model::Model,
    setting::Config,
    Error, Result,
};

pub use estimator::{AlertLevel, DrowsinessState, Estimator};

pub mod estimator;
pub mod overlay;

const WINDOW_NAME: &str = "vigil";
const ESC_KEY: i32 = 27;
// back off briefly when the device momentarily returns no data
const EMPTY_READ_BACKOFF: Duration = Duration::from_millis(50);

/// Owns the whole per-frame pipeline and the only cross-frame state.
pub struct Monitor {
    cv: CV,
    model: Model,
    estimator: Estimator,
    alarm: Alarm,
    state: DrowsinessState,
    config: Config,
}

impl Monitor {
    #[tracing::instrument(name = "Initializing monitor", skip(config), err)]
    pub fn new(config: Config) -> Result<Self> {
        Ok(Self {
            cv: CV::new(config.camera.index)?,
            model: Model::new(&config.detector)?,
            estimator: Estimator::new(&config.alert),
            alarm: Alarm::new(&config.alert.sound_path),
            state: DrowsinessState::default(),
            config,
        })
    }

    pub fn run(&mut self) -> Result<()> {
        tracing::info!(
            close_threshold = self.config.alert.close_threshold,
            frame_threshold = self.config.alert.frame_threshold,
            "starting capture loop"
        );
        highgui::named_window(WINDOW_NAME, highgui::WINDOW_AUTOSIZE).map_err(Error::CVError)?;

        let result = self.spin();
        self.shutdown();
        result
    }

    fn spin(&mut self) -> Result<()> {
        loop {
            match self.cv.next_frame()? {
                Some(frame) => {
                    // per-frame failures never end the loop
                    if let Err(err) = self.step(&frame) {
                        tracing::warn!(error = %err, "skipping frame");
                    }
                }
                None => {
                    tracing::warn!("failed to grab frame, retrying");
                    thread::sleep(EMPTY_READ_BACKOFF);
                }
            }
            if highgui::wait_key(1).map_err(Error::CVError)? == ESC_KEY {
                return Ok(());
            }
        }
    }

    fn step(&mut self, frame: &Matrix) -> Result<()> {
        let gray = frame.to_gray()?;
        let landmarks = self.model.locate(&gray)?;

        let level = self.estimator.update(landmarks.as_ref(), &mut self.state);
        match level {
            AlertLevel::Warn => self.alarm.start(),
            AlertLevel::None => self.alarm.stop(),
        }

        let mut display = gray.to_bgr()?;
        overlay::draw(&mut display, &self.state, level, landmarks.as_ref())?;
        if let Some(landmarks) = &landmarks {
            if self.config.debug.write_eye_crops {
                overlay::write_eye_crops(frame, landmarks, &self.config.debug.crop_prefix)?;
            }
        }
        highgui::imshow(WINDOW_NAME, &display.0).map_err(Error::CVError)
    }

    // alarm first, then the capture handle
    fn shutdown(&mut self) {
        self.alarm.stop();
        if let Err(err) = self.cv.release() {
            tracing::warn!(error = %err, "failed to release capture device");
        }
        let _ = highgui::destroy_all_windows();
    }
}
