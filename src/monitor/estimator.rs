use crate::{model::Landmarks, setting::AlertConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertLevel {
    None,
    Warn,
}

/// The only state surviving across frames.
#[derive(Debug, Clone, Copy, Default)]
pub struct DrowsinessState {
    pub consecutive_closed: u32,
    pub score: f32,
}

pub struct Estimator {
    close_threshold: f32,
    frame_threshold: u32,
}

impl Estimator {
    pub fn new(config: &AlertConfig) -> Self {
        Self {
            close_threshold: config.close_threshold,
            frame_threshold: config.frame_threshold,
        }
    }

    /// Scores the frame and advances the closed-eye counter.
    ///
    /// A frame with no face freezes the counter rather than resetting it, so
    /// looking away from the camera neither feeds nor clears a pending alert.
    /// Degenerate eye geometry is skipped the same way.
    pub fn update(
        &self,
        landmarks: Option<&Landmarks>,
        state: &mut DrowsinessState,
    ) -> AlertLevel {
        let Some(landmarks) = landmarks else {
            return self.level(state);
        };
        let (Some(left), Some(right)) = (
            landmarks.left_eye().aspect_ratio(),
            landmarks.right_eye().aspect_ratio(),
        ) else {
            tracing::warn!("degenerate eye geometry, skipping score update");
            return self.level(state);
        };

        state.score = (left + right) / 2.;
        if state.score < self.close_threshold {
            state.consecutive_closed += 1;
        } else {
            if state.consecutive_closed != 0 {
                tracing::debug!(frames = state.consecutive_closed, "closed-eye counter reset");
            }
            state.consecutive_closed = 0;
        }
        self.level(state)
    }

    fn level(&self, state: &DrowsinessState) -> AlertLevel {
        if state.consecutive_closed >= self.frame_threshold {
            AlertLevel::Warn
        } else {
            AlertLevel::None
        }
    }
}
