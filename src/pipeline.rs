use std::time::{Duration, Instant};

use anyhow::Result;
use image::RgbImage;

use crate::classifier::Gesture;
use crate::poses;
use crate::types::LandmarkFrame;

/// A landmark source: one camera frame in, one landmark frame out.
pub trait Pipeline: Send {
    fn name(&self) -> String;
    fn process(&mut self, frame: &RgbImage) -> Result<LandmarkFrame>;
}

/// Scripted hand used when no tracking model is available.
///
/// Types `3 + 4 =`, shows the result, holds a fist to clear, then loops.
pub struct SimulatedPipeline {
    script: Vec<(Gesture, Duration)>,
    started: Option<Instant>,
}

const HOLD: Duration = Duration::from_millis(900);
const GAP: Duration = Duration::from_millis(500);

impl SimulatedPipeline {
    pub fn new() -> Self {
        let mut script = Vec::new();
        for gesture in [Gesture::Three, Gesture::ThumbsUp, Gesture::Four, Gesture::FlatPalm] {
            script.push((gesture, HOLD));
            script.push((Gesture::None, GAP));
        }
        script.push((Gesture::None, Duration::from_millis(1500)));
        script.push((Gesture::Fist, Duration::from_millis(1600)));
        script.push((Gesture::None, Duration::from_millis(1000)));
        Self {
            script,
            started: None,
        }
    }

    fn cycle(&self) -> Duration {
        self.script.iter().map(|(_, d)| *d).sum()
    }

    /// The gesture scripted at `elapsed` since the first frame.
    pub fn gesture_at(&self, elapsed: Duration) -> Gesture {
        let cycle = self.cycle();
        if cycle.is_zero() {
            return Gesture::None;
        }
        let mut t = Duration::from_nanos((elapsed.as_nanos() % cycle.as_nanos()) as u64);
        for (gesture, length) in &self.script {
            if t < *length {
                return *gesture;
            }
            t -= *length;
        }
        Gesture::None
    }

    pub fn frame_at(&self, elapsed: Duration) -> LandmarkFrame {
        poses::hand_for(self.gesture_at(elapsed))
            .map(LandmarkFrame::Hand)
            .unwrap_or(LandmarkFrame::NoHand)
    }
}

impl Default for SimulatedPipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl Pipeline for SimulatedPipeline {
    fn name(&self) -> String {
        "Simulated hand (no model)".to_string()
    }

    fn process(&mut self, _frame: &RgbImage) -> Result<LandmarkFrame> {
        let started = *self.started.get_or_insert_with(Instant::now);
        Ok(self.frame_at(started.elapsed()))
    }
}
