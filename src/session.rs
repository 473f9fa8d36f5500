//! One gesture-calculator session: classifier, debounce engine and
//! calculator wired together, stepped once per frame.

use std::time::{Duration, Instant};

use tracing::{info, warn};

use crate::calculator::Calculator;
use crate::classifier::{Gesture, GestureClassifier, GestureConfig};
use crate::debounce::{DebounceConfig, DebounceEngine, GestureEvent};
use crate::fingers::FingerState;
use crate::types::LandmarkFrame;

#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub gesture: GestureConfig,
    pub debounce: DebounceConfig,
    pub history_limit: usize,
    /// History entries included in a snapshot.
    pub history_shown: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            gesture: GestureConfig::default(),
            debounce: DebounceConfig::default(),
            history_limit: 10,
            history_shown: 3,
        }
    }
}

/// What happened on one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameReport {
    pub gesture: Gesture,
    pub fingers: Option<FingerState>,
    pub event: Option<GestureEvent>,
}

impl FrameReport {
    fn idle() -> Self {
        Self {
            gesture: Gesture::None,
            fingers: None,
            event: None,
        }
    }
}

/// Read-only view handed to the renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub display_text: String,
    pub expression_text: String,
    /// Most recent first.
    pub history: Vec<String>,
    pub last_confirmed: Option<Gesture>,
    pub current_gesture: Gesture,
    pub hold_progress: f32,
    pub error: bool,
    /// Palm tilt of the last frame's hand, if one was seen.
    pub palm_angle_deg: Option<f32>,
}

pub struct GestureSession {
    config: SessionConfig,
    classifier: GestureClassifier,
    debounce: DebounceEngine,
    calculator: Calculator,
    running: bool,
    last_step: Option<Instant>,
    last_fingers: Option<FingerState>,
}

impl GestureSession {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            classifier: GestureClassifier::new(config.gesture.clone()),
            debounce: DebounceEngine::new(config.debounce),
            calculator: Calculator::new(config.history_limit),
            running: false,
            last_step: None,
            last_fingers: None,
            config,
        }
    }

    pub fn start(&mut self) {
        if !self.running {
            info!("Gesture session started");
        }
        self.running = true;
        self.last_step = None;
    }

    /// Stop between frames. Calculator and debounce state are kept; the
    /// in-progress hold is dropped so a restart cannot fire a stale event.
    pub fn stop(&mut self) {
        if self.running {
            info!("Gesture session stopped");
        }
        self.running = false;
        self.last_step = None;
        self.last_fingers = None;
        self.debounce.reset();
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Step with a wall-clock frame timestamp. The first frame after start
    /// counts as zero elapsed time.
    pub fn step(&mut self, frame: &LandmarkFrame, now: Instant) -> FrameReport {
        let dt = self
            .last_step
            .map(|prev| now.saturating_duration_since(prev))
            .unwrap_or(Duration::ZERO);
        if self.running {
            self.last_step = Some(now);
        }
        self.step_elapsed(frame, dt)
    }

    /// Step with an explicit elapsed time since the previous frame.
    pub fn step_elapsed(&mut self, frame: &LandmarkFrame, dt: Duration) -> FrameReport {
        if !self.running {
            return FrameReport::idle();
        }

        let (gesture, fingers) = self.classifier.classify_frame(frame);
        let event = self.debounce.update(gesture, dt);
        self.last_fingers = fingers;

        if let Some(event) = event {
            info!("Event: {:?} -> display {:?}", event, self.calculator.display_text());
            if let Some(command) = event.command() {
                self.calculator.apply(command);
                if let Some(e) = self.calculator.error() {
                    warn!("Calculator error: {e}");
                }
            }
        }

        FrameReport {
            gesture,
            fingers,
            event,
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            display_text: self.calculator.display_text(),
            expression_text: self.calculator.expression_text(),
            history: self.calculator.history(self.config.history_shown),
            last_confirmed: self.debounce.last_confirmed(),
            current_gesture: self.debounce.current(),
            hold_progress: self.debounce.hold_progress(),
            error: self.calculator.error().is_some(),
            palm_angle_deg: self.last_fingers.map(|f| f.palm_angle_deg),
        }
    }

    pub fn calculator(&self) -> &Calculator {
        &self.calculator
    }

    pub fn debounce(&self) -> &DebounceEngine {
        &self.debounce
    }
}

impl Default for GestureSession {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}
