//! Offline replay of recorded landmark traces through a gesture session.
//!
//! A trace is a JSON array of frames:
//! `[{ "t_ms": 0, "landmarks": [[x, y, z], ...] }, { "t_ms": 33, "landmarks": null }]`

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::debounce::GestureEvent;
use crate::session::{GestureSession, SessionConfig, Snapshot};
use crate::types::{LandmarkFrame, Point3D};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceFrame {
    /// Capture time in milliseconds from the start of the trace.
    pub t_ms: u64,
    /// `None` when no hand was visible.
    pub landmarks: Option<Vec<[f32; 3]>>,
}

impl TraceFrame {
    pub fn to_frame(&self) -> LandmarkFrame {
        match &self.landmarks {
            None => LandmarkFrame::NoHand,
            Some(points) => {
                let points: Vec<Point3D> = points.iter().copied().map(Point3D::from).collect();
                LandmarkFrame::from_points(&points)
            }
        }
    }
}

/// Events produced while replaying, with the frame time they fired at.
#[derive(Debug, Clone)]
pub struct ReplayOutcome {
    pub events: Vec<(u64, GestureEvent)>,
    pub snapshot: Snapshot,
}

pub fn load_trace(path: &Path) -> Result<Vec<TraceFrame>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read trace {}", path.display()))?;
    let frames: Vec<TraceFrame> = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse trace {}", path.display()))?;
    Ok(frames)
}

/// Step a fresh session through `frames` using their recorded timestamps.
pub fn run_trace(frames: &[TraceFrame], config: SessionConfig) -> ReplayOutcome {
    let mut session = GestureSession::new(config);
    session.start();

    let mut events = Vec::new();
    let mut prev_t: Option<u64> = None;
    for frame in frames {
        let dt = match prev_t {
            Some(prev) if frame.t_ms < prev => {
                warn!("Trace time went backwards at {} ms", frame.t_ms);
                0
            }
            Some(prev) => frame.t_ms - prev,
            None => 0,
        };
        prev_t = Some(prev_t.map_or(frame.t_ms, |p| p.max(frame.t_ms)));

        let report = session.step_elapsed(&frame.to_frame(), Duration::from_millis(dt));
        if let Some(event) = report.event {
            info!("{:>6} ms  {:?}", frame.t_ms, event);
            events.push((frame.t_ms, event));
        }
    }

    session.stop();
    ReplayOutcome {
        events,
        snapshot: session.snapshot(),
    }
}
