//! Per-frame finger state derived from raw hand landmarks.
//!
//! Everything here is a pure function of a single frame. There is no memory
//! of earlier frames; temporal filtering lives in [`crate::debounce`].

use crate::classifier::GestureConfig;
use crate::types::{Finger, HandJoint, HandLandmarks, Point3D};

/// Which way the thumb tip points relative to its MCP joint, in image space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ThumbDirection {
    Up,
    Down,
    Level,
}

/// Extension flags for the five fingers plus orientation signals.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FingerState {
    /// Extended flags indexed thumb, index, middle, ring, pinky.
    pub extended: [bool; 5],
    /// Signed angle (degrees) of the wrist -> middle MCP axis from image-up.
    /// 0 is fingers up, +/-180 is fingers down. Not used by the classifier;
    /// the HUD shows it as hand tilt.
    pub palm_angle_deg: f32,
    /// |z(wrist) - z(middle MCP)|. Small when the palm faces the camera flat.
    pub palm_depth: f32,
    /// Index finger points straight up.
    pub index_vertical: bool,
    pub thumb_direction: ThumbDirection,
    /// Image-plane distance between index and middle fingertips.
    pub index_middle_spread: f32,
    /// Image-plane distance between index and pinky fingertips.
    pub index_pinky_span: f32,
}

impl FingerState {
    pub fn is_extended(&self, finger: Finger) -> bool {
        self.extended[finger as usize]
    }

    pub fn extended_count(&self) -> usize {
        self.extended.iter().filter(|e| **e).count()
    }

    /// True when exactly `fingers` are extended and every other finger is folded.
    pub fn only(&self, fingers: &[Finger]) -> bool {
        Finger::ALL
            .iter()
            .all(|f| self.is_extended(*f) == fingers.contains(f))
    }

    /// Derive the finger state of one hand.
    pub fn extract(hand: &HandLandmarks, config: &GestureConfig) -> Self {
        let wrist = hand.joint(HandJoint::Wrist);
        let middle_mcp = hand.joint(HandJoint::MiddleMcp);

        let mut extended = [false; 5];
        extended[Finger::Thumb as usize] = thumb_extended(hand, config);
        for finger in [Finger::Index, Finger::Middle, Finger::Ring, Finger::Pinky] {
            extended[finger as usize] = finger_extended(hand, finger, config);
        }

        let axis_x = middle_mcp.x - wrist.x;
        let axis_y = middle_mcp.y - wrist.y;
        // y grows downward, so image-up is -y.
        let palm_angle_deg = axis_x.atan2(-axis_y).to_degrees();

        let index_tip = hand.joint(HandJoint::IndexTip);
        let index_pip = hand.joint(HandJoint::IndexPip);
        let dx = (index_tip.x - index_pip.x).abs();
        let dy = (index_tip.y - index_pip.y).abs();
        let index_vertical =
            index_tip.y < index_pip.y && dx < dy * config.index_vertical_ratio;

        let thumb_tip = hand.joint(HandJoint::ThumbTip);
        let thumb_mcp = hand.joint(HandJoint::ThumbMcp);
        let rise = thumb_mcp.y - thumb_tip.y;
        let thumb_direction = if rise > config.thumb_direction_margin {
            ThumbDirection::Up
        } else if rise < -config.thumb_direction_margin {
            ThumbDirection::Down
        } else {
            ThumbDirection::Level
        };

        let middle_tip = hand.joint(HandJoint::MiddleTip);
        let pinky_tip = hand.joint(HandJoint::PinkyTip);

        Self {
            extended,
            palm_angle_deg,
            palm_depth: (wrist.z - middle_mcp.z).abs(),
            index_vertical,
            thumb_direction,
            index_middle_spread: index_tip.distance_2d(&middle_tip),
            index_pinky_span: index_tip.distance_2d(&pinky_tip),
        }
    }
}

/// Tip must be farther from the wrist than the PIP joint by the configured
/// ratio; partial curls land below it.
fn finger_extended(hand: &HandLandmarks, finger: Finger, config: &GestureConfig) -> bool {
    let wrist = hand.joint(HandJoint::Wrist);
    let [_, pip, _, tip] = finger.joints();
    let tip_dist = hand.joint(tip).distance(&wrist);
    let pip_dist = hand.joint(pip).distance(&wrist);
    tip_dist > pip_dist * config.finger_extension_ratio
}

/// Lateral test: distance of the thumb from the wrist -> middle MCP axis.
fn thumb_extended(hand: &HandLandmarks, config: &GestureConfig) -> bool {
    let wrist = hand.joint(HandJoint::Wrist);
    let middle_mcp = hand.joint(HandJoint::MiddleMcp);
    let palm_len = wrist.distance_2d(&middle_mcp);
    if palm_len <= f32::EPSILON {
        return false;
    }

    let tip = lateral_offset(&hand.joint(HandJoint::ThumbTip), &wrist, &middle_mcp, palm_len);
    let ip = lateral_offset(&hand.joint(HandJoint::ThumbIp), &wrist, &middle_mcp, palm_len);
    tip > ip && tip >= palm_len * config.thumb_lateral_ratio
}

/// Perpendicular image-plane distance from `p` to the line through `a` and `b`.
fn lateral_offset(p: &Point3D, a: &Point3D, b: &Point3D, len: f32) -> f32 {
    let cross = (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x);
    cross.abs() / len
}
