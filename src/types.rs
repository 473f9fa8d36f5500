use thiserror::Error;
use tracing::warn;

/// Number of landmarks reported for one tracked hand.
pub const LANDMARK_COUNT: usize = 21;

/// Represents a single 3D point
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point3D {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Point3D {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn distance(&self, other: &Point3D) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        let dz = other.z - self.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    /// Distance in the image plane, ignoring depth.
    pub fn distance_2d(&self, other: &Point3D) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }
}

impl From<[f32; 3]> for Point3D {
    fn from([x, y, z]: [f32; 3]) -> Self {
        Self { x, y, z }
    }
}

/// Axis-aligned box in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// Square of side `scale` times the longer edge, centred on this box and
    /// clipped to a `frame_w` x `frame_h` frame.
    pub fn expand_square(&self, scale: f32, frame_w: f32, frame_h: f32) -> Rect {
        let side = self.width.max(self.height) * scale;
        let cx = self.x + self.width / 2.0;
        let cy = self.y + self.height / 2.0;
        let x = (cx - side / 2.0).max(0.0);
        let y = (cy - side / 2.0).max(0.0);
        let right = (cx + side / 2.0).min(frame_w);
        let bottom = (cy + side / 2.0).min(frame_h);
        Rect::new(x, y, (right - x).max(0.0), (bottom - y).max(0.0))
    }
}

/// The 21 hand landmarks, in the order the tracking model reports them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandJoint {
    Wrist,
    ThumbCmc,
    ThumbMcp,
    ThumbIp,
    ThumbTip,
    IndexMcp,
    IndexPip,
    IndexDip,
    IndexTip,
    MiddleMcp,
    MiddlePip,
    MiddleDip,
    MiddleTip,
    RingMcp,
    RingPip,
    RingDip,
    RingTip,
    PinkyMcp,
    PinkyPip,
    PinkyDip,
    PinkyTip,
}

impl HandJoint {
    pub fn index(&self) -> usize {
        *self as usize
    }
}

/// Finger identifiers, thumb first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Finger {
    Thumb,
    Index,
    Middle,
    Ring,
    Pinky,
}

impl Finger {
    pub const ALL: [Finger; 5] = [
        Finger::Thumb,
        Finger::Index,
        Finger::Middle,
        Finger::Ring,
        Finger::Pinky,
    ];

    /// (base, proximal, distal, tip) joints of this finger.
    pub fn joints(&self) -> [HandJoint; 4] {
        use HandJoint::*;
        match self {
            Finger::Thumb => [ThumbCmc, ThumbMcp, ThumbIp, ThumbTip],
            Finger::Index => [IndexMcp, IndexPip, IndexDip, IndexTip],
            Finger::Middle => [MiddleMcp, MiddlePip, MiddleDip, MiddleTip],
            Finger::Ring => [RingMcp, RingPip, RingDip, RingTip],
            Finger::Pinky => [PinkyMcp, PinkyPip, PinkyDip, PinkyTip],
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LandmarkError {
    #[error("malformed landmark frame: expected {expected} points, got {actual}")]
    Malformed { expected: usize, actual: usize },
    #[error("malformed landmark frame: point {index} is not finite")]
    NonFinite { index: usize },
}

/// One tracked hand: 21 points in normalized frame coordinates.
///
/// x and y are in `0..1` of the frame with y growing downward; z is depth
/// relative to the wrist (smaller is closer to the camera).
#[derive(Debug, Clone, PartialEq)]
pub struct HandLandmarks {
    pub points: [Point3D; LANDMARK_COUNT],
    pub confidence: Option<f32>,
}

impl HandLandmarks {
    pub fn new(points: [Point3D; LANDMARK_COUNT]) -> Self {
        Self {
            points,
            confidence: None,
        }
    }

    pub fn from_points(points: &[Point3D]) -> Result<Self, LandmarkError> {
        let points: [Point3D; LANDMARK_COUNT] =
            points.try_into().map_err(|_| LandmarkError::Malformed {
                expected: LANDMARK_COUNT,
                actual: points.len(),
            })?;
        if let Some(index) = points.iter().position(|p| !p.is_finite()) {
            return Err(LandmarkError::NonFinite { index });
        }
        Ok(Self::new(points))
    }

    pub fn with_confidence(mut self, confidence: f32) -> Self {
        self.confidence = Some(confidence);
        self
    }

    pub fn joint(&self, joint: HandJoint) -> Point3D {
        self.points[joint.index()]
    }
}

/// What the landmark source saw in one camera frame.
#[derive(Debug, Clone, PartialEq)]
pub enum LandmarkFrame {
    NoHand,
    Hand(HandLandmarks),
}

impl LandmarkFrame {
    /// Builds a frame from a raw point list. A wrong point count or a NaN or
    /// infinite coordinate is logged and degrades to `NoHand`.
    pub fn from_points(points: &[Point3D]) -> Self {
        match HandLandmarks::from_points(points) {
            Ok(hand) => LandmarkFrame::Hand(hand),
            Err(e) => {
                warn!("{e}; treating frame as no hand");
                LandmarkFrame::NoHand
            }
        }
    }

    pub fn hand(&self) -> Option<&HandLandmarks> {
        match self {
            LandmarkFrame::Hand(hand) => Some(hand),
            LandmarkFrame::NoHand => None,
        }
    }
}
