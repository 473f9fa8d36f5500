//! Synthetic hand poses for every gesture.
//!
//! Used by the simulated landmark source when no tracking model is available,
//! and by tests. Poses are built from an upright right hand with the wrist
//! near the bottom centre of the frame; thumbs up/down rotate that template a
//! quarter turn about the wrist.

use crate::classifier::Gesture;
use crate::types::{HandLandmarks, Point3D, LANDMARK_COUNT};

/// Every gesture that has a pose, i.e. all labels except `None`.
pub const ALL_GESTURES: [Gesture; 11] = [
    Gesture::Fist,
    Gesture::One,
    Gesture::Two,
    Gesture::Three,
    Gesture::Four,
    Gesture::Five,
    Gesture::ThumbsUp,
    Gesture::ThumbsDown,
    Gesture::Peace,
    Gesture::PointUp,
    Gesture::FlatPalm,
];

const WRIST: (f32, f32) = (0.50, 0.80);
const INDEX_MCP: (f32, f32) = (0.44, 0.60);
const MIDDLE_MCP: (f32, f32) = (0.50, 0.58);
const RING_MCP: (f32, f32) = (0.56, 0.60);
const PINKY_MCP: (f32, f32) = (0.61, 0.63);

/// Segment lengths MCP->PIP, PIP->DIP, DIP->tip.
const SEGMENTS: [f32; 3] = [0.05, 0.03, 0.025];

const UP: (f32, f32) = (0.0, -1.0);

#[derive(Debug, Clone, Copy)]
enum Pose {
    Curled,
    Straight((f32, f32)),
}

#[derive(Debug, Clone, Copy)]
enum Turn {
    None,
    /// Fingers point right, thumb up.
    Clockwise,
    /// Fingers point left, thumb down.
    CounterClockwise,
}

struct Template {
    thumb_out: bool,
    fingers: [Pose; 4],
    turn: Turn,
}

fn normalized(x: f32, y: f32) -> (f32, f32) {
    let len = (x * x + y * y).sqrt();
    (x / len, y / len)
}

fn p(x: f32, y: f32, z: f32) -> Point3D {
    Point3D::new(x, y, z)
}

fn finger_chain(mcp: (f32, f32), pose: Pose) -> [Point3D; 4] {
    let (mx, my) = mcp;
    match pose {
        Pose::Straight((dx, dy)) => {
            let pip = SEGMENTS[0];
            let dip = pip + SEGMENTS[1];
            let tip = dip + SEGMENTS[2];
            [
                p(mx, my, 0.0),
                p(mx + dx * pip, my + dy * pip, 0.0),
                p(mx + dx * dip, my + dy * dip, 0.0),
                p(mx + dx * tip, my + dy * tip, 0.0),
            ]
        }
        // Folded toward the camera with the tip back over the palm.
        Pose::Curled => [
            p(mx, my, 0.0),
            p(mx, my - 0.035, -0.02),
            p(mx, my - 0.01, -0.05),
            p(mx, my + 0.03, -0.04),
        ],
    }
}

fn thumb_chain(out: bool) -> [Point3D; 4] {
    if out {
        // Perpendicular to the palm axis, pointing away from the index.
        [
            p(0.45, 0.74, 0.0),
            p(0.41, 0.72, 0.0),
            p(0.37, 0.72, 0.0),
            p(0.32, 0.72, 0.0),
        ]
    } else {
        // Tucked across the folded fingers.
        [
            p(0.45, 0.74, 0.0),
            p(0.43, 0.69, -0.01),
            p(0.46, 0.65, -0.03),
            p(0.49, 0.64, -0.04),
        ]
    }
}

fn rotate(point: Point3D, turn: Turn) -> Point3D {
    let (ox, oy) = (point.x - WRIST.0, point.y - WRIST.1);
    let (rx, ry) = match turn {
        Turn::None => (ox, oy),
        Turn::Clockwise => (-oy, ox),
        Turn::CounterClockwise => (oy, -ox),
    };
    Point3D::new(WRIST.0 + rx, WRIST.1 + ry, point.z)
}

impl Template {
    fn build(&self) -> HandLandmarks {
        let mut points = [Point3D::default(); LANDMARK_COUNT];
        points[0] = p(WRIST.0, WRIST.1, 0.0);
        points[1..5].copy_from_slice(&thumb_chain(self.thumb_out));
        for (i, (mcp, pose)) in [INDEX_MCP, MIDDLE_MCP, RING_MCP, PINKY_MCP]
            .into_iter()
            .zip(self.fingers)
            .enumerate()
        {
            let start = 5 + i * 4;
            points[start..start + 4].copy_from_slice(&finger_chain(mcp, pose));
        }
        for point in points.iter_mut() {
            *point = rotate(*point, self.turn);
        }
        HandLandmarks::new(points).with_confidence(1.0)
    }
}

/// Landmarks that classify as `gesture` under the default thresholds.
pub fn hand_for(gesture: Gesture) -> Option<HandLandmarks> {
    use Pose::{Curled, Straight};

    let up = Straight(UP);
    let template = match gesture {
        Gesture::None => return None,
        Gesture::Fist => Template {
            thumb_out: false,
            fingers: [Curled; 4],
            turn: Turn::None,
        },
        Gesture::One => Template {
            thumb_out: false,
            fingers: [Straight(normalized(0.6, -0.8)), Curled, Curled, Curled],
            turn: Turn::None,
        },
        Gesture::Two => Template {
            thumb_out: false,
            fingers: [
                Straight(normalized(0.26, -0.966)),
                Straight(normalized(-0.26, -0.966)),
                Curled,
                Curled,
            ],
            turn: Turn::None,
        },
        Gesture::Three => Template {
            thumb_out: false,
            fingers: [up, up, up, Curled],
            turn: Turn::None,
        },
        Gesture::Four => Template {
            thumb_out: false,
            fingers: [up; 4],
            turn: Turn::None,
        },
        Gesture::Five => Template {
            thumb_out: true,
            fingers: [
                Straight(normalized(-0.5, -0.866)),
                Straight(normalized(-0.15, -0.99)),
                Straight(normalized(0.25, -0.97)),
                Straight(normalized(0.6, -0.8)),
            ],
            turn: Turn::None,
        },
        Gesture::ThumbsUp => Template {
            thumb_out: true,
            fingers: [Curled; 4],
            turn: Turn::Clockwise,
        },
        Gesture::ThumbsDown => Template {
            thumb_out: true,
            fingers: [Curled; 4],
            turn: Turn::CounterClockwise,
        },
        Gesture::Peace => Template {
            thumb_out: false,
            fingers: [up, up, Curled, Curled],
            turn: Turn::None,
        },
        Gesture::PointUp => Template {
            thumb_out: false,
            fingers: [up, Curled, Curled, Curled],
            turn: Turn::None,
        },
        Gesture::FlatPalm => Template {
            thumb_out: true,
            fingers: [up; 4],
            turn: Turn::None,
        },
    };
    Some(template.build())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::HandJoint;

    #[test]
    fn test_none_has_no_pose() {
        assert!(hand_for(Gesture::None).is_none());
    }

    #[test]
    fn test_rotation_keeps_wrist_fixed() {
        let hand = hand_for(Gesture::ThumbsUp).expect("pose exists");
        let wrist = hand.joint(HandJoint::Wrist);
        assert_eq!((wrist.x, wrist.y), WRIST);
        let middle = hand.joint(HandJoint::MiddleMcp);
        assert!(middle.x > wrist.x);
    }

    #[test]
    fn test_points_stay_inside_frame() {
        for gesture in ALL_GESTURES {
            let hand = hand_for(gesture).expect("pose exists");
            for point in hand.points {
                assert!((0.0..=1.0).contains(&point.x), "{gesture:?} {point:?}");
                assert!((0.0..=1.0).contains(&point.y), "{gesture:?} {point:?}");
            }
        }
    }
}
