//! Gesture classification from a single frame's finger state.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::calculator::{Command, Operator};
use crate::fingers::{FingerState, ThumbDirection};
use crate::types::{Finger, LandmarkFrame};

/// Recognized gesture labels. `None` means no confident label this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Gesture {
    Fist,
    One,
    Two,
    Three,
    Four,
    Five,
    ThumbsUp,
    ThumbsDown,
    Peace,
    PointUp,
    FlatPalm,
    None,
}

impl Gesture {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fist => "fist",
            Self::One => "one",
            Self::Two => "two",
            Self::Three => "three",
            Self::Four => "four",
            Self::Five => "five",
            Self::ThumbsUp => "thumbs-up",
            Self::ThumbsDown => "thumbs-down",
            Self::Peace => "peace",
            Self::PointUp => "point-up",
            Self::FlatPalm => "flat-palm",
            Self::None => "none",
        }
    }

    /// Calculator key this gesture stands for.
    pub fn symbol(&self) -> Option<char> {
        match self {
            Self::Fist => Some('0'),
            Self::One => Some('1'),
            Self::Two => Some('2'),
            Self::Three => Some('3'),
            Self::Four => Some('4'),
            Self::Five => Some('5'),
            Self::ThumbsUp => Some('+'),
            Self::ThumbsDown => Some('-'),
            Self::Peace => Some('*'),
            Self::PointUp => Some('/'),
            Self::FlatPalm => Some('='),
            Self::None => None,
        }
    }

    pub fn command(&self) -> Option<Command> {
        match self {
            Self::Fist => Some(Command::Digit(0)),
            Self::One => Some(Command::Digit(1)),
            Self::Two => Some(Command::Digit(2)),
            Self::Three => Some(Command::Digit(3)),
            Self::Four => Some(Command::Digit(4)),
            Self::Five => Some(Command::Digit(5)),
            Self::ThumbsUp => Some(Command::Operator(Operator::Add)),
            Self::ThumbsDown => Some(Command::Operator(Operator::Sub)),
            Self::Peace => Some(Command::Operator(Operator::Mul)),
            Self::PointUp => Some(Command::Operator(Operator::Div)),
            Self::FlatPalm => Some(Command::Equals),
            Self::None => None,
        }
    }
}

/// Thresholds for finger extraction and classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    /// Tip-to-wrist over PIP-to-wrist distance needed to count a finger as extended.
    pub finger_extension_ratio: f32,
    /// Minimum thumb-tip distance from the palm axis, as a fraction of palm length.
    pub thumb_lateral_ratio: f32,
    /// Vertical tip/MCP offset before the thumb counts as pointing up or down.
    pub thumb_direction_margin: f32,
    /// Index counts as vertical when |dx| < |dy| * ratio between tip and PIP.
    pub index_vertical_ratio: f32,
    /// Minimum index/middle tip separation for a peace sign.
    pub peace_min_spread: f32,
    /// Maximum index/pinky tip span for a flat palm.
    pub flat_palm_max_span: f32,
    /// Maximum wrist/middle-MCP depth difference for a flat palm.
    pub flat_palm_max_depth: f32,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            finger_extension_ratio: 1.10,
            thumb_lateral_ratio: 0.55,
            thumb_direction_margin: 0.02,
            index_vertical_ratio: 0.5,
            peace_min_spread: 0.05,
            flat_palm_max_span: 0.25,
            flat_palm_max_depth: 0.10,
        }
    }
}

/// A predicate over the finger state.
#[derive(Debug, Clone, Copy)]
enum Rule {
    NoFingers,
    ThumbOnly(ThumbDirection),
    IndexOnly { vertical: bool },
    PeaceSign,
    AnyTwo,
    Exactly(&'static [Finger]),
    AllFive { flat: bool },
}

const THREE: &[Finger] = &[Finger::Index, Finger::Middle, Finger::Ring];
const FOUR: &[Finger] = &[Finger::Index, Finger::Middle, Finger::Ring, Finger::Pinky];

/// Evaluated top to bottom; the first matching rule wins.
const RULES: &[(Rule, Gesture)] = &[
    (Rule::NoFingers, Gesture::Fist),
    (Rule::ThumbOnly(ThumbDirection::Up), Gesture::ThumbsUp),
    (Rule::ThumbOnly(ThumbDirection::Down), Gesture::ThumbsDown),
    (Rule::IndexOnly { vertical: true }, Gesture::PointUp),
    (Rule::IndexOnly { vertical: false }, Gesture::One),
    (Rule::PeaceSign, Gesture::Peace),
    (Rule::AnyTwo, Gesture::Two),
    (Rule::Exactly(THREE), Gesture::Three),
    (Rule::Exactly(FOUR), Gesture::Four),
    (Rule::AllFive { flat: true }, Gesture::FlatPalm),
    (Rule::AllFive { flat: false }, Gesture::Five),
];

impl Rule {
    fn matches(&self, state: &FingerState, config: &GestureConfig) -> bool {
        match *self {
            Rule::NoFingers => state.extended_count() == 0,
            Rule::ThumbOnly(direction) => {
                state.only(&[Finger::Thumb]) && state.thumb_direction == direction
            }
            Rule::IndexOnly { vertical } => {
                state.only(&[Finger::Index]) && state.index_vertical == vertical
            }
            Rule::PeaceSign => {
                state.only(&[Finger::Index, Finger::Middle])
                    && state.index_middle_spread >= config.peace_min_spread
            }
            Rule::AnyTwo => state.extended_count() == 2,
            Rule::Exactly(fingers) => state.only(fingers),
            Rule::AllFive { flat } => {
                state.extended_count() == 5 && is_flat_palm(state, config) == flat
            }
        }
    }
}

fn is_flat_palm(state: &FingerState, config: &GestureConfig) -> bool {
    state.index_pinky_span < config.flat_palm_max_span
        && state.palm_depth < config.flat_palm_max_depth
}

/// Maps finger states to exactly one gesture label per frame.
#[derive(Debug, Clone, Default)]
pub struct GestureClassifier {
    config: GestureConfig,
}

impl GestureClassifier {
    pub fn new(config: GestureConfig) -> Self {
        Self { config }
    }

    pub fn classify(&self, state: &FingerState) -> Gesture {
        RULES
            .iter()
            .find(|(rule, _)| rule.matches(state, &self.config))
            .map(|(_, gesture)| *gesture)
            .unwrap_or(Gesture::None)
    }

    /// Extract and classify in one step. `NoHand` skips extraction entirely.
    pub fn classify_frame(&self, frame: &LandmarkFrame) -> (Gesture, Option<FingerState>) {
        let Some(hand) = frame.hand() else {
            return (Gesture::None, None);
        };
        let state = FingerState::extract(hand, &self.config);
        let gesture = self.classify(&state);
        trace!("fingers {:?} -> {:?}", state.extended, gesture);
        (gesture, Some(state))
    }
}
