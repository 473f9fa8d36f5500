use std::time::Duration;

use rusty_hands::calculator::CalcError;
use rusty_hands::classifier::Gesture;
use rusty_hands::config::AppConfig;
use rusty_hands::debounce::{GestureEvent, HoldAction};
use rusty_hands::poses;
use rusty_hands::session::GestureSession;
use rusty_hands::types::{LandmarkFrame, Point3D};

const FRAME: Duration = Duration::from_millis(33);

fn frame_for(gesture: Gesture) -> LandmarkFrame {
    poses::hand_for(gesture)
        .map(LandmarkFrame::Hand)
        .unwrap_or(LandmarkFrame::NoHand)
}

/// Hold `gesture` for `ms`, returning the events it produced.
fn hold(session: &mut GestureSession, gesture: Gesture, ms: u64) -> Vec<GestureEvent> {
    let frame = frame_for(gesture);
    let frames = (ms / FRAME.as_millis() as u64).max(1);
    (0..frames)
        .filter_map(|_| session.step_elapsed(&frame, FRAME).event)
        .collect()
}

fn type_gestures(session: &mut GestureSession, gestures: &[Gesture]) {
    for g in gestures {
        hold(session, *g, 600);
        hold(session, Gesture::None, 150);
    }
}

fn started_session() -> GestureSession {
    let mut session = GestureSession::new(AppConfig::default().session());
    session.start();
    session
}

#[test]
fn every_pose_confirms_as_itself() {
    for gesture in poses::ALL_GESTURES {
        let mut session = started_session();
        let events = hold(&mut session, gesture, 700);
        assert_eq!(events, vec![GestureEvent::Confirmed(gesture)], "{gesture:?}");
    }
}

#[test]
fn three_plus_four_equals_seven() {
    let mut session = started_session();
    type_gestures(
        &mut session,
        &[Gesture::Three, Gesture::ThumbsUp, Gesture::Four, Gesture::FlatPalm],
    );
    let snap = session.snapshot();
    assert_eq!(snap.display_text, "7");
    assert_eq!(snap.history, vec!["3+4=7".to_string()]);
}

#[test]
fn divide_by_zero_shows_error_and_recovers() {
    let mut session = started_session();
    type_gestures(&mut session, &[Gesture::Five, Gesture::PointUp]);
    // Fist confirms digit 0; released before the clear hold.
    hold(&mut session, Gesture::Fist, 600);
    hold(&mut session, Gesture::None, 150);
    type_gestures(&mut session, &[Gesture::FlatPalm]);

    assert_eq!(session.calculator().error(), Some(CalcError::DivisionByZero));
    assert!(session.calculator().pending_operator().is_none());
    assert!(session.calculator().accumulator().is_none());
    let snap = session.snapshot();
    assert!(snap.error);
    assert_eq!(snap.display_text, "Error: Division by zero");

    type_gestures(&mut session, &[Gesture::Two]);
    assert_eq!(session.snapshot().display_text, "2");
}

#[test]
fn fist_hold_clears_once_and_keeps_history() {
    let mut session = started_session();
    type_gestures(
        &mut session,
        &[Gesture::Two, Gesture::Peace, Gesture::Three, Gesture::FlatPalm],
    );
    type_gestures(&mut session, &[Gesture::Four, Gesture::ThumbsDown]);

    let events = hold(&mut session, Gesture::Fist, 3000);
    assert_eq!(
        events,
        vec![
            GestureEvent::Confirmed(Gesture::Fist),
            GestureEvent::HoldConfirmed(HoldAction::Clear),
        ]
    );
    assert!(session.calculator().is_reset());
    let snap = session.snapshot();
    assert_eq!(snap.display_text, "0");
    assert_eq!(snap.history, vec!["2*3=6".to_string()]);
}

#[test]
fn flicker_between_four_and_five_never_confirms() {
    let mut session = started_session();
    let four = frame_for(Gesture::Four);
    let five = frame_for(Gesture::Five);
    for i in 0..300 {
        let frame = if i % 2 == 0 { &four } else { &five };
        assert!(session.step_elapsed(frame, FRAME).event.is_none());
    }
    assert_eq!(session.snapshot().display_text, "0");
}

#[test]
fn malformed_frames_count_as_no_hand() {
    let mut session = started_session();
    let short = LandmarkFrame::from_points(&[]);
    for _ in 0..50 {
        let report = session.step_elapsed(&short, FRAME);
        assert_eq!(report.gesture, Gesture::None);
        assert!(report.event.is_none());
    }
}

#[test]
fn nan_landmarks_never_clear_the_display() {
    let mut session = started_session();
    type_gestures(&mut session, &[Gesture::Three]);
    assert_eq!(session.snapshot().display_text, "3");

    let nan = LandmarkFrame::from_points(&[Point3D::new(f32::NAN, f32::NAN, f32::NAN); 21]);
    assert_eq!(nan, LandmarkFrame::NoHand);
    for _ in 0..60 {
        let report = session.step_elapsed(&nan, FRAME);
        assert_eq!(report.gesture, Gesture::None);
        assert!(report.event.is_none());
    }
    assert_eq!(session.snapshot().display_text, "3");
}
