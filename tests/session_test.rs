use std::sync::{Arc, Mutex};

use swingtrack_rs::{
    Detection, FALLBACK_POSITION, ReplaySource, ScriptedDetector, Session, SessionState,
    TrackUpdate, TrackerPipeline,
};

#[test]
fn test_session_with_closure_sink() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = {
        let seen = seen.clone();
        move |update: TrackUpdate| seen.lock().unwrap().push(update)
    };

    let det = Detection::new(0.1, 0.1, 0.2, 0.2, 0.9);
    let detector = ScriptedDetector::new(vec![Some(vec![det]), Some(vec![]), None]);
    let pipeline = TrackerPipeline::with_default_config(detector);
    let mut session = Session::new(ReplaySource::empty_frames(3, 30.0), pipeline, sink);

    assert_eq!(session.state(), SessionState::Idle);
    session.start().unwrap();
    session.start().unwrap();
    session.wait().unwrap();
    assert_eq!(session.state(), SessionState::Idle);

    let updates = seen.lock().unwrap();
    assert_eq!(updates.len(), 3);
    assert!(matches!(updates[0], TrackUpdate::NoDataYet { .. }));
    // Miss after a detection: spurious speed from the fallback point
    assert_eq!(updates[1].current_position(), FALLBACK_POSITION);
    assert!(updates[1].speed().unwrap() > 0.0);
    // Detector failure: fallback again, no movement
    assert_eq!(updates[2].speed(), Some(0.0));

    assert_eq!(session.pipeline().unwrap().failed_frames(), 1);
}
