//! Script replay against a directory of pages.

use std::sync::{Arc, Mutex};

use mangoview::script::{parse_script, run_script};
use mangoview::view::LogView;
use mangoview::{
    AppEvent, Config, DirectoryPageSource, EventFilter, PageEvent, PageTurn, Selection,
    SelectionEvent, ViewerSession,
};

const PAGE: &str = r#"{
    "resolution": [800, 600],
    "paragraphs": [{
        "text": "今日は",
        "symbols": [
            {"text": "今", "aabb": {"min": [100, 100], "max": [130, 130]}},
            {"text": "日", "aabb": {"min": [140, 100], "max": [170, 130]}},
            {"text": "は", "aabb": {"min": [180, 100], "max": [210, 130]}}
        ],
        "hints": [{"begin": 0, "end": 2}],
        "altHints": [{"begin": 0, "end": 3}]
    }],
    "clusters": [{"paragraphs": [0], "aabb": {"min": [100, 100], "max": [210, 130]}, "translation": "Today"}]
}"#;

fn book() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("page0.json"), PAGE).unwrap();
    std::fs::write(dir.path().join("page1.json"), PAGE).unwrap();
    dir
}

#[tokio::test]
async fn test_replay_selects_drags_and_turns_page() {
    let dir = book();
    let source = DirectoryPageSource::new(dir.path());
    let mut session = ViewerSession::new(&Config::default(), LogView::default());

    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = events.clone();
    session
        .bus()
        .subscribe(EventFilter::All, move |event| sink.lock().unwrap().push(event));

    let steps = parse_script(
        r#"[
            {"resize": {"width": 1000, "height": 800}},
            {"navigate": {"index": 0}},
            {"click": {"x": 115, "y": 115, "t": 0}},
            {"advance": {"t": 250}},
            {"down": {"x": 155, "y": 115, "t": 1000}},
            {"move": {"x": 195, "y": 115, "t": 1010}},
            {"up": {"x": 195, "y": 115, "t": 1020}},
            {"tick": {"count": 5}},
            {"click": {"x": 780, "y": 500, "t": 3000}},
            {"click": {"x": 780, "y": 500, "t": 3100}},
            {"tick": {}}
        ]"#,
    )
    .unwrap();

    let summary = run_script(&mut session, &source, &steps).await;
    assert_eq!(summary.steps, 11);
    assert_eq!(summary.page, Some(1));
    assert!(!session.positioner().is_settling());
    assert!(session.view().writes > 0);

    let events = events.lock().unwrap();
    // Dragging the end handle of the hint onto the third symbol hits the alt hint
    assert!(events.iter().any(|e| matches!(
        e,
        AppEvent::Selection(SelectionEvent::SelectionChanged {
            selection: Some(Selection { sym_begin: 0, sym_end: 3, .. }),
            ..
        })
    )));
    assert!(events.iter().any(|e| *e
        == AppEvent::Selection(SelectionEvent::PageTurnRequested(PageTurn::Next))));
    assert!(matches!(
        events.last(),
        Some(AppEvent::Page(PageEvent::Loaded { index: 1, .. }))
    ));
}

#[test]
fn test_events_encode_as_json_lines() {
    let event = AppEvent::Page(PageEvent::Loaded {
        index: 3,
        symbols: 12,
    });
    let line = serde_json::to_string(&event).unwrap();
    assert!(!line.contains('\n'));
    let decoded: AppEvent = serde_json::from_str(&line).unwrap();
    assert_eq!(decoded, event);
}

#[tokio::test]
async fn test_receiver_gets_replayed_events_in_order() {
    let dir = book();
    let source = DirectoryPageSource::new(dir.path());
    let mut session = ViewerSession::new(&Config::default(), LogView::default());
    let mut receiver = session.bus().receiver();

    let steps = parse_script(
        r#"[
            {"navigate": {"index": 0}},
            {"click": {"x": 115, "y": 115, "t": 0}},
            {"advance": {"t": 250}}
        ]"#,
    )
    .unwrap();
    run_script(&mut session, &source, &steps).await;
    drop(session);

    let mut events = Vec::new();
    while let Ok(event) = receiver.recv().await {
        events.push(event);
    }

    assert!(matches!(
        events[0],
        AppEvent::Page(PageEvent::LoadStarted { index: 0, .. })
    ));
    assert!(matches!(
        events.last(),
        Some(AppEvent::Selection(SelectionEvent::TargetChanged(target))) if target.visible
    ));
}
