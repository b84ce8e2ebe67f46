//! End-to-end board scenarios
//!
//! Drives `BoardState` the way a browser host would: drops from the
//! palette, pointer gestures on bodies and handles, content edits and a
//! snapshot round trip through a file.

use board_core::{
    AnchorMode, BoardConfig, BoardError, BoardState, Clock, ContentEdit, DropEvent, ElementId,
    ElementKind, ElementType, FixedClock, Handle, MediaSource, Point, PointerEvent, Position3,
    Rect, SceneStore, Size2, Snapshot, Viewport,
};
use chrono::{NaiveDate, TimeZone, Utc};

fn new_board() -> BoardState<FixedClock> {
    let clock = FixedClock(
        Utc.with_ymd_and_hms(2026, 10, 16, 8, 0, 0)
            .single()
            .expect("valid time"),
    );
    let config = BoardConfig {
        canvas: Size2::new(1200, 800),
        ..BoardConfig::default()
    };
    BoardState::with_clock(config, clock)
}

fn place_item<C: Clock>(board: &mut BoardState<C>, element_type: ElementType, x: f64, y: f64) -> ElementId {
    board
        .drop_element(&DropEvent::new(element_type, x, y))
        .expect("drop accepted")
}

#[test]
fn text_drop_uses_default_size_at_pointer() {
    let mut board = new_board();
    let id = place_item(&mut board, ElementType::Text, 50.0, 50.0);

    let element = board.store().find(&id).expect("placed");
    assert_eq!(element.position, Position3::new(50, 50, 1));
    assert_eq!(element.size, Size2::new(260, 160));
    assert_eq!(element.kind, ElementKind::Text(String::new()));
}

#[test]
fn drop_past_edge_threshold_is_rejected() {
    let mut board = new_board();
    // 1200 - 260 - 10 = 930
    assert!(board.drop_element(&DropEvent::new(ElementType::Text, 931.0, 10.0)).is_none());
    assert!(board.store().is_empty());
    assert!(!board.has_local_changes);
}

#[test]
fn drops_are_relative_to_viewport_origin() {
    let mut board = new_board();
    board.set_viewport(Viewport::new(Point::new(240.0, 64.0), Size2::new(1200, 800)));

    // Left of the canvas on screen.
    assert!(board.drop_element(&DropEvent::new(ElementType::Task, 200.0, 300.0)).is_none());

    let id = place_item(&mut board, ElementType::Task, 290.0, 114.0);
    let element = board.store().find(&id).expect("placed");
    assert_eq!((element.position.x, element.position.y), (50, 50));
    assert_eq!(element.size, Size2::new(220, 60));
}

#[test]
fn duplicate_link_keeps_single_edge() {
    let mut board = new_board();
    let a = place_item(&mut board, ElementType::Text, 0.0, 0.0);
    let b = place_item(&mut board, ElementType::Text, 400.0, 0.0);

    for _ in 0..2 {
        board.handle_pointer(&PointerEvent::press(a.clone(), 130.0, 160.0).with_handle(Handle::Link));
        board.handle_pointer(&PointerEvent::moved(300.0, 100.0));
        board.handle_pointer(&PointerEvent::release(500.0, 80.0));
    }
    // Reverse direction is refused too.
    assert!(!board.connect(&b, &a));

    assert_eq!(board.store().connections().count(), 1);
    assert_eq!(board.segments().len(), 1);
}

#[test]
fn deleting_target_clears_incoming_edge() {
    let mut board = new_board();
    let a = place_item(&mut board, ElementType::Text, 0.0, 0.0);
    let b = place_item(&mut board, ElementType::List, 400.0, 0.0);
    assert!(board.connect(&a, &b));

    let frame = board.delete(&b);
    assert!(frame.changed);
    assert!(frame.segments.is_empty());
    assert!(board.store().find(&a).expect("a").connections().is_empty());
    assert!(!board.delete(&b).changed);
}

#[test]
fn side_anchors_follow_configuration() {
    let config = BoardConfig {
        anchor_mode: AnchorMode::Sides,
        ..BoardConfig::default()
    };
    let mut board = BoardState::new(config);
    let a = place_item(&mut board, ElementType::Text, 0.0, 0.0);
    let b = place_item(&mut board, ElementType::Text, 0.0, 400.0);
    board.connect(&a, &b);

    let segments = board.segments();
    assert_eq!(segments[0].from, Point::new(130.0, 160.0));
    assert_eq!(segments[0].to, Point::new(130.0, 400.0));
}

#[test]
fn move_is_kept_out_of_reserved_strip() {
    let config = BoardConfig {
        reserved_strip: Some(Rect::new(0, 0, 1600, 48)),
        ..BoardConfig::default()
    };
    let mut board = BoardState::new(config);
    let id = place_item(&mut board, ElementType::Text, 100.0, 200.0);

    board.handle_pointer(&PointerEvent::press(id.clone(), 150.0, 250.0));
    board.handle_pointer(&PointerEvent::release(150.0, 60.0));

    let element = board.store().find(&id).expect("moved");
    assert_eq!(element.position.y, 48);
}

#[test]
fn media_edits_follow_file_and_url_rules() {
    let mut board = new_board();
    let image = place_item(&mut board, ElementType::Image, 10.0, 10.0);

    let pdf = ContentEdit::AttachFile {
        mime: "application/pdf".into(),
        bytes: b"%PDF".to_vec(),
    };
    assert!(!board.edit(&image, pdf).expect("edit"));

    let png = ContentEdit::AttachFile {
        mime: "image/png".into(),
        bytes: vec![0x89, b'P', b'N', b'G'],
    };
    assert!(board.edit(&image, png).expect("edit"));

    let video = place_item(&mut board, ElementType::Video, 400.0, 10.0);
    board
        .edit(
            &video,
            ContentEdit::SetVideoUrl {
                url: "https://youtu.be/oznr-1-poSU".into(),
            },
        )
        .expect("edit");

    let err = board
        .edit(&video, ContentEdit::SetTaskChecked { checked: true })
        .expect_err("wrong kind");
    assert!(matches!(err, BoardError::KindMismatch { .. }));

    match &board.store().find(&image).expect("image").kind {
        ElementKind::Image(media) => assert!(matches!(media.source, MediaSource::Inline { .. })),
        other => panic!("expected Image, got {other:?}"),
    }
    match &board.store().find(&video).expect("video").kind {
        ElementKind::Video(data) => assert_eq!(data.url, "https://www.youtube.com/embed/oznr-1-poSU"),
        other => panic!("expected Video, got {other:?}"),
    }
}

#[test]
fn date_drop_counts_down_from_tomorrow() {
    let mut board = new_board();
    let id = place_item(&mut board, ElementType::Date, 10.0, 10.0);
    match &board.store().find(&id).expect("date").kind {
        ElementKind::Date(date) => {
            assert_eq!(date.target_date, NaiveDate::from_ymd_opt(2026, 10, 17).expect("valid date"));
            assert_eq!(date.days_remaining(NaiveDate::from_ymd_opt(2026, 10, 16).expect("valid date")), 1);
        }
        other => panic!("expected Date, got {other:?}"),
    }
}

#[test]
fn snapshot_file_round_trip_drops_dangling_edges() {
    let mut board = new_board();
    let a = place_item(&mut board, ElementType::Text, 0.0, 0.0);
    let b = place_item(&mut board, ElementType::Task, 400.0, 0.0);
    let c = place_item(&mut board, ElementType::List, 800.0, 0.0);
    board.connect(&a, &b);
    board.connect(&c, &a);
    board
        .edit(&a, ContentEdit::SetText { text: "plan".into() })
        .expect("edit");

    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("board.json");
    let mut snapshot = board.export().expect("export");
    // Drop B from the document to leave A -> B dangling.
    snapshot.elements.retain(|e| e.id != b.to_string());
    snapshot.write_to_path(&path).expect("write");

    let mut other = new_board();
    let report = other
        .import(&Snapshot::read_from_path(&path).expect("read"))
        .expect("import");
    assert_eq!(report.elements, 2);
    assert_eq!(report.connections_restored, 1);
    assert_eq!(report.connections_dropped, 1);

    let store: &SceneStore = other.store();
    assert!(store.exists(&c, &a));
    assert!(store.find(&b).is_none());
    assert_eq!(
        store.find(&a).expect("a").kind,
        ElementKind::Text("plan".into())
    );
}

#[test]
fn malformed_import_leaves_board_untouched() {
    let mut board = new_board();
    place_item(&mut board, ElementType::Text, 0.0, 0.0);
    let before = board.store().clone();

    let err = Snapshot::from_json(r#"{"exportedAt": "2026-10-16T08:00:00Z"}"#).expect_err("no elements");
    assert!(matches!(err, BoardError::MalformedSnapshot(_)));

    let mut snapshot = board.export().expect("export");
    let copy = snapshot.elements[0].clone();
    snapshot.elements.push(copy);
    let err = board.import(&snapshot).expect_err("duplicate ids");
    assert!(matches!(err, BoardError::MalformedSnapshot(_)));
    assert_eq!(board.store(), &before);
}

#[test]
fn far_off_canvas_import_can_be_resized_and_moved() {
    let mut board = new_board();
    let snapshot = Snapshot::from_json(
        r#"{"elements": [
            {"id": "far", "type": "Text", "data": "lost",
             "position": {"x": -3.0e9, "y": 10, "z": 1}, "size": {"x": 260, "y": 160},
             "connections": []}
        ]}"#,
    )
    .expect("parse");
    board.import(&snapshot).expect("import");
    let id = ElementId::from("far");
    assert_eq!(board.store().find(&id).expect("far").position.x, i32::MIN);

    board.handle_pointer(&PointerEvent::press(id.clone(), 0.0, 0.0).with_handle(Handle::Resize));
    board.handle_pointer(&PointerEvent::moved(20.0, 20.0));
    let frame = board.handle_pointer(&PointerEvent::release(20.0, 20.0));
    assert!(frame.changed);

    let element = board.store().find(&id).expect("far");
    assert_eq!(element.size, Size2::new(280, 180));
    assert_eq!((element.position.x, element.position.y), (0, 10));

    let snapshot = Snapshot::from_json(
        r#"{"elements": [
            {"id": "far", "type": "Text", "data": "lost",
             "position": {"x": 3.0e9, "y": -3.0e9, "z": 1}, "size": {"x": 260, "y": 160},
             "connections": []}
        ]}"#,
    )
    .expect("parse");
    board.import(&snapshot).expect("import");
    board.handle_pointer(&PointerEvent::press(id.clone(), -3.0e9, 3.0e9));
    board.handle_pointer(&PointerEvent::release(3.0e9, -3.0e9));

    let element = board.store().find(&id).expect("far");
    assert_eq!((element.position.x, element.position.y), (1200 - 260, 0));
}
