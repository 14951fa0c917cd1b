//! Integration tests for the full decision path: raw pointer input through
//! the gesture recognizer, coordinate mapping, command construction, and
//! finally the exact JSON frame that would hit the wire.

use screenlink_core::{
    decode_frame, encode_command, page_scroll, DisplayGeometry, DisplayPoint, GestureRecognizer,
    InboundMessage, OutboundCommand, ScrollDirection, PAGE_SCROLL_PERCENT,
};

/// natural 1920x1080 rendered at 960x540 (scale 2 on both axes).
fn half_size() -> DisplayGeometry {
    DisplayGeometry::new(1920, 1080, 960, 540)
}

#[test]
fn test_tap_becomes_click_at_frame() {
    let mut recognizer = GestureRecognizer::new();
    recognizer.touch_start(1, DisplayPoint::new(100.0, 50.0), 500);
    let gesture = recognizer
        .touch_end(1, DisplayPoint::new(100.0, 50.0), 560, &half_size())
        .expect("stationary press must classify as a tap");

    let frame = encode_command(&gesture.into_command()).unwrap();

    assert_eq!(frame, r#"{"type":"click_at","payload":{"x":200,"y":100}}"#);
}

#[test]
fn test_swipe_becomes_drag_scroll_frame() {
    let mut recognizer = GestureRecognizer::new();
    recognizer.touch_start(1, DisplayPoint::new(50.0, 500.0), 1_000);
    recognizer.touch_move(1, DisplayPoint::new(50.0, 250.0));
    let gesture = recognizer
        .touch_end(1, DisplayPoint::new(50.0, 100.0), 1_120, &half_size())
        .expect("long drag must classify as a swipe");

    let frame = encode_command(&gesture.into_command()).unwrap();

    assert_eq!(
        frame,
        r#"{"type":"scroll","payload":{"startX":100,"startY":1000,"endX":100,"endY":200,"duration":120}}"#
    );
}

#[test]
fn test_ambiguous_gesture_reaches_the_wire_as_nothing() {
    let mut recognizer = GestureRecognizer::new();
    recognizer.touch_start(1, DisplayPoint::new(0.0, 0.0), 0);
    recognizer.touch_move(1, DisplayPoint::new(0.0, 20.0));
    let gesture = recognizer.touch_end(1, DisplayPoint::new(0.0, 20.0), 60, &half_size());
    assert!(gesture.is_none());
}

#[test]
fn test_hidden_image_blocks_every_gesture() {
    let hidden = DisplayGeometry::new(1920, 1080, 0, 0);
    let mut recognizer = GestureRecognizer::new();

    recognizer.touch_start(1, DisplayPoint::new(10.0, 10.0), 0);
    assert!(recognizer
        .touch_end(1, DisplayPoint::new(10.0, 10.0), 40, &hidden)
        .is_none());

    assert!(recognizer.click(DisplayPoint::new(10.0, 10.0), &hidden).is_none());
}

#[test]
fn test_button_scroll_frame_uses_percent_shape() {
    let frame = encode_command(&page_scroll(ScrollDirection::Up, PAGE_SCROLL_PERCENT)).unwrap();
    assert_eq!(
        frame,
        r#"{"type":"scroll","payload":{"direction":"up","percent":90}}"#
    );
}

#[test]
fn test_both_scroll_shapes_round_trip_through_the_envelope() {
    let drag = OutboundCommand::Scroll(screenlink_core::ScrollPayload::Drag {
        start_x: 1,
        start_y: 2,
        end_x: 3,
        end_y: 4,
        duration: 99,
    });
    let page = page_scroll(ScrollDirection::Down, 45);

    for original in [drag, page] {
        let frame = encode_command(&original).unwrap();
        let decoded: OutboundCommand = serde_json::from_str(&frame).unwrap();
        assert_eq!(original, decoded);
    }
}

#[test]
fn test_inbound_screenshot_frame_decodes() {
    let msg = decode_frame(r#"{"type":"screenshot","payload":"ZnJhbWU="}"#).unwrap();
    assert_eq!(msg, InboundMessage::Screenshot("ZnJhbWU=".to_string()));
}

#[test]
fn test_inbound_garbage_is_rejected_not_panicked() {
    for bad in [
        "",
        "null",
        "42",
        "{}",
        r#"{"type":"screenshot"}"#,
        r#"{"payload":"x"}"#,
        r#"{"type":"telemetry","payload":{}}"#,
    ] {
        assert!(decode_frame(bad).is_err(), "frame {bad:?} must be rejected");
    }
}
