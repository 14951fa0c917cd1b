//! Integration tests for the viewer controller: full path from raw touch
//! input to frames on the (mock) wire, plus the start/stop lifecycle.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::sleep;

use screenlink_core::{ButtonName, DisplayGeometry, DisplayPoint, ScrollDirection};
use screenlink_viewer::application::ViewerController;
use screenlink_viewer::domain::ViewerConfig;
use screenlink_viewer::infrastructure::channel::ConnectionState;
use screenlink_viewer::infrastructure::transport::mock::MockTransport;
use screenlink_viewer::infrastructure::transport::Transport;

/// natural 1920x1080 rendered at 960x540 (scale 2 on both axes).
fn half_size() -> DisplayGeometry {
    DisplayGeometry::new(1920, 1080, 960, 540)
}

fn make_controller() -> (Arc<MockTransport>, ViewerController) {
    let transport = Arc::new(MockTransport::new());
    let controller = ViewerController::new(
        Arc::clone(&transport) as Arc<dyn Transport>,
        ViewerConfig::default(),
    );
    (transport, controller)
}

/// Polls `predicate` until it holds or a second has passed.
async fn wait_until(predicate: impl Fn() -> bool, what: &str) {
    for _ in 0..100 {
        if predicate() {
            return;
        }
        sleep(Duration::from_millis(10)).await;
    }
    panic!("timed out waiting until {what}");
}

/// Starts the controller and feeds one screenshot so gestures are enabled.
async fn start_with_frame(transport: &MockTransport, controller: &ViewerController) {
    controller.start().await;
    wait_until(|| controller.is_connected(), "controller is connected").await;
    transport
        .push_frame(r#"{"type":"screenshot","payload":"frame"}"#)
        .await;
    wait_until(
        || controller.latest_screenshot().is_some(),
        "first screenshot arrived",
    )
    .await;
}

#[tokio::test]
async fn test_start_connects_and_tracks_status() {
    let (transport, controller) = make_controller();
    assert!(!controller.is_connected());

    controller.start().await;

    wait_until(|| controller.is_connected(), "controller is connected").await;
    assert_eq!(transport.open_count(), 1);
    controller.shutdown().await;
}

#[tokio::test]
async fn test_screenshot_frames_update_viewer_state() {
    let (transport, controller) = make_controller();
    controller.start().await;
    wait_until(|| controller.is_connected(), "controller is connected").await;

    transport
        .push_frame(r#"{"type":"screenshot","payload":"aW1hZ2U="}"#)
        .await;

    wait_until(
        || controller.latest_screenshot().as_deref() == Some("aW1hZ2U="),
        "screenshot payload stored",
    )
    .await;
    controller.shutdown().await;
}

#[tokio::test]
async fn test_remote_close_clears_the_screenshot() {
    let (transport, controller) = make_controller();
    start_with_frame(&transport, &controller).await;

    transport.close_remote().await;

    wait_until(|| !controller.is_connected(), "controller disconnected").await;
    wait_until(
        || controller.latest_screenshot().is_none(),
        "stale screenshot cleared",
    )
    .await;
    controller.shutdown().await;
}

#[tokio::test]
async fn test_tap_dispatches_one_click_frame() {
    let (transport, controller) = make_controller();
    start_with_frame(&transport, &controller).await;

    controller
        .touch_start(1, DisplayPoint::new(100.0, 50.0), 1_000)
        .await;
    controller
        .touch_end(1, DisplayPoint::new(100.0, 50.0), 1_060, half_size())
        .await;

    assert_eq!(
        transport.sent_frames(),
        vec![r#"{"type":"click_at","payload":{"x":200,"y":100}}"#]
    );
    controller.shutdown().await;
}

#[tokio::test]
async fn test_swipe_dispatches_one_drag_scroll_frame() {
    let (transport, controller) = make_controller();
    start_with_frame(&transport, &controller).await;

    controller
        .touch_start(1, DisplayPoint::new(50.0, 500.0), 2_000)
        .await;
    let suppress = controller.touch_move(1, DisplayPoint::new(50.0, 300.0)).await;
    assert!(suppress, "a long drag must suppress native handling");
    controller
        .touch_end(1, DisplayPoint::new(50.0, 100.0), 2_120, half_size())
        .await;

    assert_eq!(
        transport.sent_frames(),
        vec![
            r#"{"type":"scroll","payload":{"startX":100,"startY":1000,"endX":100,"endY":200,"duration":120}}"#
        ]
    );
    controller.shutdown().await;
}

#[tokio::test]
async fn test_ambiguous_gesture_dispatches_nothing() {
    let (transport, controller) = make_controller();
    start_with_frame(&transport, &controller).await;

    controller.touch_start(1, DisplayPoint::new(0.0, 0.0), 0).await;
    controller.touch_move(1, DisplayPoint::new(20.0, 0.0)).await;
    controller
        .touch_end(1, DisplayPoint::new(20.0, 0.0), 80, half_size())
        .await;

    assert!(transport.sent_frames().is_empty());
    controller.shutdown().await;
}

#[tokio::test]
async fn test_multi_touch_dispatches_nothing() {
    let (transport, controller) = make_controller();
    start_with_frame(&transport, &controller).await;

    controller.touch_start(2, DisplayPoint::new(0.0, 0.0), 0).await;
    controller.touch_move(2, DisplayPoint::new(90.0, 0.0)).await;
    controller
        .touch_end(1, DisplayPoint::new(90.0, 0.0), 200, half_size())
        .await;

    assert!(transport.sent_frames().is_empty());
    controller.shutdown().await;
}

#[tokio::test]
async fn test_gestures_are_ignored_before_the_first_frame() {
    let (transport, controller) = make_controller();
    controller.start().await;
    wait_until(|| controller.is_connected(), "controller is connected").await;

    // Connected but nothing on screen yet: there is nothing to click on.
    controller
        .touch_start(1, DisplayPoint::new(5.0, 5.0), 0)
        .await;
    controller
        .touch_end(1, DisplayPoint::new(5.0, 5.0), 40, half_size())
        .await;
    controller
        .pointer_click(DisplayPoint::new(5.0, 5.0), half_size())
        .await;

    assert!(transport.sent_frames().is_empty());
    controller.shutdown().await;
}

#[tokio::test]
async fn test_degenerate_geometry_dispatches_nothing() {
    let (transport, controller) = make_controller();
    start_with_frame(&transport, &controller).await;

    let hidden = DisplayGeometry::new(1920, 1080, 0, 0);
    controller
        .touch_start(1, DisplayPoint::new(5.0, 5.0), 0)
        .await;
    controller
        .touch_end(1, DisplayPoint::new(5.0, 5.0), 40, hidden)
        .await;
    controller.pointer_click(DisplayPoint::new(5.0, 5.0), hidden).await;

    assert!(transport.sent_frames().is_empty());
    controller.shutdown().await;
}

#[tokio::test]
async fn test_pointer_click_maps_and_dispatches_immediately() {
    let (transport, controller) = make_controller();
    start_with_frame(&transport, &controller).await;

    controller
        .pointer_click(DisplayPoint::new(100.0, 50.0), half_size())
        .await;

    assert_eq!(
        transport.sent_frames(),
        vec![r#"{"type":"click_at","payload":{"x":200,"y":100}}"#]
    );
    controller.shutdown().await;
}

#[tokio::test]
async fn test_discrete_intents_produce_expected_frames() {
    let (transport, controller) = make_controller();
    start_with_frame(&transport, &controller).await;

    controller.scroll_page(ScrollDirection::Down).await;
    controller.open_url("https://example.com/").await;
    controller.press_button(ButtonName::VolumeUp).await;
    controller.type_enter("hello world").await;

    assert_eq!(
        transport.sent_frames(),
        vec![
            r#"{"type":"scroll","payload":{"direction":"down","percent":90}}"#,
            r#"{"type":"open_url","payload":"https://example.com/"}"#,
            r#"{"type":"send_button","payload":"volume_up"}"#,
            r#"{"type":"type_enter","payload":"hello world"}"#,
        ]
    );
    controller.shutdown().await;
}

#[tokio::test]
async fn test_empty_url_is_not_sent() {
    let (transport, controller) = make_controller();
    start_with_frame(&transport, &controller).await;

    controller.open_url("").await;

    assert!(transport.sent_frames().is_empty());
    controller.shutdown().await;
}

#[tokio::test]
async fn test_stop_disconnects_before_returning() {
    let (transport, controller) = make_controller();
    start_with_frame(&transport, &controller).await;

    controller.stop().await;

    assert_eq!(
        controller.channel().connection_state().await,
        ConnectionState::Disconnected
    );
    assert_eq!(transport.closed_sink_count(), 1);

    // Stopped means deaf: commands are dropped, not written.
    controller.scroll_page(ScrollDirection::Up).await;
    assert!(transport.sent_frames().is_empty());
    controller.shutdown().await;
}

#[tokio::test]
async fn test_custom_scroll_percent_from_config() {
    let transport = Arc::new(MockTransport::new());
    let config = ViewerConfig {
        scroll_percent: 45,
        ..ViewerConfig::default()
    };
    let controller =
        ViewerController::new(Arc::clone(&transport) as Arc<dyn Transport>, config);
    start_with_frame(&transport, &controller).await;

    controller.scroll_page(ScrollDirection::Up).await;

    assert_eq!(
        transport.sent_frames(),
        vec![r#"{"type":"scroll","payload":{"direction":"up","percent":45}}"#]
    );
    controller.shutdown().await;
}
