use uuid::Uuid;

use super::*;

#[test]
fn draw_log_records_current_styles() {
    let mut log = DrawLog::new();
    log.set_fill("#123456");
    log.fill_rect(1.0, 2.0, 3.0, 4.0);
    log.set_stroke("#abcdef", 3.0);
    log.stroke_rect(0.0, 0.0, 5.0, 5.0);
    assert_eq!(
        log.calls(),
        &[
            DrawCall::FillRect { x: 1.0, y: 2.0, w: 3.0, h: 4.0, color: "#123456".into() },
            DrawCall::StrokeRect { x: 0.0, y: 0.0, w: 5.0, h: 5.0, color: "#abcdef".into(), width: 3.0 },
        ]
    );
}

#[test]
fn draw_log_texts_and_take() {
    let mut log = DrawLog::new();
    log.fill_text("hello", 0.0, 0.0, "bold 16px Arial", TextAlign::Center).unwrap();
    log.save();
    log.fill_text("world", 0.0, 0.0, "bold 16px Arial", TextAlign::Left).unwrap();
    assert_eq!(log.texts(), vec!["hello", "world"]);
    assert_eq!(log.take_calls().len(), 3);
    assert!(log.calls().is_empty());
}

#[test]
fn images_are_not_ready_until_marked() {
    let mut log = DrawLog::new();
    let key = ImageKey::Sprite(Uuid::new_v4());
    log.load_image(key, "a.png").unwrap();
    assert!(!log.image_ready(key));
    log.mark_ready(key);
    assert!(log.image_ready(key));
}

#[test]
fn first_requested_url_sticks() {
    let mut log = DrawLog::new();
    let key = ImageKey::Background(Uuid::new_v4());
    log.load_image(key, "first.png").unwrap();
    log.load_image(key, "second.png").unwrap();
    assert_eq!(log.requested_url(key), Some("first.png"));
}

#[test]
fn finished_loads_are_reported_once() {
    let mut log = DrawLog::new();
    let key = ImageKey::Sprite(Uuid::new_v4());
    assert!(!log.take_loaded());
    log.load_image(key, "a.png").unwrap();
    assert!(!log.take_loaded());
    log.mark_ready(key);
    assert!(log.take_loaded());
    assert!(!log.take_loaded());
    log.load_image(key, "a.png").unwrap();
    assert!(!log.take_loaded());
}
