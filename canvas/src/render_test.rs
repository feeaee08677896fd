use super::*;
use crate::doc::ObjectPatch;
use crate::surface::{DrawCall, DrawLog};

fn unwrap_infallible(r: Result<(), std::convert::Infallible>) {
    match r {
        Ok(()) => {}
        Err(never) => match never {},
    }
}

fn fills(log: &DrawLog) -> Vec<String> {
    log.calls()
        .iter()
        .filter_map(|c| match c {
            DrawCall::FillRect { color, .. } => Some(color.clone()),
            _ => None,
        })
        .collect()
}

fn sprite_project() -> (Project, uuid::Uuid, uuid::Uuid) {
    let mut project = Project::new();
    let sprite = project.add_sprite("hero", "hero.png", 32.0, 32.0);
    let obj = project.create_object(ObjectKind::Sprite).unwrap();
    let patch = ObjectPatch { sprite: Some(Some(sprite)), ..Default::default() };
    project.update_object(&obj, &patch).unwrap();
    (project, sprite, obj)
}

// =============================================================
// Sprites
// =============================================================

#[test]
fn sprite_draws_placeholder_until_image_ready() {
    let (project, sprite, _) = sprite_project();
    let scene = project.current_scene().unwrap();
    let mut log = DrawLog::new();

    unwrap_infallible(draw_runtime(&mut log, scene, &project.sprites));
    assert_eq!(log.requested_url(ImageKey::Sprite(sprite)), Some("hero.png"));
    assert_eq!(log.image_count(), 0);
    assert!(fills(&log).contains(&PLACEHOLDER_FILL.to_owned()));

    log.take_calls();
    log.mark_ready(ImageKey::Sprite(sprite));
    unwrap_infallible(draw_runtime(&mut log, scene, &project.sprites));
    assert_eq!(log.image_count(), 1);
    assert!(!fills(&log).contains(&PLACEHOLDER_FILL.to_owned()));
}

#[test]
fn deleted_sprite_falls_back_to_placeholder() {
    let (mut project, sprite, _) = sprite_project();
    let mut log = DrawLog::new();
    log.mark_ready(ImageKey::Sprite(sprite));
    project.delete_sprite(&sprite).unwrap();

    let scene = project.current_scene().unwrap();
    unwrap_infallible(draw_runtime(&mut log, scene, &project.sprites));
    assert_eq!(log.image_count(), 0);
    assert!(fills(&log).contains(&PLACEHOLDER_FILL.to_owned()));
}

// =============================================================
// Object variants
// =============================================================

#[test]
fn button_and_label_text_defaults() {
    let mut project = Project::new();
    let button = project.create_object(ObjectKind::Button).unwrap();
    let label = project.create_object(ObjectKind::Label).unwrap();
    let clear_text = ObjectPatch { text: Some(None), ..Default::default() };
    project.update_object(&button, &clear_text).unwrap();
    project.update_object(&label, &clear_text).unwrap();

    let mut log = DrawLog::new();
    unwrap_infallible(draw_runtime(&mut log, project.current_scene().unwrap(), &[]));
    assert_eq!(log.texts(), vec!["BUTTON", "LABEL"]);
}

#[test]
fn label_uses_font_size_and_color() {
    let mut project = Project::new();
    let label = project.create_object(ObjectKind::Label).unwrap();
    let patch = ObjectPatch {
        font_size: Some(Some(24.0)),
        color: Some(Some("#ff0000".into())),
        text: Some(Some("Score".into())),
        ..Default::default()
    };
    project.update_object(&label, &patch).unwrap();

    let mut log = DrawLog::new();
    unwrap_infallible(draw_runtime(&mut log, project.current_scene().unwrap(), &[]));
    let text = log.calls().iter().find(|c| matches!(c, DrawCall::Text { .. })).cloned();
    assert_eq!(
        text,
        Some(DrawCall::Text {
            text: "Score".into(),
            x: 0.0,
            y: 0.0,
            font: "bold 24px Arial".into(),
            color: "#ff0000".into(),
        })
    );
}

#[test]
fn objects_draw_in_layer_order_and_skip_invisible() {
    let mut project = Project::new();
    let a = project.create_object(ObjectKind::Label).unwrap();
    let b = project.create_object(ObjectKind::Label).unwrap();
    let c = project.create_object(ObjectKind::Label).unwrap();
    for (id, text, layer) in [(a, "a", 5), (b, "b", 1), (c, "c", 3)] {
        let patch = ObjectPatch { text: Some(Some(text.into())), layer: Some(layer), ..Default::default() };
        project.update_object(&id, &patch).unwrap();
    }
    project.update_object(&c, &ObjectPatch { visible: Some(false), ..Default::default() }).unwrap();

    let mut log = DrawLog::new();
    unwrap_infallible(draw_runtime(&mut log, project.current_scene().unwrap(), &[]));
    assert_eq!(log.texts(), vec!["b", "a"]);
}

#[test]
fn object_transform_is_translate_rotate_scale() {
    let mut project = Project::new();
    let id = project.create_object(ObjectKind::Panel).unwrap();
    let patch = ObjectPatch {
        x: Some(10.0),
        y: Some(20.0),
        rotation: Some(90.0),
        scale_x: Some(2.0),
        scale_y: Some(0.5),
        ..Default::default()
    };
    project.update_object(&id, &patch).unwrap();

    let mut log = DrawLog::new();
    unwrap_infallible(draw_runtime(&mut log, project.current_scene().unwrap(), &[]));
    let calls = log.calls();
    let start = calls.iter().position(|c| *c == DrawCall::Save).unwrap();
    assert_eq!(calls[start + 1], DrawCall::Translate { x: 10.0, y: 20.0 });
    assert_eq!(calls[start + 2], DrawCall::Rotate { radians: 90f64.to_radians() });
    assert_eq!(calls[start + 3], DrawCall::Scale { x: 2.0, y: 0.5 });
    assert_eq!(calls.last(), Some(&DrawCall::Restore));
}

// =============================================================
// Backdrop
// =============================================================

#[test]
fn background_image_replaces_color_once_ready() {
    let mut project = Project::new();
    let scene_id = project.current_scene_id().unwrap();
    let patch = crate::doc::ScenePatch { background_image: Some(Some("bg.png".into())), ..Default::default() };
    project.update_scene(&scene_id, &patch).unwrap();
    let scene = project.current_scene().unwrap();

    let mut log = DrawLog::new();
    unwrap_infallible(draw_runtime(&mut log, scene, &[]));
    assert_eq!(fills(&log), vec!["#ffffff".to_owned()]);

    log.take_calls();
    log.mark_ready(ImageKey::Background(scene_id));
    unwrap_infallible(draw_runtime(&mut log, scene, &[]));
    assert_eq!(log.image_count(), 1);
    assert!(fills(&log).is_empty());
}

// =============================================================
// Editor
// =============================================================

#[test]
fn editor_draws_grid_and_name_tags() {
    let mut project = Project::new();
    project.create_object(ObjectKind::Panel).unwrap();
    let mut log = DrawLog::new();
    unwrap_infallible(draw_editor(&mut log, &project, &UiState::default()));

    let lines = log.calls().iter().filter(|c| matches!(c, DrawCall::Line { .. })).count();
    // 800 / 50 vertical plus 600 / 50 horizontal.
    assert_eq!(lines, 16 + 12);
    assert_eq!(log.texts(), vec!["New panel"]);
    assert!(!log.calls().iter().any(|c| matches!(c, DrawCall::LineDash(_))));
}

#[test]
fn editor_draws_selection_overlay_for_selected_only() {
    let mut project = Project::new();
    let id = project.create_object(ObjectKind::Panel).unwrap();
    project.create_object(ObjectKind::Panel).unwrap();
    let ui = UiState { selected_id: Some(id), ..UiState::default() };

    let mut log = DrawLog::new();
    unwrap_infallible(draw_editor(&mut log, &project, &ui));
    let calls = log.calls();

    let dash = calls.iter().position(|c| *c == DrawCall::LineDash(vec![5.0, 5.0])).unwrap();
    assert_eq!(
        calls[dash + 1],
        DrawCall::StrokeRect { x: -55.0, y: -55.0, w: 110.0, h: 110.0, color: SELECTION_COLOR.into(), width: 3.0 }
    );
    let handles = calls[dash..]
        .iter()
        .filter(|c| matches!(c, DrawCall::FillRect { color, .. } if color == HANDLE_FILL))
        .count();
    assert_eq!(handles, 4);
    assert!(calls[dash..].contains(&DrawCall::Circle { x: 0.0, y: -80.0, radius: ROTATE_KNOB_RADIUS }));
    // The overlay frame is not scaled.
    assert!(!calls[dash..].iter().any(|c| matches!(c, DrawCall::Scale { .. })));
}

#[test]
fn editor_without_scene_draws_nothing() {
    let project = Project::empty();
    let mut log = DrawLog::new();
    unwrap_infallible(draw_editor(&mut log, &project, &UiState::default()));
    assert!(log.calls().is_empty());
}
