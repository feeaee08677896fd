//! End-to-end playback: snapshot JSON in, frames and clicks through a session.

use canvas::doc::{ObjectKind, ObjectPatch, Project};
use canvas::snapshot;
use canvas::surface::{DrawLog, ImageKey};
use canvas::transform::Point;
use player::session::Session;

fn frame(session: &mut Session, now: f64, log: &mut DrawLog) {
    match session.frame(now, log) {
        Ok(()) => {}
        Err(never) => match never {},
    }
}

/// Snapshot of a game: a score label, a button that bumps the score and
/// slides itself right, and a sprite with an image.
fn game_json() -> String {
    let mut project = Project::new();
    let sprite = project.add_sprite("coin", "coin.png", 16.0, 16.0);

    let score = project.create_object(ObjectKind::Label).unwrap();
    project
        .update_object(
            &score,
            &ObjectPatch { name: Some("Score".into()), text: Some(Some("0".into())), ..ObjectPatch::position(100.0, 50.0) },
        )
        .unwrap();

    let button = project.create_object(ObjectKind::Button).unwrap();
    project
        .update_object(&button, &ObjectPatch { name: Some("Go".into()), on_click: Some(Some("onGo".into())), ..Default::default() })
        .unwrap();

    let coin = project.create_object(ObjectKind::Sprite).unwrap();
    project
        .update_object(&coin, &ObjectPatch { sprite: Some(Some(sprite)), ..ObjectPatch::position(700.0, 500.0) })
        .unwrap();

    project.add_script(
        "game",
        r#"
        fn onGo() {
            let v = vars();
            v["score"] = v.get("score", 0) + 1;
            updateLabel(getObjectByName("Score"), `${v["score"]}`);
            tween(getObjectByName("Go"), "x", 600, 200, || log("slid"));
        }
        "#,
    );
    snapshot::to_json(&project).unwrap()
}

#[test]
fn clicks_score_and_tween_across_frames() {
    let project = snapshot::from_json(&game_json()).unwrap();
    let mut session = Session::start(&project, 0.0).unwrap();
    let mut log = DrawLog::new();
    frame(&mut session, 0.0, &mut log);

    let go = session.scene().by_name("Go").unwrap().borrow().id;
    assert_eq!(session.click(Point::new(400.0, 300.0)), Some(go));
    frame(&mut session, 100.0, &mut log);
    frame(&mut session, 200.0, &mut log);
    frame(&mut session, 300.0, &mut log);

    let objects = session.objects();
    let score = objects.iter().find(|o| o.name == "Score").unwrap();
    assert_eq!(score.text.as_deref(), Some("1"));
    let button = objects.iter().find(|o| o.name == "Go").unwrap();
    assert!((button.x - 600.0).abs() < f64::EPSILON);
    assert_eq!(session.take_logs(), vec!["slid".to_owned()]);
    assert!(session.faults().is_empty());

    // The button moved away; the old spot is empty now.
    assert_eq!(session.click(Point::new(400.0, 300.0)), None);
}

#[test]
fn sprite_image_replaces_placeholder_once_loaded() {
    let project = snapshot::from_json(&game_json()).unwrap();
    let sprite = project.sprites[0].id;
    let mut session = Session::start(&project, 0.0).unwrap();
    let mut log = DrawLog::new();

    frame(&mut session, 0.0, &mut log);
    assert_eq!(log.requested_url(ImageKey::Sprite(sprite)), Some("coin.png"));
    assert_eq!(log.image_count(), 0);

    log.take_calls();
    log.mark_ready(ImageKey::Sprite(sprite));
    frame(&mut session, 16.0, &mut log);
    assert_eq!(log.image_count(), 1);
}
