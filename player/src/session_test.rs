#![allow(clippy::float_cmp)]

use canvas::doc::{ObjectKind, ObjectPatch};
use canvas::surface::{DrawCall, DrawLog};

use super::*;

fn draw(session: &mut Session, now: f64, log: &mut DrawLog) {
    match session.frame(now, log) {
        Ok(()) => {}
        Err(never) => match never {},
    }
}

/// A project whose button at (400, 300) counts clicks through a script.
fn counter_project() -> (Project, ObjectId) {
    let mut project = Project::new();
    let button = project.create_object(ObjectKind::Button).unwrap();
    let patch = ObjectPatch { name: Some("Counter".into()), on_click: Some(Some("onClick".into())), ..Default::default() };
    project.update_object(&button, &patch).unwrap();
    project.add_script(
        "counter",
        "fn onClick() {
            let v = vars();
            v[\"count\"] = v.get(\"count\", 0) + 1;
            let b = getObjectByName(\"Counter\");
            updateLabel(b, `Clicks: ${v[\"count\"]}`);
        }",
    );
    (project, button)
}

fn count(session: &Session) -> Option<i64> {
    session.sandbox().var("count").map(|v| v.as_int().unwrap())
}

#[test]
fn start_without_scene_fails() {
    let project = Project::empty();
    assert_eq!(Session::start(&project, 0.0).err(), Some(SessionError::NoScene));
}

#[test]
fn click_runs_handler_exactly_once() {
    let (project, button) = counter_project();
    let mut session = Session::start(&project, 0.0).unwrap();
    assert!(session.faults().is_empty());

    assert_eq!(session.click(Point::new(400.0, 300.0)), Some(button));
    assert_eq!(count(&session), Some(1));
    assert_eq!(session.object(&button).unwrap().text.as_deref(), Some("Clicks: 1"));

    assert_eq!(session.click(Point::new(420.0, 310.0)), Some(button));
    assert_eq!(count(&session), Some(2));
}

#[test]
fn click_on_empty_space_does_nothing() {
    let (project, _) = counter_project();
    let mut session = Session::start(&project, 0.0).unwrap();
    assert_eq!(session.click(Point::new(10.0, 10.0)), None);
    assert_eq!(count(&session), None);
}

#[test]
fn playback_leaves_document_untouched() {
    let (project, button) = counter_project();
    let mut session = Session::start(&project, 0.0).unwrap();
    session.click(Point::new(400.0, 300.0));
    assert_eq!(project.object(&button).unwrap().text.as_deref(), Some("BUTTON"));
}

#[test]
fn frame_runs_tweens_before_update() {
    let mut project = Project::new();
    let id = project.create_object(ObjectKind::Panel).unwrap();
    project.add_script(
        "motion",
        &format!(
            "tween(\"{id}\", \"x\", 500, 100);
            fn update(dt) {{
                let v = vars();
                v[\"seen\"] = gameObjects()[\"{id}\"].x;
                v[\"dt\"] = dt;
            }}"
        ),
    );
    let mut session = Session::start(&project, 0.0).unwrap();
    let mut log = DrawLog::new();

    draw(&mut session, 0.0, &mut log);
    assert_eq!(session.sandbox().var("dt").unwrap().as_float(), Ok(0.0));
    draw(&mut session, 50.0, &mut log);
    assert_eq!(session.sandbox().var("seen").unwrap().as_float(), Ok(450.0));
    assert_eq!(session.sandbox().var("dt").unwrap().as_float(), Ok(50.0));
    assert_eq!(session.frames(), 2);
}

#[test]
fn overlay_draws_after_objects() {
    let mut project = Project::new();
    project.create_object(ObjectKind::Panel).unwrap();
    project.add_script("hud", "fn update(dt) { let c = canvas(); c.fillStyle = \"#00ff00\"; c.fillRect(0, 0, 10, 10); }");
    let mut session = Session::start(&project, 0.0).unwrap();
    let mut log = DrawLog::new();
    draw(&mut session, 0.0, &mut log);

    let calls = log.calls();
    let last_restore = calls.iter().rposition(|c| *c == DrawCall::Restore).unwrap();
    let overlay = calls
        .iter()
        .position(|c| matches!(c, DrawCall::FillRect { color, .. } if color == "#00ff00"))
        .unwrap();
    assert!(overlay > last_restore);
    assert!(matches!(calls[0], DrawCall::Clear { .. }));
}

#[test]
fn stop_halts_frames_and_clicks() {
    let (project, _) = counter_project();
    let mut session = Session::start(&project, 0.0).unwrap();
    session.stop();
    assert!(session.is_stopped());

    let mut log = DrawLog::new();
    draw(&mut session, 16.0, &mut log);
    assert!(log.calls().is_empty());
    assert_eq!(session.click(Point::new(400.0, 300.0)), None);
    assert_eq!(count(&session), None);
    assert_eq!(session.frames(), 0);
}

#[test]
fn script_faults_do_not_stop_playback() {
    let (mut project, button) = counter_project();
    project.add_script("broken", "this is not rhai");
    let mut session = Session::start(&project, 0.0).unwrap();
    assert_eq!(session.faults().len(), 1);
    assert_eq!(session.click(Point::new(400.0, 300.0)), Some(button));
    assert_eq!(count(&session), Some(1));
}

#[test]
fn invisible_objects_are_not_drawn() {
    let mut project = Project::new();
    let id = project.create_object(ObjectKind::Label).unwrap();
    let label = project.create_object(ObjectKind::Label).unwrap();
    project.update_object(&label, &ObjectPatch { text: Some(Some("shown".into())), ..Default::default() }).unwrap();
    project.add_script("hide", &format!("let h = gameObjects[\"{id}\"]; h.visible = false;"));
    let mut session = Session::start(&project, 0.0).unwrap();
    let mut log = DrawLog::new();
    draw(&mut session, 0.0, &mut log);
    assert_eq!(log.texts(), vec!["shown"]);
}

#[test]
fn attached_scripts_update_their_own_objects() {
    let mut project = Project::new();
    let left = project.create_object(ObjectKind::Panel).unwrap();
    let right = project.create_object(ObjectKind::Panel).unwrap();
    let plain = project.create_object(ObjectKind::Panel).unwrap();
    let drift = ObjectPatch { script: Some(Some("drift".into())), ..ObjectPatch::position(100.0, 100.0) };
    project.update_object(&left, &drift).unwrap();
    let spin = ObjectPatch { script: Some(Some("spin".into())), ..ObjectPatch::position(500.0, 100.0) };
    project.update_object(&right, &spin).unwrap();
    project.update_object(&plain, &ObjectPatch::position(300.0, 400.0)).unwrap();
    project.add_script("drift", "fn update(dt, obj) { obj.x += dt / 10.0; }");
    project.add_script("spin", "fn update(dt, obj) { obj.rotation += 1.0; }");

    let mut session = Session::start(&project, 0.0).unwrap();
    let mut log = DrawLog::new();
    draw(&mut session, 0.0, &mut log);
    draw(&mut session, 100.0, &mut log);

    let left = session.object(&left).unwrap();
    assert_eq!((left.x, left.rotation), (110.0, 0.0));
    let right = session.object(&right).unwrap();
    assert_eq!((right.x, right.rotation), (500.0, 2.0));
    let plain = session.object(&plain).unwrap();
    assert_eq!((plain.x, plain.rotation), (300.0, 0.0));
    assert!(session.faults().is_empty());
}
