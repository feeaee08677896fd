use canvas::doc::ObjectKind;

use super::*;

// =============================================================================
// parse_click
// =============================================================================

#[test]
fn parse_click_reads_point_and_frame() {
    assert_eq!(parse_click("400,300@12"), Ok(ClickAt { x: 400.0, y: 300.0, frame: 12 }));
    assert_eq!(parse_click(" 1.5 , 2 @ 0"), Ok(ClickAt { x: 1.5, y: 2.0, frame: 0 }));
}

#[test]
fn parse_click_rejects_malformed_input() {
    for raw in ["400,300", "400@3", "a,b@1", "1,2@-1", ""] {
        assert!(parse_click(raw).is_err(), "{raw}");
    }
}

// =============================================================================
// Output formatting
// =============================================================================

#[test]
fn summary_lists_scenes() {
    let mut project = Project::new();
    project.create_object(ObjectKind::Panel).unwrap();
    project.add_scene("Bonus");
    let text = summary(&project);
    assert!(text.starts_with("2 scene(s), 0 sprite(s), 0 script(s), 0 animation(s)"));
    assert!(text.contains("  Main Scene (800x600, 1 object(s))"));
    assert!(text.contains("  Bonus (800x600, 0 object(s))"));
}

#[test]
fn object_table_has_header_and_row_per_object() {
    let objects = vec![GameObject::new(ObjectKind::Label), GameObject::new(ObjectKind::Panel)];
    let table = object_table(&objects);
    let lines: Vec<&str> = table.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("name"));
    assert!(lines[1].starts_with("New label"));
    assert!(lines[1].ends_with("LABEL TEXT"));
    assert!(lines[2].contains("panel"));
}

#[test]
fn cli_parses_play_flags() {
    let cli = Cli::try_parse_from(["stagehand", "play", "game.json", "--frames", "10", "--click", "1,2@3", "--click", "4,5@6"])
        .unwrap();
    let Command::Play(args) = cli.command else {
        panic!("expected play");
    };
    assert_eq!(args.frames, Some(10));
    assert_eq!(args.frame_ms, None);
    assert_eq!(args.clicks.len(), 2);
    assert_eq!(args.clicks[1], ClickAt { x: 4.0, y: 5.0, frame: 6 });
}

#[test]
fn missing_file_is_a_read_error() {
    let err = load_project(Path::new("/nonexistent/stagehand.json")).unwrap_err();
    assert!(matches!(err, CliError::Read { .. }));
}
