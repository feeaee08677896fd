mod config;

use std::fs;
use std::path::{Path, PathBuf};

use canvas::doc::{GameObject, Project};
use canvas::snapshot::{self, ImportError};
use canvas::surface::DrawLog;
use canvas::transform::Point;
use clap::{Args, Parser, Subcommand};
use player::export::{self, ExportError, PlayerBundle};
use player::session::{Session, SessionError};
use tracing_subscriber::EnvFilter;

use crate::config::Config;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("failed to read {path}: {source}")]
    Read { path: PathBuf, source: std::io::Error },
    #[error("failed to write {path}: {source}")]
    Write { path: PathBuf, source: std::io::Error },
    #[error("invalid project: {0}")]
    Import(#[from] ImportError),
    #[error("export failed: {0}")]
    Export(#[from] ExportError),
    #[error("playback failed: {0}")]
    Session(#[from] SessionError),
    #[error("missing player bundle; pass --{flag} or set {var}")]
    MissingBundle { flag: &'static str, var: &'static str },
}

#[derive(Parser, Debug)]
#[command(name = "stagehand", about = "Validate, export, and play Stagehand projects")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Import a project snapshot and print a summary.
    Validate { file: PathBuf },
    /// Re-serialize a project snapshot canonically.
    ExportJson {
        file: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Build a standalone HTML game.
    ExportHtml(ExportHtmlArgs),
    /// Play a project headlessly and print the final object state.
    Play(PlayArgs),
}

#[derive(Args, Debug)]
struct ExportHtmlArgs {
    file: PathBuf,
    #[arg(short, long)]
    output: Option<PathBuf>,
    #[arg(long)]
    player_js: Option<PathBuf>,
    #[arg(long)]
    player_wasm: Option<PathBuf>,
    #[arg(long)]
    title: Option<String>,
}

#[derive(Args, Debug)]
struct PlayArgs {
    file: PathBuf,
    #[arg(long)]
    frames: Option<u64>,
    #[arg(long)]
    frame_ms: Option<u64>,
    /// Click at `X,Y` just before frame `FRAME` renders. Repeatable.
    #[arg(long = "click", value_name = "X,Y@FRAME", value_parser = parse_click)]
    clicks: Vec<ClickAt>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct ClickAt {
    x: f64,
    y: f64,
    frame: u64,
}

fn parse_click(raw: &str) -> Result<ClickAt, String> {
    let invalid = || format!("expected X,Y@FRAME, got `{raw}`");
    let (point, frame) = raw.split_once('@').ok_or_else(invalid)?;
    let (x, y) = point.split_once(',').ok_or_else(invalid)?;
    Ok(ClickAt {
        x: x.trim().parse().map_err(|_| invalid())?,
        y: y.trim().parse().map_err(|_| invalid())?,
        frame: frame.trim().parse().map_err(|_| invalid())?,
    })
}

fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::from_env();

    match cli.command {
        Command::Validate { file } => run_validate(&file),
        Command::ExportJson { file, output } => run_export_json(&file, output.as_deref()),
        Command::ExportHtml(args) => run_export_html(args, &config),
        Command::Play(args) => run_play(args, &config),
    }
}

fn load_project(path: &Path) -> Result<Project, CliError> {
    let text = fs::read_to_string(path).map_err(|source| CliError::Read { path: path.to_path_buf(), source })?;
    let project = snapshot::from_json(&text)?;
    tracing::debug!(path = %path.display(), scenes = project.scenes.len(), "project loaded");
    Ok(project)
}

fn write_output(output: Option<&Path>, text: &str) -> Result<(), CliError> {
    match output {
        Some(path) => {
            fs::write(path, text).map_err(|source| CliError::Write { path: path.to_path_buf(), source })?;
            eprintln!("wrote {} ({} bytes)", path.display(), text.len());
        }
        None => println!("{text}"),
    }
    Ok(())
}

fn run_validate(file: &Path) -> Result<(), CliError> {
    let project = load_project(file)?;
    println!("{}", summary(&project));
    Ok(())
}

fn summary(project: &Project) -> String {
    let mut lines = vec![format!(
        "{} scene(s), {} sprite(s), {} script(s), {} animation(s)",
        project.scenes.len(),
        project.sprites.len(),
        project.scripts.len(),
        project.animations.len()
    )];
    for scene in &project.scenes {
        lines.push(format!(
            "  {} ({}x{}, {} object(s))",
            scene.name,
            scene.width,
            scene.height,
            scene.objects.len()
        ));
    }
    lines.join("\n")
}

fn run_export_json(file: &Path, output: Option<&Path>) -> Result<(), CliError> {
    let project = load_project(file)?;
    write_output(output, &export::export_json(&project)?)
}

fn run_export_html(args: ExportHtmlArgs, config: &Config) -> Result<(), CliError> {
    let project = load_project(&args.file)?;
    let glue = args
        .player_js
        .or_else(|| config.player_js.clone())
        .ok_or(CliError::MissingBundle { flag: "player-js", var: "STAGEHAND_PLAYER_JS" })?;
    let wasm = args
        .player_wasm
        .or_else(|| config.player_wasm.clone())
        .ok_or(CliError::MissingBundle { flag: "player-wasm", var: "STAGEHAND_PLAYER_WASM" })?;
    let bundle = PlayerBundle::load(&glue, &wasm)?;
    let title = args.title.unwrap_or_else(|| config.title.clone());
    let html = export::export_html(&project, &bundle, &title)?;
    write_output(args.output.as_deref(), &html)
}

#[allow(clippy::cast_precision_loss)]
fn run_play(args: PlayArgs, config: &Config) -> Result<(), CliError> {
    let project = load_project(&args.file)?;
    let frames = args.frames.unwrap_or(config.max_frames);
    let step = args.frame_ms.unwrap_or(config.frame_ms) as f64;

    let mut session = Session::start(&project, 0.0)?;
    let mut surface = DrawLog::new();
    let mut draw_calls = 0usize;
    for frame in 0..frames {
        for click in args.clicks.iter().filter(|c| c.frame == frame) {
            match session.click(Point::new(click.x, click.y)) {
                Some(id) => tracing::info!(frame, %id, "click dispatched"),
                None => tracing::info!(frame, x = click.x, y = click.y, "click hit no handler"),
            }
        }
        match session.frame(frame as f64 * step, &mut surface) {
            Ok(()) => {}
            Err(never) => match never {},
        }
        draw_calls += surface.take_calls().len();
        for line in session.take_logs() {
            println!("[script] {line}");
        }
    }
    session.stop();

    println!("played {frames} frame(s), {draw_calls} draw call(s)");
    for fault in session.faults() {
        println!("fault in {}: {}", fault.origin, fault.error);
    }
    println!("{}", object_table(&session.objects()));
    Ok(())
}

fn object_table(objects: &[GameObject]) -> String {
    let mut lines = vec![format!(
        "{:<20} {:<7} {:>8} {:>8} {:>7} {:>7} {:>7} {:>5} {:>5}  {}",
        "name", "kind", "x", "y", "width", "height", "rot", "layer", "vis", "text"
    )];
    for o in objects {
        lines.push(format!(
            "{:<20} {:<7} {:>8.1} {:>8.1} {:>7.1} {:>7.1} {:>7.1} {:>5} {:>5}  {}",
            o.name,
            o.kind.as_str(),
            o.x,
            o.y,
            o.width,
            o.height,
            o.rotation,
            o.layer,
            o.visible,
            o.text.as_deref().unwrap_or("")
        ));
    }
    lines.join("\n")
}

#[cfg(test)]
#[path = "main_test.rs"]
mod tests;
