use clap::{ArgAction, Parser};
use serde::Deserialize;
use std::path::PathBuf;

use telescriber::annotation::{AnnotationId, AnnotationStore, RedrawSignal, SharedAnnotationStore};
use telescriber::camera::CameraTransform;
use telescriber::config::Config;
use telescriber::flags::ModeFlags;
use telescriber::gesture::{DispatchCtx, GestureDispatcher, GestureEvent, NullGui};
use telescriber::notify::NotificationSink;

#[derive(Parser, Debug)]
#[command(name = "telescriber")]
#[command(version, about = "Telestration core: replay gesture traces through the pipeline")]
struct Cli {
    /// Gesture trace to replay (one JSON entry per line)
    #[arg(value_name = "TRACE")]
    trace: PathBuf,

    /// Initial interaction mode (lines, points, or select)
    #[arg(long, short = 'm', value_name = "MODE", default_value = "select")]
    mode: String,

    /// Config file to use instead of the user config directory
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Print the final annotation contents in the legacy wire format
    #[arg(long, action = ArgAction::SetTrue)]
    dump_wire: bool,
}

/// One line of a gesture trace.
///
/// Entries are either gesture events, keyboard presses (camera controls),
/// or mode switches taking effect from that point on.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TraceEntry {
    Gesture(GestureEvent),
    Key { key: char },
    Mode { mode: String },
}

/// Prints every lifecycle event as one JSON line on stdout.
struct JsonLineSink;

impl NotificationSink for JsonLineSink {
    fn notify_create(&mut self, id: AnnotationId, points: &[f64]) {
        println!(
            "{}",
            serde_json::json!({ "event": "create", "id": id, "points": points })
        );
    }

    fn notify_update(&mut self, id: AnnotationId, points: &[f64]) {
        println!(
            "{}",
            serde_json::json!({ "event": "update", "id": id, "points": points })
        );
    }

    fn notify_delete(&mut self, id: AnnotationId) {
        println!("{}", serde_json::json!({ "event": "delete", "id": id }));
    }
}

fn apply_mode(flags: &mut ModeFlags, mode: &str) -> anyhow::Result<()> {
    match mode {
        "lines" => {
            flags.lines_drawable = true;
            flags.points_drawable = false;
        }
        "points" => {
            flags.lines_drawable = false;
            flags.points_drawable = true;
        }
        "select" => {
            flags.lines_drawable = false;
            flags.points_drawable = false;
        }
        other => anyhow::bail!("unknown mode '{other}' (expected lines, points, or select)"),
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    let store = SharedAnnotationStore::new(AnnotationStore::new(Box::new(JsonLineSink)));
    let mut camera = CameraTransform::new(config.camera.clone(), &config.resolution);
    let mut dispatcher = GestureDispatcher::new(
        config.gesture.clone(),
        config.resolution.clone(),
        config.calibration.clone(),
    );
    let mut flags = ModeFlags::new();
    let mut gui = NullGui;
    let redraw = RedrawSignal::new();

    apply_mode(&mut flags, &cli.mode)?;

    let trace = std::fs::read_to_string(&cli.trace).map_err(|err| {
        anyhow::anyhow!("failed to read trace {}: {err}", cli.trace.display())
    })?;

    let mut replayed = 0usize;
    let mut rejected = 0usize;

    for (line_no, line) in trace.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let entry: TraceEntry = serde_json::from_str(line).map_err(|err| {
            anyhow::anyhow!("trace line {}: invalid entry: {err}", line_no + 1)
        })?;

        match entry {
            TraceEntry::Gesture(event) => {
                let mut ctx = DispatchCtx {
                    store: &store,
                    camera: &mut camera,
                    flags: &mut flags,
                    gui: &mut gui,
                    redraw: &redraw,
                };
                match dispatcher.dispatch(&event, &mut ctx) {
                    Ok(()) => replayed += 1,
                    Err(err) => {
                        // A malformed event never stops the loop.
                        log::warn!("trace line {}: {err}", line_no + 1);
                        rejected += 1;
                    }
                }
            }
            TraceEntry::Key { key } => {
                if !camera.handle_key(key) {
                    log::debug!("trace line {}: key '{key}' not a camera control", line_no + 1);
                }
                replayed += 1;
            }
            TraceEntry::Mode { mode } => {
                apply_mode(&mut flags, &mode)?;
                log::info!("Switched to {mode} mode");
                replayed += 1;
            }
        }
    }

    println!(
        "replayed {replayed} entr{} ({rejected} rejected)",
        if replayed == 1 { "y" } else { "ies" }
    );

    store.with(|store| {
        println!(
            "{} annotation(s) in store, {} selected",
            store.len(),
            store.selected_ids().len()
        );
        if cli.dump_wire {
            for id in store.ids().collect::<Vec<_>>() {
                if let Some(wire) = store.wire_string(id) {
                    println!("  #{id}: {wire}");
                }
            }
        }
    });

    let (scale, rotation, translation) = (
        camera.scale(),
        camera.rotation_degrees(),
        camera.translation(),
    );
    println!(
        "camera: scale {scale:.2}, rotation {rotation:.1} deg, translation ({:.1}, {:.1})",
        translation.0, translation.1
    );

    Ok(())
}
