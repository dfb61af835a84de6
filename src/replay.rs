//! Replay scripts: recorded pointer events and UI commands driven through the
//! engine offline.

use anyhow::{Context, Result};
use inkslate::config::ColorSpec;
use inkslate::draw::StrokeCompositor;
use inkslate::input::{InputRouter, RawEvent};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// A recorded session.
///
/// # Example JSON
/// ```json
/// {
///   "width": 200,
///   "height": 120,
///   "steps": [
///     { "op": "event", "action": "down", "x": 10, "y": 10, "pressure": 0.3, "tool": "stylus" },
///     { "op": "event", "action": "move", "x": 80, "y": 40, "pressure": 0.6, "tool": "stylus" },
///     { "op": "event", "action": "up", "x": 120, "y": 60, "tool": "stylus" },
///     { "op": "set_color", "color": "red" },
///     { "op": "undo" }
///   ]
/// }
/// ```
#[derive(Debug, Deserialize)]
pub struct Script {
    /// Canvas width; falls back to `[canvas]` from the config
    #[serde(default)]
    pub width: Option<u32>,
    /// Canvas height; falls back to `[canvas]` from the config
    #[serde(default)]
    pub height: Option<u32>,
    pub steps: Vec<Step>,
}

/// One scripted input.
#[derive(Debug, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    /// Raw pointer event routed through the active backend
    Event(RawEvent),
    Undo,
    Clear,
    SetColor { color: ColorSpec },
    SetWidth { width: f64 },
    ShowPrediction { show: bool },
    Resize { width: u32, height: u32 },
}

/// Counters reported after a replay.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReplayStats {
    pub events: usize,
    pub ignored_events: usize,
    pub undos: usize,
}

impl Script {
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read script {}", path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse script {}", path.display()))
    }
}

/// Feeds every step of `script` through `router` into `compositor`.
pub fn run(
    script: &Script,
    router: &mut InputRouter,
    compositor: &mut StrokeCompositor,
) -> Result<ReplayStats> {
    let mut stats = ReplayStats::default();

    for (index, step) in script.steps.iter().enumerate() {
        match step {
            Step::Event(event) => {
                stats.events += 1;
                if !router.handle(event, compositor) {
                    stats.ignored_events += 1;
                }
            }
            Step::Undo => {
                if compositor.undo() {
                    stats.undos += 1;
                }
            }
            Step::Clear => compositor.clear(),
            Step::SetColor { color } => compositor.set_color(color.to_color()),
            Step::SetWidth { width } => {
                compositor.set_base_width(*width);
            }
            Step::ShowPrediction { show } => compositor.set_show_prediction(*show),
            Step::Resize { width, height } => compositor
                .resize(*width, *height)
                .with_context(|| format!("Step {} failed to resize canvas", index + 1))?,
        }
    }

    Ok(stats)
}
