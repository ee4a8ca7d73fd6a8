//! Scripted session replay.
//!
//! A script is a JSON array of steps. Each step is either an action
//! envelope (`{"type": "MOVE", "payload": {...}}`), one of the bare
//! commands `"UNDO"`, `"REDO"` or `"CLEAR_HISTORY"`, or a single-key
//! object:
//!
//! - `{"JUMP_TO": 3}` travels to timeline index 3
//! - `{"IMPORT": {...}}` imports an interchange file
//! - `{"DRAG": {"id": "a", "x": 10, "y": 20}}` drags an item with snapping

use std::fmt::Write as _;

use easel_designer::{Action, History, Session, Transition};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

/// Errors raised while reading or replaying a script.
#[derive(Error, Debug)]
pub enum ScriptError {
    #[error("Script is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Script must be a JSON array of steps")]
    NotAList,

    #[error("Step {index}: {reason}")]
    InvalidStep { index: usize, reason: String },

    #[error("Step {index}: {source}")]
    Step {
        index: usize,
        #[source]
        source: easel_core::Error,
    },
}

/// Target of a scripted drag.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DragStep {
    pub id: String,
    pub x: f64,
    pub y: f64,
}

/// One step of a script.
#[derive(Debug, Clone, PartialEq)]
pub enum ScriptStep {
    Dispatch(Action),
    Undo,
    Redo,
    ClearHistory,
    JumpTo(usize),
    Import(String),
    Drag(DragStep),
}

impl ScriptStep {
    fn from_value(index: usize, value: Value) -> Result<Self, ScriptError> {
        let invalid = |reason: String| ScriptError::InvalidStep { index, reason };

        match value {
            Value::String(command) => match command.as_str() {
                "UNDO" => Ok(ScriptStep::Undo),
                "REDO" => Ok(ScriptStep::Redo),
                "CLEAR_HISTORY" => Ok(ScriptStep::ClearHistory),
                other => Err(invalid(format!("unknown command {:?}", other))),
            },
            Value::Object(mut map) if map.len() == 1 && !map.contains_key("type") => {
                if let Some(target) = map.remove("JUMP_TO") {
                    let index = target
                        .as_u64()
                        .ok_or_else(|| invalid("JUMP_TO needs a non-negative index".into()))?;
                    return Ok(ScriptStep::JumpTo(index as usize));
                }
                if let Some(file) = map.remove("IMPORT") {
                    return Ok(ScriptStep::Import(file.to_string()));
                }
                if let Some(drag) = map.remove("DRAG") {
                    let drag = serde_json::from_value(drag)
                        .map_err(|e| invalid(format!("DRAG: {}", e)))?;
                    return Ok(ScriptStep::Drag(drag));
                }
                let key = map.keys().next().cloned().unwrap_or_default();
                Err(invalid(format!("unknown command {:?}", key)))
            }
            value => Action::from_value(value)
                .map(ScriptStep::Dispatch)
                .map_err(|e| ScriptError::Step {
                    index,
                    source: e.into(),
                }),
        }
    }
}

/// Parses a script document.
pub fn parse_script(json: &str) -> Result<Vec<ScriptStep>, ScriptError> {
    match serde_json::from_str::<Value>(json)? {
        Value::Array(steps) => steps
            .into_iter()
            .enumerate()
            .map(|(index, step)| ScriptStep::from_value(index, step))
            .collect(),
        _ => Err(ScriptError::NotAList),
    }
}

/// Counts of what a replay did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplaySummary {
    pub steps: usize,
    pub recorded: usize,
    pub travelled: usize,
    pub unchanged: usize,
}

impl ReplaySummary {
    fn count(&mut self, transition: Transition) {
        self.steps += 1;
        match transition {
            Transition::Recorded => self.recorded += 1,
            Transition::Travelled => self.travelled += 1,
            Transition::Unchanged => self.unchanged += 1,
            Transition::ViewUpdated | Transition::Synced => {}
        }
    }
}

/// Runs `steps` against `session` in order.
///
/// A failing import stops the replay; every step before it stays applied.
pub fn replay(session: &mut Session, steps: &[ScriptStep]) -> Result<ReplaySummary, ScriptError> {
    let mut summary = ReplaySummary::default();

    for (index, step) in steps.iter().enumerate() {
        let transition =
            run_step(session, step).map_err(|source| ScriptError::Step { index, source })?;
        tracing::debug!("Step {}: {:?}", index, transition);
        summary.count(transition);
    }

    Ok(summary)
}

fn run_step(session: &mut Session, step: &ScriptStep) -> easel_core::Result<Transition> {
    let transition = match step {
        ScriptStep::Dispatch(action) => session.dispatch(action),
        ScriptStep::Undo => session.undo(),
        ScriptStep::Redo => session.redo(),
        ScriptStep::ClearHistory => session.clear_history(),
        ScriptStep::JumpTo(target) => session.jump_to(*target),
        ScriptStep::Import(file) => session.import_json(file)?,
        ScriptStep::Drag(target) => drag(session, target),
    };
    Ok(transition)
}

fn drag(session: &mut Session, target: &DragStep) -> Transition {
    let Some(mut drag) = session.begin_drag(&target.id) else {
        tracing::warn!("Cannot drag {}: missing or locked", target.id);
        return Transition::Unchanged;
    };
    drag.update(session.document(), target.x, target.y);
    session.preview_drag(&drag);
    session.finish_drag(drag)
}

/// Renders the history timeline, one snapshot per line, with `*` on the
/// present.
pub fn render_timeline(history: &History) -> String {
    let current = history.current_index();
    let labels = std::iter::once("(start)")
        .chain(history.past_entries().iter().map(|e| e.description.as_str()))
        .chain(history.future_entries().iter().map(|e| e.description.as_str()));

    let mut out = String::new();
    for (index, label) in labels.enumerate() {
        let marker = if index == current { '*' } else { ' ' };
        let _ = writeln!(out, "{} [{}] {}", marker, index, label);
    }
    out
}
