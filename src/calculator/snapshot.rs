//! Read-only view of a calculator session.

use super::engine::{CalculatorEngine, InputMode};
use crate::keys::Operator;
use serde::Serialize;

/// A point-in-time copy of the engine state, suitable for JSON output.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    /// The display line.
    pub display: String,
    pub mode: InputMode,
    pub left: String,
    /// Pending operator, if any.
    pub operator: Option<Operator>,
    pub right: Option<String>,
    /// The result of the last `=` while it is still shown.
    /// None once the user starts editing again.
    pub result: Option<String>,
}

impl Snapshot {
    /// Capture the current state of an engine.
    pub fn capture(engine: &CalculatorEngine) -> Self {
        let entry = engine.entry();
        Self {
            display: engine.display().to_string(),
            mode: engine.mode(),
            left: entry.left().to_string(),
            operator: entry.operator(),
            right: entry.right().map(str::to_string),
            result: engine.result().map(str::to_string),
        }
    }

    /// Get the text to copy to the clipboard.
    /// The result if there is one, otherwise the operand being edited.
    pub fn text_for_clipboard(&self) -> &str {
        self.result
            .as_deref()
            .or(self.right.as_deref())
            .unwrap_or(&self.left)
    }
}
