//! Calculator core.
//!
//! This module provides:
//! - The keypad state machine that turns key presses into a display line
//! - Exact decimal evaluation of `left op right`
//! - A serializable snapshot of a session
//! - Copying values to the clipboard

mod clipboard;
mod engine;
mod evaluation;
mod snapshot;

pub use clipboard::{ClipboardError, copy_to_clipboard};
pub use engine::{CalculatorEngine, Entry, InputMode};
pub use evaluation::{
    ArithmeticError, DEFAULT_DIVISION_PRECISION, FALLBACK_RESULT, MAX_DIVISION_PRECISION,
    clamp_precision, evaluate, evaluate_or_zero, evaluate_with_precision, format_plain,
    parse_operand,
};
pub use snapshot::Snapshot;
