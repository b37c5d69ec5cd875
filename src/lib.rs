//! Keypad calculator engine.
//!
//! Feed [`keys::Key`] presses into a [`calculator::CalculatorEngine`] and read
//! back its display line. Arithmetic is exact decimal, so `0.1 + 0.2` shows
//! `0.3`.

pub mod calculator;
pub mod config;
pub mod keys;
pub mod ui;

pub use calculator::{CalculatorEngine, InputMode, Snapshot};
pub use keys::{Key, Operator};
