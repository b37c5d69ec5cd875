//! The keypad state machine.
//!
//! [`CalculatorEngine`] consumes one [`Key`] at a time and keeps an [`Entry`]
//! of at most `left op right`. A complete entry is collapsed into a single
//! operand when `=` or another operator is pressed.

use super::evaluation::{DEFAULT_DIVISION_PRECISION, clamp_precision, evaluate_or_zero};
use crate::keys::{Key, Operator};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// How the next digit, point or sign key is interpreted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InputMode {
    /// Digits edit the operand on top of the entry.
    #[default]
    EnteringOperand,
    /// An operator was just pressed; the next digit starts the right operand.
    AwaitingOperand,
}

/// The expression being built: an operand, optionally followed by a pending
/// operator and its right operand.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Entry {
    left: String,
    operator: Option<Operator>,
    /// Only present while `operator` is.
    right: Option<String>,
}

impl Entry {
    fn operand(value: impl Into<String>) -> Self {
        Self {
            left: value.into(),
            operator: None,
            right: None,
        }
    }

    pub fn left(&self) -> &str {
        &self.left
    }

    pub fn operator(&self) -> Option<Operator> {
        self.operator
    }

    pub fn right(&self) -> Option<&str> {
        self.right.as_deref()
    }

    /// Check if the entry holds `left op right` and can be evaluated.
    pub fn is_complete(&self) -> bool {
        self.operator.is_some() && self.right.is_some()
    }

    /// The display tokens, bottom first: one, two or three of them.
    pub fn tokens(&self) -> Vec<&str> {
        let mut tokens = vec![self.left.as_str()];
        if let Some(op) = self.operator {
            tokens.push(op.glyph());
        }
        if let Some(right) = &self.right {
            tokens.push(right);
        }
        tokens
    }

    /// The operand currently being edited.
    fn top_operand_mut(&mut self) -> &mut String {
        match &mut self.right {
            Some(right) => right,
            None => &mut self.left,
        }
    }
}

impl Default for Entry {
    fn default() -> Self {
        Self::operand("0")
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.tokens().join(" "))
    }
}

type KeyCallback = Arc<dyn Fn(Key) + Send + Sync>;

/// A single calculator session.
pub struct CalculatorEngine {
    entry: Entry,
    mode: InputMode,
    /// The left operand is a result from `=` and has not been edited since.
    showing_result: bool,
    display: String,
    precision: u64,
    on_key: Option<KeyCallback>,
}

impl Default for CalculatorEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for CalculatorEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CalculatorEngine")
            .field("entry", &self.entry)
            .field("mode", &self.mode)
            .field("showing_result", &self.showing_result)
            .field("precision", &self.precision)
            .finish_non_exhaustive()
    }
}

impl CalculatorEngine {
    pub fn new() -> Self {
        Self::with_precision(DEFAULT_DIVISION_PRECISION)
    }

    /// Create an engine that rounds non-terminating quotients to
    /// `precision` significant digits, clamped to `1..=MAX_DIVISION_PRECISION`.
    pub fn with_precision(precision: u64) -> Self {
        let entry = Entry::default();
        Self {
            display: entry.to_string(),
            entry,
            mode: InputMode::EnteringOperand,
            showing_result: false,
            precision: clamp_precision(precision),
            on_key: None,
        }
    }

    /// Set the callback invoked for every key before it is handled.
    ///
    /// This is where a host hooks tactile or audible feedback.
    pub fn set_on_key(&mut self, callback: impl Fn(Key) + Send + Sync + 'static) {
        self.on_key = Some(Arc::new(callback));
    }

    /// Current display text.
    pub fn display(&self) -> &str {
        &self.display
    }

    pub fn mode(&self) -> InputMode {
        self.mode
    }

    pub fn entry(&self) -> &Entry {
        &self.entry
    }

    pub fn precision(&self) -> u64 {
        self.precision
    }

    /// The result of the last `=`, while it is still shown unedited.
    pub fn result(&self) -> Option<&str> {
        self.showing_result.then_some(self.entry.left.as_str())
    }

    /// Apply a key press and return the updated display.
    pub fn handle_key(&mut self, key: Key) -> &str {
        if let Some(callback) = &self.on_key {
            callback(key);
        }

        tracing::trace!(%key, mode = ?self.mode, entry = %self.entry, "Handling key");

        let showing_result = std::mem::take(&mut self.showing_result);

        match key {
            Key::Clear => self.reset(),
            Key::Delete => self.delete_last(),
            Key::Digit(_) | Key::DecimalPoint => self.enter(key, showing_result),
            Key::Negate => {
                self.negate();
                self.showing_result = showing_result;
            }
            Key::Operator(op) => self.apply_operator(op),
            Key::Equals => self.equals(showing_result),
        }

        self.display = self.entry.to_string();
        &self.display
    }

    /// Apply a sequence of keys, returning the final display.
    pub fn handle_keys(&mut self, keys: impl IntoIterator<Item = Key>) -> &str {
        for key in keys {
            self.handle_key(key);
        }
        &self.display
    }

    fn reset(&mut self) {
        self.entry = Entry::default();
        self.mode = InputMode::EnteringOperand;
    }

    fn delete_last(&mut self) {
        if let Some(right) = &mut self.entry.right {
            *right = shorten(right);
        } else if self.entry.operator.take().is_none() {
            self.entry.left = shorten(&self.entry.left);
        }
        self.mode = InputMode::EnteringOperand;
    }

    fn enter(&mut self, key: Key, showing_result: bool) {
        match self.mode {
            InputMode::AwaitingOperand => {
                self.entry.right = Some(seed_operand(key));
                self.mode = InputMode::EnteringOperand;
            }
            InputMode::EnteringOperand if showing_result => {
                self.entry = Entry::operand(seed_operand(key));
            }
            InputMode::EnteringOperand => {
                let top = self.entry.top_operand_mut();
                *top = append_key(top, key);
            }
        }
    }

    fn negate(&mut self) {
        if self.mode == InputMode::AwaitingOperand {
            tracing::debug!("Ignoring sign toggle while awaiting an operand");
            return;
        }

        let top = self.entry.top_operand_mut();
        if *top == "0" {
            return;
        }

        *top = match top.strip_prefix('-') {
            Some(positive) => positive.to_string(),
            None => format!("-{}", top),
        };
    }

    fn apply_operator(&mut self, op: Operator) {
        if self.mode == InputMode::EnteringOperand && self.entry.is_complete() {
            self.collapse();
        }

        // Pressed straight after another operator: replace it.
        self.entry.operator = Some(op);
        self.mode = InputMode::AwaitingOperand;
    }

    fn equals(&mut self, showing_result: bool) {
        if !self.entry.is_complete() {
            tracing::debug!(entry = %self.entry, "Ignoring '=' on incomplete entry");
            self.showing_result = showing_result;
            return;
        }

        self.collapse();
        self.mode = InputMode::EnteringOperand;
        self.showing_result = true;
    }

    /// Evaluate `left op right` into a single operand.
    fn collapse(&mut self) {
        let Entry {
            left,
            operator,
            right,
        } = std::mem::take(&mut self.entry);

        let result = match (operator, right) {
            (Some(op), Some(right)) => {
                let result = evaluate_or_zero(&left, op, &right, self.precision);
                tracing::debug!(%left, %op, %right, %result, "Evaluated entry");
                result
            }
            _ => left,
        };

        self.entry = Entry::operand(result);
    }
}

/// The operand started by a digit or point after an operator or result.
fn seed_operand(key: Key) -> String {
    match key {
        Key::DecimalPoint => "0.".to_string(),
        other => other.glyph().to_string(),
    }
}

fn append_key(current: &str, key: Key) -> String {
    let is_point = key == Key::DecimalPoint;

    if current == "0" && !is_point {
        key.glyph().to_string()
    } else if is_point && current.contains('.') {
        current.to_string()
    } else {
        format!("{}{}", current, key.glyph())
    }
}

/// Drop the last character; an operand never becomes blank or a bare sign.
fn shorten(token: &str) -> String {
    let mut shortened = token.to_string();
    shortened.pop();

    if shortened.is_empty() || shortened == "-" {
        "0".to_string()
    } else {
        shortened
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculator::MAX_DIVISION_PRECISION;
    use crate::keys::{KEYPAD, parse_keys};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn run(input: &str) -> CalculatorEngine {
        let mut engine = CalculatorEngine::new();
        engine.handle_keys(parse_keys(input).unwrap());
        engine
    }

    fn display_after(input: &str) -> String {
        run(input).display().to_string()
    }

    #[test]
    fn test_initial_state() {
        let engine = CalculatorEngine::new();
        assert_eq!(engine.display(), "0");
        assert_eq!(engine.mode(), InputMode::EnteringOperand);
        assert_eq!(engine.entry().tokens(), vec!["0"]);
        assert_eq!(engine.result(), None);
    }

    #[test]
    fn test_digit_entry() {
        assert_eq!(display_after("123"), "123");
        assert_eq!(CalculatorEngine::new().handle_key(Key::Digit(42)), "9");
        assert_eq!(display_after("007"), "7");
        assert_eq!(display_after("0.05"), "0.05");
    }

    #[test]
    fn test_simple_addition() {
        assert_eq!(display_after("123+4"), "123 + 4");
        assert_eq!(display_after("123+4="), "127");
    }

    #[test]
    fn test_exact_decimal_addition() {
        assert_eq!(display_after("0.1+0.2="), "0.3");
    }

    #[test]
    fn test_division_by_zero_shows_zero() {
        assert_eq!(display_after("5/0="), "0");
        assert_eq!(display_after("5%0="), "0");
    }

    #[test]
    fn test_second_decimal_point_ignored() {
        assert_eq!(display_after("1.2."), "1.2");
        assert_eq!(display_after("..1"), "0.1");
    }

    #[test]
    fn test_operator_substitution() {
        let engine = run("5+-");
        assert_eq!(engine.entry().tokens(), vec!["5", "-"]);
        assert_eq!(engine.display(), "5 -");
        assert_eq!(engine.mode(), InputMode::AwaitingOperand);
        assert_eq!(display_after("5+-3="), "2");
    }

    #[test]
    fn test_chained_equals_and_operator() {
        assert_eq!(display_after("5+3=+2="), "10");
    }

    #[test]
    fn test_operator_collapses_complete_entry() {
        let engine = run("5+3*");
        assert_eq!(engine.display(), "8 *");
        assert_eq!(engine.entry().operator(), Some(Operator::Mul));
        assert_eq!(display_after("5+3*2="), "16");
    }

    #[test]
    fn test_digit_after_result_starts_fresh() {
        let mut engine = run("5+3=");
        assert_eq!(engine.result(), Some("8"));
        assert_eq!(engine.handle_key(Key::Digit(2)), "2");
        assert_eq!(engine.result(), None);
        assert_eq!(display_after("5+3=."), "0.");
    }

    #[test]
    fn test_negate() {
        assert_eq!(display_after("5 neg"), "-5");
        assert_eq!(display_after("5 neg neg"), "5");
        assert_eq!(display_after("neg"), "0");
        assert_eq!(display_after("2+5 neg"), "2 + -5");
        assert_eq!(display_after("2+5 neg ="), "-3");
    }

    #[test]
    fn test_negate_ignored_while_awaiting_operand() {
        let engine = run("5+ neg");
        assert_eq!(engine.display(), "5 +");
        assert_eq!(engine.mode(), InputMode::AwaitingOperand);
    }

    #[test]
    fn test_negate_result_keeps_it_a_result() {
        let mut engine = run("5+3= neg");
        assert_eq!(engine.display(), "-8");
        assert_eq!(engine.result(), Some("-8"));
        assert_eq!(engine.handle_key(Key::Digit(1)), "1");
    }

    #[test]
    fn test_equals_on_incomplete_entry_is_noop() {
        assert_eq!(display_after("5="), "5");
        let engine = run("5+=");
        assert_eq!(engine.display(), "5 +");
        assert_eq!(engine.mode(), InputMode::AwaitingOperand);
        assert_eq!(engine.result(), None);

        let once = run("5+3=");
        let mut twice = run("5+3==");
        assert_eq!(twice.entry(), once.entry());
        assert_eq!(twice.mode(), once.mode());
        assert_eq!(twice.display(), "8");
        assert_eq!(twice.result(), Some("8"));
        assert_eq!(twice.handle_key(Key::Digit(2)), "2");
    }

    #[test]
    fn test_repeated_equals_keeps_result_fresh() {
        assert_eq!(display_after("5+3==2"), "2");
        assert_eq!(display_after("5+3===.5"), "0.5");
        assert_eq!(display_after("5+3= neg =1"), "1");
    }

    #[test]
    fn test_delete() {
        assert_eq!(display_after("123 del"), "12");
        assert_eq!(display_after("del"), "0");
        assert_eq!(display_after("7 del"), "0");
        assert_eq!(display_after("5 neg del"), "0");
        assert_eq!(display_after("1.5 del"), "1.");
    }

    #[test]
    fn test_delete_right_operand_keeps_placeholder() {
        let mut engine = run("5+3 del");
        assert_eq!(engine.display(), "5 + 0");
        assert_eq!(engine.handle_key(Key::Digit(4)), "5 + 4");
        assert_eq!(engine.handle_key(Key::Equals), "9");
    }

    #[test]
    fn test_delete_pending_operator() {
        let mut engine = run("5+ del");
        assert_eq!(engine.display(), "5");
        assert_eq!(engine.mode(), InputMode::EnteringOperand);
        assert_eq!(engine.handle_key(Key::Digit(2)), "52");
    }

    #[test]
    fn test_delete_edits_result() {
        let mut engine = run("60+7= del");
        assert_eq!(engine.display(), "6");
        assert_eq!(engine.result(), None);
        assert_eq!(engine.handle_key(Key::Digit(1)), "61");
    }

    #[test]
    fn test_point_after_operator_seeds_zero() {
        assert_eq!(display_after("5+."), "5 + 0.");
        assert_eq!(display_after("5+.5="), "5.5");
    }

    #[test]
    fn test_clear() {
        let engine = run("12+3 C");
        assert_eq!(engine.display(), "0");
        assert_eq!(engine.mode(), InputMode::EnteringOperand);
    }

    #[test]
    fn test_clear_is_idempotent() {
        let once = run("9*8 C");
        let twice = run("9*8 C C");
        assert_eq!(once.entry(), twice.entry());
        assert_eq!(once.mode(), twice.mode());
        assert_eq!(once.display(), twice.display());
    }

    #[test]
    fn test_modulo_and_division() {
        assert_eq!(display_after("17%5="), "2");
        assert_eq!(display_after("1/4="), "0.25");
    }

    #[test]
    fn test_long_quotient_is_exact() {
        assert_eq!(
            display_after("123456789012345678901234567890123456/2="),
            "61728394506172839450617283945061728"
        );
    }

    #[test]
    fn test_precision_is_configurable() {
        let mut engine = CalculatorEngine::with_precision(5);
        engine.handle_keys(parse_keys("2/3=").unwrap());
        assert_eq!(engine.display(), "0.66667");
        assert_eq!(CalculatorEngine::with_precision(0).precision(), 1);
        assert_eq!(
            CalculatorEngine::with_precision(u64::MAX).precision(),
            MAX_DIVISION_PRECISION
        );
    }

    #[test]
    fn test_on_key_callback_runs_per_key() {
        let count = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&count);

        let mut engine = CalculatorEngine::new();
        engine.set_on_key(move |_| {
            seen.fetch_add(1, Ordering::SeqCst);
        });
        engine.handle_keys(parse_keys("12+3=C").unwrap());

        assert_eq!(count.load(Ordering::SeqCst), 6);
    }

    #[test]
    fn test_display_never_blank() {
        // Every sequence of three keypad keys, starting fresh each time.
        for a in KEYPAD {
            for b in KEYPAD {
                for c in KEYPAD {
                    let mut engine = CalculatorEngine::new();
                    for key in [a, b, c] {
                        let display = engine.handle_key(key);
                        assert!(!display.trim().is_empty(), "{a} {b} {c}");
                    }

                    let entry = engine.entry();
                    assert!(entry.tokens().iter().all(|t| !t.is_empty()));
                    assert!(entry.right().is_none() || entry.operator().is_some());
                    assert_eq!(
                        engine.mode() == InputMode::AwaitingOperand,
                        entry.operator().is_some() && entry.right().is_none()
                    );
                }
            }
        }
    }
}
