//! Line-oriented terminal session.
//!
//! Each input line is either a meta command (`:keys`, `:copy`, `:json`,
//! `:quit`) or a run of keys fed to the engine, after which the display line
//! is printed.

use crate::calculator::{CalculatorEngine, Snapshot, copy_to_clipboard};
use crate::keys::{Key, parse_keys};
use crate::ui::keypad::render_keypad;
use std::io::{BufRead, Write};

/// Whether the session keeps reading input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct Session<W: Write> {
    engine: CalculatorEngine,
    out: W,
    json: bool,
    copy_on_equals: bool,
}

impl<W: Write> Session<W> {
    pub fn new(engine: CalculatorEngine, out: W) -> Self {
        Self {
            engine,
            out,
            json: false,
            copy_on_equals: false,
        }
    }

    /// Print JSON snapshots instead of the plain display line.
    pub fn with_json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }

    /// Copy every `=` result to the clipboard.
    pub fn with_copy_on_equals(mut self, copy_on_equals: bool) -> Self {
        self.copy_on_equals = copy_on_equals;
        self
    }

    pub fn engine(&self) -> &CalculatorEngine {
        &self.engine
    }

    /// Consume the session, returning the output writer.
    pub fn into_output(self) -> W {
        self.out
    }

    /// Print the keypad and the initial display.
    pub fn print_banner(&mut self) -> anyhow::Result<()> {
        writeln!(self.out, "{}", render_keypad())?;
        writeln!(self.out)?;
        self.print_display()
    }

    /// Read and handle lines until `:quit` or end of input.
    pub fn run(&mut self, input: impl BufRead) -> anyhow::Result<()> {
        for line in input.lines() {
            if self.handle_line(&line?)? == Flow::Quit {
                break;
            }
        }
        self.out.flush()?;
        Ok(())
    }

    /// Handle one line of input.
    pub fn handle_line(&mut self, line: &str) -> anyhow::Result<Flow> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(Flow::Continue);
        }

        if let Some(command) = line.strip_prefix(':') {
            return self.handle_command(command.trim());
        }

        match parse_keys(line) {
            Ok(keys) => self.press_keys(&keys)?,
            Err(e) => writeln!(self.out, "error: {}", e)?,
        }

        Ok(Flow::Continue)
    }

    fn handle_command(&mut self, command: &str) -> anyhow::Result<Flow> {
        match command {
            "q" | "quit" | "exit" => return Ok(Flow::Quit),
            "keys" => writeln!(self.out, "{}", render_keypad())?,
            "json" => {
                let snapshot = Snapshot::capture(&self.engine);
                writeln!(self.out, "{}", serde_json::to_string(&snapshot)?)?;
            }
            "copy" => {
                let snapshot = Snapshot::capture(&self.engine);
                let text = snapshot.text_for_clipboard();
                match copy_to_clipboard(text) {
                    Ok(()) => writeln!(self.out, "copied {}", text)?,
                    Err(e) => writeln!(self.out, "error: {}", e)?,
                }
            }
            other => writeln!(self.out, "error: unknown command :{}", other)?,
        }
        Ok(Flow::Continue)
    }

    fn press_keys(&mut self, keys: &[Key]) -> anyhow::Result<()> {
        self.engine.handle_keys(keys.iter().copied());

        if self.copy_on_equals
            && keys.last() == Some(&Key::Equals)
            && let Some(result) = self.engine.result()
            && let Err(e) = copy_to_clipboard(result)
        {
            tracing::warn!(error = %e, "Failed to copy result");
        }

        self.print_display()
    }

    fn print_display(&mut self) -> anyhow::Result<()> {
        if self.json {
            let snapshot = Snapshot::capture(&self.engine);
            writeln!(self.out, "{}", serde_json::to_string(&snapshot)?)?;
        } else {
            writeln!(self.out, "{}", self.engine.display())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_session(input: &str) -> String {
        let mut session = Session::new(CalculatorEngine::new(), Vec::new());
        session.run(input.as_bytes()).unwrap();
        String::from_utf8(session.into_output()).unwrap()
    }

    #[test]
    fn test_display_after_each_line() {
        let output = run_session("12\n+\n3\n=\n");
        assert_eq!(output, "12\n12 +\n12 + 3\n15\n");
    }

    #[test]
    fn test_blank_lines_skipped() {
        assert_eq!(run_session("\n  \n7*6=\n"), "42\n");
    }

    #[test]
    fn test_unknown_key_leaves_state_untouched() {
        let output = run_session("5\n5 ^ 2\n+1=\n");
        assert_eq!(output, "5\nerror: unknown key: \"^\"\n6\n");
    }

    #[test]
    fn test_quit_stops_reading() {
        assert_eq!(run_session("1\n:quit\n2\n"), "1\n");
    }

    #[test]
    fn test_json_command() {
        let output = run_session("9-\n:json\n");
        let last = output.lines().last().unwrap();
        let value: serde_json::Value = serde_json::from_str(last).unwrap();
        assert_eq!(value["display"], "9 -");
        assert_eq!(value["operator"], "sub");
        assert_eq!(value["mode"], "awaiting_operand");
    }

    #[test]
    fn test_json_mode() {
        let mut session = Session::new(CalculatorEngine::new(), Vec::new()).with_json(true);
        session.handle_line("2+2=").unwrap();
        let output = String::from_utf8(session.into_output()).unwrap();
        let value: serde_json::Value = serde_json::from_str(output.trim()).unwrap();
        assert_eq!(value["result"], "4");
    }

    #[test]
    fn test_keys_and_unknown_commands() {
        let output = run_session(":keys\n:frobnicate\n");
        assert!(output.starts_with(&render_keypad()));
        assert!(output.ends_with("error: unknown command :frobnicate\n"));
    }

    #[test]
    fn test_banner() {
        let mut session = Session::new(CalculatorEngine::new(), Vec::new());
        session.print_banner().unwrap();
        let output = String::from_utf8(session.into_output()).unwrap();
        assert!(output.ends_with("\n\n0\n"));
    }

    #[test]
    fn test_state_carries_across_lines() {
        let mut session = Session::new(CalculatorEngine::new(), std::io::sink());
        assert_eq!(session.handle_line("5+3=").unwrap(), Flow::Continue);
        assert_eq!(session.handle_line("+2=").unwrap(), Flow::Continue);
        assert_eq!(session.engine().display(), "10");
        assert_eq!(session.handle_line(":q").unwrap(), Flow::Quit);
    }
}
