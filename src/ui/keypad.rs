//! Text rendering of the keypad.
//!
//! Entry keys (digits, point, sign) are drawn in brackets so they stand out
//! from the command keys around them.

use crate::keys::{Key, keypad_rows};

/// Render one key as a fixed-width cell.
fn render_key(key: &Key) -> String {
    if key.is_entry_key() {
        format!("[{:^3}]", key.glyph())
    } else {
        format!(" {:^3} ", key.glyph())
    }
}

/// Render the whole keypad, one line per row.
pub fn render_keypad() -> String {
    keypad_rows()
        .map(|row| {
            let cells: Vec<String> = row.iter().map(render_key).collect();
            cells.join(" ").trim_end().to_string()
        })
        .collect::<Vec<_>>()
        .join("\n")
}
