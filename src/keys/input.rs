//! Tokenizing typed input into key presses.
//!
//! A line such as `12.5 * 3 =` or `12.5*3=` becomes one [`Key`] per glyph.
//! Word aliases (`del`, `clear`, `neg`) are accepted wherever a glyph is.

use super::{Key, KeyParseError};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// One key token: the sign toggle glyph, a word, or any single visible character.
    static ref KEY_TOKEN: Regex = Regex::new(r"\+/-|[A-Za-z]+|\S").unwrap();
}

/// Parse a line of input into the keys it names, in order.
///
/// Fails on the first token that is not a known key.
pub fn parse_keys(line: &str) -> Result<Vec<Key>, KeyParseError> {
    KEY_TOKEN
        .find_iter(line)
        .map(|token| token.as_str().parse::<Key>())
        .collect()
}
