//! Key press feedback for terminal hosts.

use crate::keys::Key;
use std::io::Write;

/// A key callback that rings the terminal bell.
///
/// Written to stderr so it never mixes with the display output.
pub fn terminal_bell() -> impl Fn(Key) + Send + Sync + 'static {
    |key| {
        let mut stderr = std::io::stderr();
        if let Err(e) = stderr.write_all(b"\x07").and_then(|_| stderr.flush()) {
            tracing::trace!(%key, error = %e, "Failed to ring bell");
        }
    }
}
