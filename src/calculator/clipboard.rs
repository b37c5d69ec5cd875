//! Copying calculator values to the system clipboard.

use arboard::Clipboard;

#[derive(Debug, thiserror::Error)]
pub enum ClipboardError {
    #[error("failed to access clipboard: {0}")]
    Unavailable(#[source] arboard::Error),
    #[error("failed to copy to clipboard: {0}")]
    Copy(#[source] arboard::Error),
}

/// Copy a value to the system clipboard.
pub fn copy_to_clipboard(value: &str) -> Result<(), ClipboardError> {
    let mut clipboard = Clipboard::new().map_err(ClipboardError::Unavailable)?;

    clipboard
        .set_text(value.to_owned())
        .map_err(ClipboardError::Copy)?;

    tracing::debug!(%value, "Copied value to clipboard");
    Ok(())
}
