pub mod feedback;
pub mod keypad;
pub mod session;

pub use feedback::terminal_bell;
pub use keypad::render_keypad;
pub use session::{Flow, Session};
