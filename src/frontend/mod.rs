pub mod tui;

pub use tui::{TerminalHost, TuiApplication};
