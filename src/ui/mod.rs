//! UIモジュール
//!
//! ratatuiベースのターミナル描画

pub mod screen;
pub mod status;
pub mod text_area;

// 公開API
pub use screen::{adjust_scroll, draw_screen, split_area, PromptView, Screen};
pub use status::{status_line, toolbar_line};
pub use text_area::{document_view, terminal_style, DocumentView};
