//! 編集層
//!
//! ツールバー書式の適用と undo/redo 履歴を提供

pub mod history;
pub mod toolbar;

pub use history::{HistoryRecorder, HistoryStack, UndoCoordinator};
pub use toolbar::{
    apply_attributes, choose_text_color, resolve_style, ColorPicker, ToolbarState, FONT_SIZES,
};
