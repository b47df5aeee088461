//! 入力処理モジュール
//!
//! キーバインドを提供

pub mod keybinding;

// 公開API
pub use keybinding::{Key, KeyCode, KeyMap, KeyModifiers};
