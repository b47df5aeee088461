//! stylepad - 端末で動くスタイル付きテキストエディタ
//!
//! 文字書式（サイズ・太字・斜体・下線・色）付きの文書を編集し、undo/redo をメニューとキー操作の
//! 両方から同じ履歴で扱う。

// コアモジュール
pub mod config;
pub mod error;
pub mod frontend;
pub mod logging;

// データ層
pub mod document;
pub mod file;

// 編集層
pub mod editor;

// ロジック層
pub mod input;
pub mod shell;

// 表示層
pub mod ui;

// 公開API
pub use config::EditorConfig;
pub use error::{EditorError, Result};
pub use frontend::TuiApplication;
