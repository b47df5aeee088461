//! エラーハンドリングシステム
//!
//! stylepad 全体で使用される統一されたエラー型とユーティリティを定義。
//! どのエラーもプロセスを終了させない：シェルは常に操作可能なまま残る。

use std::time::{Duration, Instant};
use thiserror::Error;

/// アプリケーション全体のエラー型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EditorError {
    /// 書式指定エラー
    #[error("Style error: {0}")]
    Style(#[from] StyleError),

    /// 履歴操作エラー
    #[error("History error: {0}")]
    History(#[from] HistoryError),

    /// ファイル操作エラー
    #[error("File operation failed: {0}")]
    File(#[from] FileError),

    /// 文書編集エラー
    #[error("Edit error: {0}")]
    Edit(#[from] EditError),

    /// UI操作エラー
    #[error("UI operation failed: {0}")]
    Ui(#[from] UiError),

    /// 設定エラー
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl EditorError {
    /// 利用者に通知しない境界エラー（履歴の端での undo/redo）か
    pub fn is_benign(&self) -> bool {
        matches!(
            self,
            EditorError::History(HistoryError::NothingToUndo | HistoryError::NothingToRedo)
        )
    }
}

/// ツールバー由来の書式値エラー
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StyleError {
    #[error("Invalid value for {field}: {value:?}")]
    InvalidStyleValue { field: &'static str, value: String },
}

/// 履歴操作固有のエラー
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HistoryError {
    #[error("Nothing to undo")]
    NothingToUndo,

    #[error("Nothing to redo")]
    NothingToRedo,

    #[error("Edit record does not match the document: {0}")]
    Replay(String),
}

/// ファイル操作固有のエラー
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FileError {
    #[error("File not found: {path}")]
    NotFound { path: String },

    #[error("Permission denied: {path}")]
    PermissionDenied { path: String },

    #[error("Invalid path: {path}")]
    InvalidPath { path: String },

    #[error("Encoding error: {message}")]
    Encoding { message: String },

    #[error("IO error: {message}")]
    Io { message: String },
}

/// 文書編集エラー型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EditError {
    #[error("Position {position} is out of bounds (length {len})")]
    OutOfBounds { position: usize, len: usize },

    #[error("Invalid range {start}..{end}")]
    InvalidRange { start: usize, end: usize },

    #[error("Content at {position} does not match {expected:?}")]
    ContentMismatch { position: usize, expected: String },
}

/// UI操作固有のエラー
#[derive(Error, Debug, Clone, PartialEq)]
pub enum UiError {
    #[error("Terminal initialization failed")]
    TerminalInit,

    #[error("Rendering failed: {component}")]
    RenderingFailed { component: String },
}

/// 設定固有のエラー
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Invalid configuration file {path}: {message}")]
    InvalidFile { path: String, message: String },

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}

/// エラーレベル分類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorLevel {
    Info,
    Warning,
    Error,
}

/// ステータスラインに表示するエラー情報
#[derive(Debug, Clone)]
pub struct ErrorDisplay {
    /// エラーメッセージ
    pub message: String,
    /// エラーレベル
    pub level: ErrorLevel,
    /// 表示開始時刻
    pub start_time: Instant,
    /// 表示持続時間
    pub duration: Duration,
}

impl ErrorDisplay {
    pub fn new(error: &EditorError) -> Self {
        let (message, level) = Self::format_error(error);
        Self {
            message,
            level,
            start_time: Instant::now(),
            duration: Duration::from_secs(5),
        }
    }

    fn format_error(error: &EditorError) -> (String, ErrorLevel) {
        match error {
            EditorError::History(HistoryError::NothingToUndo) => {
                ("元に戻す操作はありません".to_string(), ErrorLevel::Info)
            }
            EditorError::History(HistoryError::NothingToRedo) => {
                ("やり直す操作はありません".to_string(), ErrorLevel::Info)
            }
            EditorError::File(FileError::NotFound { path }) => {
                (format!("ファイルが見つかりません: {}", path), ErrorLevel::Error)
            }
            EditorError::File(FileError::PermissionDenied { path }) => {
                (format!("アクセス権限がありません: {}", path), ErrorLevel::Error)
            }
            EditorError::File(FileError::InvalidPath { path }) => {
                (format!("無効なパスです: {}", path), ErrorLevel::Error)
            }
            EditorError::File(FileError::Encoding { message }) => {
                (format!("文字エンコーディングエラー: {}", message), ErrorLevel::Error)
            }
            EditorError::Style(StyleError::InvalidStyleValue { field, value }) => {
                (format!("無効な書式値です ({}): {}", field, value), ErrorLevel::Warning)
            }
            _ => (format!("エラーが発生しました: {}", error), ErrorLevel::Error),
        }
    }

    pub fn is_expired(&self) -> bool {
        self.start_time.elapsed() >= self.duration
    }
}

/// プロジェクト標準のResult型
pub type Result<T> = std::result::Result<T, EditorError>;

// std::io::Error から EditorError への変換
impl From<std::io::Error> for EditorError {
    fn from(error: std::io::Error) -> Self {
        EditorError::File(FileError::Io {
            message: error.to_string(),
        })
    }
}

impl From<std::string::FromUtf8Error> for EditorError {
    fn from(error: std::string::FromUtf8Error) -> Self {
        EditorError::File(FileError::Encoding {
            message: format!("invalid UTF-8 at byte {}", error.utf8_error().valid_up_to()),
        })
    }
}

/// パニック時に端末を復元してから報告する
pub fn setup_panic_handler() {
    std::panic::set_hook(Box::new(|panic_info| {
        let _ = crate::frontend::tui::leave_terminal();

        let location = panic_info
            .location()
            .map(|loc| format!("{}:{}", loc.file(), loc.line()))
            .unwrap_or_else(|| "unknown location".to_string());

        let message = if let Some(s) = panic_info.payload().downcast_ref::<&str>() {
            s
        } else if let Some(s) = panic_info.payload().downcast_ref::<String>() {
            s
        } else {
            "Unknown panic payload"
        };

        log::error!("panic at {}: {}", location, message);
        eprintln!("PANIC at {}: {}", location, message);
        eprintln!("Stack trace: {}", std::backtrace::Backtrace::capture());

        std::process::exit(1);
    }));
}
