//! アプリケーション状態
//!
//! 全ハンドラに明示的に渡される、文書・履歴・ツールバー・ファイル情報の集合

use crate::config::EditorConfig;
use crate::document::{DocumentSurface, StyledDocument};
use crate::editor::{ToolbarState, UndoCoordinator};
use crate::error::Result;
use crate::file::{FileOperations, PlainTextFiles};
use std::path::{Path, PathBuf};

/// エディタ全体の状態
pub struct EditorState {
    /// 編集中の文書
    pub document: StyledDocument,
    /// undo/redo 履歴（文書の変更通知を購読済み）
    pub history: UndoCoordinator,
    /// ツールバーのコントロール状態
    pub toolbar: ToolbarState,
    /// ファイル I/O
    pub files: Box<dyn FileOperations>,
    /// 現在のファイル
    file_path: Option<PathBuf>,
    /// 実行中フラグ
    running: bool,
    /// ステータスメッセージ
    status: Option<String>,
}

impl EditorState {
    /// 既定設定で作成
    pub fn new() -> Self {
        Self::from_parts(StyledDocument::new(), ToolbarState::default())
    }

    /// 設定から作成
    pub fn with_config(config: &EditorConfig) -> Result<Self> {
        let style = config.initial_style()?;
        Ok(Self::from_parts(
            StyledDocument::with_style(style),
            config.initial_toolbar(),
        ))
    }

    fn from_parts(mut document: StyledDocument, toolbar: ToolbarState) -> Self {
        let history = UndoCoordinator::new();
        history.attach(&mut document);
        Self {
            document,
            history,
            toolbar,
            files: Box::new(PlainTextFiles),
            file_path: None,
            running: true,
            status: None,
        }
    }

    /// ファイル I/O を差し替える
    pub fn with_files(mut self, files: Box<dyn FileOperations>) -> Self {
        self.files = files;
        self
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn request_exit(&mut self) {
        self.running = false;
    }

    pub fn file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }

    pub fn set_file_path(&mut self, path: Option<PathBuf>) {
        self.file_path = path;
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status = Some(message.into());
    }

    pub fn clear_status(&mut self) {
        self.status = None;
    }

    /// 表示用のファイル名
    pub fn file_label(&self) -> String {
        self.file_path
            .as_ref()
            .and_then(|path| path.file_name())
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "*untitled*".to_string())
    }

    /// ファイルを読み込んで文書を置き換える（履歴は破棄）
    pub fn load_file(&mut self, path: &Path) -> Result<()> {
        let content = self.files.read_file(path)?;
        self.document.set_text(&content);
        self.document.set_caret(0)?;
        self.history.clear();
        self.file_path = Some(path.to_path_buf());
        log::info!("opened {}", path.display());
        Ok(())
    }

    /// 文書テキストをファイルに書き出す
    pub fn save_file(&mut self, path: &Path) -> Result<()> {
        self.files.write_file(path, &self.document.text())?;
        self.file_path = Some(path.to_path_buf());
        log::info!("saved {}", path.display());
        Ok(())
    }
}

impl Default for EditorState {
    fn default() -> Self {
        Self::new()
    }
}
