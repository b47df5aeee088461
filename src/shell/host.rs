//! ホスト機能セット
//!
//! ファイルダイアログ・色選択・エラー表示など、UI ツールキット側が提供する機能

use crate::document::Rgb;
use crate::editor::ColorPicker;
use crate::error::EditorError;
use std::path::{Path, PathBuf};

/// シェルが依存するホスト UI の機能
pub trait Host {
    /// 開くファイルを選ばせる。キャンセル時は `None`
    fn choose_open_path(&mut self) -> Option<PathBuf>;

    /// 保存先を選ばせる（`current` は現在のファイル）。キャンセル時は `None`
    fn choose_save_path(&mut self, current: Option<&Path>) -> Option<PathBuf>;

    /// 文字色を選ばせる。キャンセル時は `None`
    fn choose_color(&mut self, initial: Rgb) -> Option<Rgb>;

    /// エラーを利用者に報告する
    fn report_error(&mut self, error: &EditorError);
}

/// `Host` の色選択を `ColorPicker` として使うためのアダプタ
pub struct HostColorPicker<'a, H: Host + ?Sized>(pub &'a mut H);

impl<H: Host + ?Sized> ColorPicker for HostColorPicker<'_, H> {
    fn choose_color(&mut self, initial: Rgb) -> Option<Rgb> {
        self.0.choose_color(initial)
    }
}

/// 応答をあらかじめ積んでおくホスト（テスト・自動実行向け）
#[derive(Debug, Default)]
pub struct ScriptedHost {
    pub open_paths: Vec<Option<PathBuf>>,
    pub save_paths: Vec<Option<PathBuf>>,
    pub colors: Vec<Option<Rgb>>,
    pub errors: Vec<EditorError>,
}

impl ScriptedHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_open_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.open_paths.push(Some(path.into()));
        self
    }

    pub fn with_save_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.save_paths.push(Some(path.into()));
        self
    }

    pub fn with_color(mut self, color: Option<Rgb>) -> Self {
        self.colors.push(color);
        self
    }
}

fn next_answer<T>(queue: &mut Vec<Option<T>>) -> Option<T> {
    if queue.is_empty() {
        None
    } else {
        queue.remove(0)
    }
}

impl Host for ScriptedHost {
    fn choose_open_path(&mut self) -> Option<PathBuf> {
        next_answer(&mut self.open_paths)
    }

    fn choose_save_path(&mut self, _current: Option<&Path>) -> Option<PathBuf> {
        next_answer(&mut self.save_paths)
    }

    fn choose_color(&mut self, _initial: Rgb) -> Option<Rgb> {
        next_answer(&mut self.colors)
    }

    fn report_error(&mut self, error: &EditorError) {
        self.errors.push(error.clone());
    }
}
