//! UI イベントの振り分け
//!
//! 固定のイベント種別からハンドラ関数への表で、ツールバー・メニュー・キー操作を
//! すべて同じ経路で処理する。

use super::host::{Host, HostColorPicker};
use super::state::EditorState;
use crate::document::{DocumentSurface, Motion};
use crate::editor::{apply_attributes, choose_text_color};
use crate::error::{EditorError, Result};
use std::collections::HashMap;

/// UI イベント
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    // ツールバー
    SelectFontSize(String),
    ToggleBold,
    ToggleItalic,
    ToggleUnderline,
    ChooseTextColor,

    // 編集メニュー
    Undo,
    Redo,

    // ファイルメニュー
    NewFile,
    OpenFile,
    SaveFile,
    Exit,

    // テキスト領域
    InsertChar(char),
    InsertNewline,
    DeleteBackward,
    DeleteForward,
    MoveCaret { motion: Motion, extend: bool },
    SelectAll,
}

/// イベント種別（ハンドラ表のキー）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    SelectFontSize,
    ToggleBold,
    ToggleItalic,
    ToggleUnderline,
    ChooseTextColor,
    Undo,
    Redo,
    NewFile,
    OpenFile,
    SaveFile,
    Exit,
    InsertChar,
    InsertNewline,
    DeleteBackward,
    DeleteForward,
    MoveCaret,
    SelectAll,
}

impl UiEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            UiEvent::SelectFontSize(_) => EventKind::SelectFontSize,
            UiEvent::ToggleBold => EventKind::ToggleBold,
            UiEvent::ToggleItalic => EventKind::ToggleItalic,
            UiEvent::ToggleUnderline => EventKind::ToggleUnderline,
            UiEvent::ChooseTextColor => EventKind::ChooseTextColor,
            UiEvent::Undo => EventKind::Undo,
            UiEvent::Redo => EventKind::Redo,
            UiEvent::NewFile => EventKind::NewFile,
            UiEvent::OpenFile => EventKind::OpenFile,
            UiEvent::SaveFile => EventKind::SaveFile,
            UiEvent::Exit => EventKind::Exit,
            UiEvent::InsertChar(_) => EventKind::InsertChar,
            UiEvent::InsertNewline => EventKind::InsertNewline,
            UiEvent::DeleteBackward => EventKind::DeleteBackward,
            UiEvent::DeleteForward => EventKind::DeleteForward,
            UiEvent::MoveCaret { .. } => EventKind::MoveCaret,
            UiEvent::SelectAll => EventKind::SelectAll,
        }
    }
}

/// ハンドラ関数
pub type Handler = fn(&mut EditorState, &mut dyn Host, &UiEvent) -> Result<()>;

/// イベント処理の結果
#[derive(Debug, Clone, PartialEq)]
pub struct CommandResult {
    /// 実行が成功したか
    pub success: bool,
    /// 利用者向けに報告したエラー
    pub error: Option<EditorError>,
    /// アプリケーションを終了するか
    pub should_quit: bool,
}

impl CommandResult {
    fn success(state: &EditorState) -> Self {
        Self {
            success: true,
            error: None,
            should_quit: !state.is_running(),
        }
    }

    fn failure(state: &EditorState, error: Option<EditorError>) -> Self {
        Self {
            success: false,
            error,
            should_quit: !state.is_running(),
        }
    }
}

/// イベント振り分け表
pub struct Dispatcher {
    handlers: HashMap<EventKind, Handler>,
}

impl Dispatcher {
    /// 既定のハンドラを登録した振り分け表
    pub fn new() -> Self {
        let mut handlers: HashMap<EventKind, Handler> = HashMap::with_capacity(17);
        handlers.insert(EventKind::SelectFontSize, select_font_size);
        handlers.insert(EventKind::ToggleBold, toggle_bold);
        handlers.insert(EventKind::ToggleItalic, toggle_italic);
        handlers.insert(EventKind::ToggleUnderline, toggle_underline);
        handlers.insert(EventKind::ChooseTextColor, choose_color);
        handlers.insert(EventKind::Undo, undo);
        handlers.insert(EventKind::Redo, redo);
        handlers.insert(EventKind::NewFile, new_file);
        handlers.insert(EventKind::OpenFile, open_file);
        handlers.insert(EventKind::SaveFile, save_file);
        handlers.insert(EventKind::Exit, exit);
        handlers.insert(EventKind::InsertChar, insert_char);
        handlers.insert(EventKind::InsertNewline, insert_newline);
        handlers.insert(EventKind::DeleteBackward, delete_backward);
        handlers.insert(EventKind::DeleteForward, delete_forward);
        handlers.insert(EventKind::MoveCaret, move_caret);
        handlers.insert(EventKind::SelectAll, select_all);
        Self { handlers }
    }

    /// イベントを処理する
    ///
    /// 履歴の端での undo/redo は何もせず成功扱い。その他のエラーはホストに報告し、
    /// 状態は操作可能なまま残す。
    pub fn dispatch(
        &self,
        state: &mut EditorState,
        host: &mut dyn Host,
        event: &UiEvent,
    ) -> CommandResult {
        let kind = event.kind();
        let Some(handler) = self.handlers.get(&kind) else {
            log::warn!("no handler for {:?}", kind);
            return CommandResult::failure(state, None);
        };

        match handler(state, host, event) {
            Ok(()) => CommandResult::success(state),
            Err(err) if err.is_benign() => {
                log::debug!("{:?}: {}", kind, err);
                CommandResult::success(state)
            }
            Err(err) => {
                log::warn!("{:?} failed: {}", kind, err);
                host.report_error(&err);
                CommandResult::failure(state, Some(err))
            }
        }
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

fn apply_toolbar(state: &mut EditorState) -> Result<()> {
    apply_attributes(&mut state.document, &state.toolbar)
}

fn select_font_size(state: &mut EditorState, _host: &mut dyn Host, event: &UiEvent) -> Result<()> {
    if let UiEvent::SelectFontSize(size) = event {
        state.toolbar.select_font_size(size.clone());
    }
    apply_toolbar(state)
}

fn toggle_bold(state: &mut EditorState, _host: &mut dyn Host, _event: &UiEvent) -> Result<()> {
    state.toolbar.toggle_bold();
    apply_toolbar(state)
}

fn toggle_italic(state: &mut EditorState, _host: &mut dyn Host, _event: &UiEvent) -> Result<()> {
    state.toolbar.toggle_italic();
    apply_toolbar(state)
}

fn toggle_underline(state: &mut EditorState, _host: &mut dyn Host, _event: &UiEvent) -> Result<()> {
    state.toolbar.toggle_underline();
    apply_toolbar(state)
}

// キャンセルされても現在の色で書式を適用し直す
fn choose_color(state: &mut EditorState, host: &mut dyn Host, _event: &UiEvent) -> Result<()> {
    choose_text_color(&mut state.document, &mut HostColorPicker(host));
    apply_toolbar(state)
}

fn undo(state: &mut EditorState, _host: &mut dyn Host, _event: &UiEvent) -> Result<()> {
    state.history.undo(&mut state.document)
}

fn redo(state: &mut EditorState, _host: &mut dyn Host, _event: &UiEvent) -> Result<()> {
    state.history.redo(&mut state.document)
}

fn new_file(state: &mut EditorState, _host: &mut dyn Host, _event: &UiEvent) -> Result<()> {
    state.document.set_text("");
    state.set_file_path(None);
    Ok(())
}

fn open_file(state: &mut EditorState, host: &mut dyn Host, _event: &UiEvent) -> Result<()> {
    let Some(path) = host.choose_open_path() else {
        return Ok(());
    };
    state.load_file(&path)?;
    state.set_status(format!("開きました: {}", path.display()));
    Ok(())
}

fn save_file(state: &mut EditorState, host: &mut dyn Host, _event: &UiEvent) -> Result<()> {
    let Some(path) = host.choose_save_path(state.file_path()) else {
        return Ok(());
    };
    state.save_file(&path)?;
    state.set_status(format!("保存しました: {}", path.display()));
    Ok(())
}

fn exit(state: &mut EditorState, _host: &mut dyn Host, _event: &UiEvent) -> Result<()> {
    state.request_exit();
    Ok(())
}

fn insert_char(state: &mut EditorState, _host: &mut dyn Host, event: &UiEvent) -> Result<()> {
    match event {
        UiEvent::InsertChar(ch) => state.document.type_char(*ch),
        _ => Ok(()),
    }
}

fn insert_newline(state: &mut EditorState, _host: &mut dyn Host, _event: &UiEvent) -> Result<()> {
    state.document.type_char('\n')
}

fn delete_backward(state: &mut EditorState, _host: &mut dyn Host, _event: &UiEvent) -> Result<()> {
    state.document.delete_backward().map(|_| ())
}

fn delete_forward(state: &mut EditorState, _host: &mut dyn Host, _event: &UiEvent) -> Result<()> {
    state.document.delete_forward().map(|_| ())
}

fn move_caret(state: &mut EditorState, _host: &mut dyn Host, event: &UiEvent) -> Result<()> {
    if let UiEvent::MoveCaret { motion, extend } = event {
        state.document.move_caret(*motion, *extend);
    }
    Ok(())
}

fn select_all(state: &mut EditorState, _host: &mut dyn Host, _event: &UiEvent) -> Result<()> {
    state.document.select_all();
    Ok(())
}
