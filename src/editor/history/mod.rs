//! 編集履歴（undo/redo）
//!
//! 文書サーフェスからの変更通知を記録し、2 本のスタックで元に戻す・やり直すを管理する。

use std::cell::RefCell;
use std::rc::Rc;

use crate::document::{
    runs_len, runs_text, ChangeListener, DocumentSurface, EditOrigin, EditRecord, StyledRun,
    StyledText,
};
use crate::error::{EditError, HistoryError, Result};

/// 編集履歴スタック
#[derive(Debug, Clone, Default)]
pub struct HistoryStack {
    undo: Vec<EditRecord>,
    redo: Vec<EditRecord>,
}

impl HistoryStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo.len()
    }

    /// 新しい編集を積む。やり直し側は破棄される
    pub fn push(&mut self, record: EditRecord) {
        if let Some(last) = self.undo.last_mut() {
            if can_merge_typing(last, &record) {
                merge_typing(last, record);
                self.redo.clear();
                return;
            }
        }
        self.undo.push(record);
        self.redo.clear();
    }

    pub fn take_for_undo(&mut self) -> Option<EditRecord> {
        self.undo.pop()
    }

    pub fn push_redo(&mut self, record: EditRecord) {
        self.redo.push(record);
    }

    pub fn take_for_redo(&mut self) -> Option<EditRecord> {
        self.redo.pop()
    }

    pub fn push_without_clearing(&mut self, record: EditRecord) {
        self.undo.push(record);
    }

    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }
}

/// 連続したキー入力（単語構成文字）を 1 つの編集単位にまとめられるか
fn can_merge_typing(prev: &EditRecord, new: &EditRecord) -> bool {
    let (
        EditRecord::Insert {
            position: prev_pos,
            runs: prev_runs,
            origin: EditOrigin::Typing,
        },
        EditRecord::Insert {
            position: new_pos,
            runs: new_runs,
            origin: EditOrigin::Typing,
        },
    ) = (prev, new)
    else {
        return false;
    };

    if !is_word_text(&runs_text(prev_runs)) || !is_word_text(&runs_text(new_runs)) {
        return false;
    }

    *new_pos == prev_pos + runs_len(prev_runs)
}

fn merge_typing(prev: &mut EditRecord, new: EditRecord) {
    if let (EditRecord::Insert { runs: prev_runs, .. }, EditRecord::Insert { runs: new_runs, .. }) =
        (prev, new)
    {
        let mut combined = std::mem::take(prev_runs);
        combined.extend(new_runs);
        *prev_runs = StyledText::from_runs(combined).runs().to_vec();
    }
}

fn is_word_text(text: &str) -> bool {
    !text.is_empty() && text.chars().all(|c| c.is_alphanumeric() || c == '_')
}

/// 履歴記録器
///
/// 文書の変更リスナーとして登録され、コーディネータとスタックを共有する。
#[derive(Clone, Default)]
pub struct HistoryRecorder {
    inner: Rc<RefCell<HistoryRecorderState>>,
}

#[derive(Debug, Default)]
struct HistoryRecorderState {
    stack: HistoryStack,
    suspended: bool,
}

impl HistoryRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn suspend(&self, suspended: bool) {
        self.inner.borrow_mut().suspended = suspended;
    }

    pub fn is_suspended(&self) -> bool {
        self.inner.borrow().suspended
    }

    fn with_stack<R>(&self, f: impl FnOnce(&mut HistoryStack) -> R) -> R {
        f(&mut self.inner.borrow_mut().stack)
    }
}

impl ChangeListener for HistoryRecorder {
    fn on_change(&mut self, record: &EditRecord) {
        let mut state = self.inner.borrow_mut();
        if state.suspended {
            return;
        }
        state.stack.push(record.clone());
    }
}

/// undo/redo コーディネータ
///
/// メニューとキー操作はどちらも同じインスタンスを経由するため、履歴は呼び出し経路によらず一貫する。
#[derive(Default)]
pub struct UndoCoordinator {
    recorder: HistoryRecorder,
}

impl UndoCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// 文書の変更通知を購読する
    pub fn attach<S: DocumentSurface + ?Sized>(&self, surface: &mut S) {
        surface.add_change_listener(Box::new(self.recorder.clone()));
    }

    /// 編集を記録する（やり直し側は破棄）
    pub fn record_edit(&mut self, edit: EditRecord) {
        self.recorder.with_stack(|stack| stack.push(edit));
    }

    pub fn can_undo(&self) -> bool {
        self.recorder.with_stack(|stack| stack.can_undo())
    }

    pub fn can_redo(&self) -> bool {
        self.recorder.with_stack(|stack| stack.can_redo())
    }

    /// (undo 数, redo 数)
    pub fn depth(&self) -> (usize, usize) {
        self.recorder
            .with_stack(|stack| (stack.undo_len(), stack.redo_len()))
    }

    /// 両方のスタックを破棄する
    pub fn clear(&mut self) {
        self.recorder.with_stack(HistoryStack::clear);
    }

    /// 直近の編集を取り消す
    pub fn undo<S: DocumentSurface + ?Sized>(&mut self, surface: &mut S) -> Result<()> {
        let Some(record) = self.recorder.with_stack(HistoryStack::take_for_undo) else {
            return Err(HistoryError::NothingToUndo.into());
        };

        self.recorder.suspend(true);
        let result = apply_undo(surface, &record);
        self.recorder.suspend(false);

        match result {
            Ok(()) => {
                log::debug!("undo {} at {}", kind_name(&record), record.position());
                self.recorder.with_stack(|stack| stack.push_redo(record));
                Ok(())
            }
            Err(err) => {
                self.recorder
                    .with_stack(|stack| stack.push_without_clearing(record));
                Err(HistoryError::Replay(err.to_string()).into())
            }
        }
    }

    /// 直近に取り消した編集をやり直す
    pub fn redo<S: DocumentSurface + ?Sized>(&mut self, surface: &mut S) -> Result<()> {
        let Some(record) = self.recorder.with_stack(HistoryStack::take_for_redo) else {
            return Err(HistoryError::NothingToRedo.into());
        };

        self.recorder.suspend(true);
        let result = apply_redo(surface, &record);
        self.recorder.suspend(false);

        match result {
            Ok(()) => {
                log::debug!("redo {} at {}", kind_name(&record), record.position());
                self.recorder
                    .with_stack(|stack| stack.push_without_clearing(record));
                Ok(())
            }
            Err(err) => {
                self.recorder.with_stack(|stack| stack.push_redo(record));
                Err(HistoryError::Replay(err.to_string()).into())
            }
        }
    }
}

fn kind_name(record: &EditRecord) -> &'static str {
    match record {
        EditRecord::Insert { .. } => "insert",
        EditRecord::Delete { .. } => "delete",
        EditRecord::Format { .. } => "format",
    }
}

/// 文書上の `[position, position + len(runs))` が `runs` のテキストと一致するか
fn expect_text<S: DocumentSurface + ?Sized>(
    surface: &S,
    position: usize,
    runs: &[StyledRun],
) -> Result<()> {
    let expected = runs_text(runs);
    let actual = surface.text_range(position, position + runs_len(runs))?;
    if actual != expected {
        return Err(EditError::ContentMismatch { position, expected }.into());
    }
    Ok(())
}

fn apply_undo<S: DocumentSurface + ?Sized>(surface: &mut S, record: &EditRecord) -> Result<()> {
    match record {
        EditRecord::Insert { position, runs, .. } => {
            expect_text(surface, *position, runs)?;
            surface.delete_range(*position, position + runs_len(runs))?;
            surface.set_caret(*position)
        }
        EditRecord::Delete { position, runs } => {
            surface.insert_runs(*position, runs)?;
            surface.set_caret(position + runs_len(runs))
        }
        EditRecord::Format { position, before, .. } => surface.restore_runs(*position, before),
    }
}

fn apply_redo<S: DocumentSurface + ?Sized>(surface: &mut S, record: &EditRecord) -> Result<()> {
    match record {
        EditRecord::Insert { position, runs, .. } => {
            surface.insert_runs(*position, runs)?;
            surface.set_caret(position + runs_len(runs))
        }
        EditRecord::Delete { position, runs } => {
            expect_text(surface, *position, runs)?;
            surface.delete_range(*position, position + runs_len(runs))?;
            surface.set_caret(*position)
        }
        EditRecord::Format { position, after, .. } => surface.restore_runs(*position, after),
    }
}
