//! 文書サーフェス
//!
//! リッチテキストの内容・選択範囲・書式操作のインターフェースと、
//! ラン列によるメモリ上の実装。

use super::change::{ChangeListener, ChangeNotifier, EditOrigin, EditRecord};
use super::runs::{runs_len, runs_text, StyledRun, StyledText};
use super::selection::Selection;
use super::style::{Rgb, StyleState};
use crate::error::{EditError, Result};

/// 文書サーフェスのインターフェース
///
/// 変更系の操作はすべて内容を変更する前に範囲を検証し、失敗時には何も変更しない。
/// 成功した変更はそれぞれ 1 つの [`EditRecord`] としてリスナーに通知される。
pub trait DocumentSurface {
    /// 文書全体のテキスト
    fn text(&self) -> String;

    /// 文書全体を置き換える（旧内容の削除と新内容の挿入として通知）
    fn set_text(&mut self, text: &str);

    fn len_chars(&self) -> usize;

    /// `[start, end)` のテキスト
    fn text_range(&self, start: usize, end: usize) -> Result<String>;

    fn runs(&self) -> &[StyledRun];

    fn style_at(&self, position: usize) -> Option<StyleState>;

    fn selection(&self) -> Selection;

    fn set_selection(&mut self, selection: Selection) -> Result<()>;

    fn caret(&self) -> usize;

    fn set_caret(&mut self, position: usize) -> Result<()>;

    /// 選択範囲に書式を設定する。空の選択では以後の入力書式のみ変わる
    fn set_character_formatting(&mut self, selection: Selection, style: StyleState) -> Result<()>;

    /// 次に入力される文字の書式
    fn input_style(&self) -> StyleState;

    fn foreground_color(&self) -> Rgb;

    fn set_foreground_color(&mut self, color: Rgb);

    /// 入力書式でテキストを挿入
    fn insert_text(&mut self, position: usize, text: &str, origin: EditOrigin) -> Result<()>;

    /// 書式付きランを挿入
    fn insert_runs(&mut self, position: usize, runs: &[StyledRun]) -> Result<()>;

    /// 範囲削除（削除したランを返す）
    fn delete_range(&mut self, start: usize, end: usize) -> Result<Vec<StyledRun>>;

    /// 同じテキストを持つ範囲の書式をランごと置き換える
    fn restore_runs(&mut self, position: usize, runs: &[StyledRun]) -> Result<()>;

    fn add_change_listener(&mut self, listener: Box<dyn ChangeListener>);
}

/// キャレット移動の種類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    Left,
    Right,
    LineStart,
    LineEnd,
    DocumentStart,
    DocumentEnd,
}

/// ラン列で内容を保持する文書
pub struct StyledDocument {
    /// 文書内容
    content: StyledText,
    /// 選択の起点
    anchor: usize,
    /// キャレット位置
    caret: usize,
    /// 入力書式
    input_style: StyleState,
    /// 現在の前景色（次の書式適用で使われる）
    foreground: Rgb,
    /// 変更通知システム
    change_notifier: ChangeNotifier,
}

impl StyledDocument {
    /// 新しい空の文書を作成
    pub fn new() -> Self {
        Self::with_style(StyleState::default())
    }

    /// 入力書式を指定して空の文書を作成
    pub fn with_style(style: StyleState) -> Self {
        Self {
            content: StyledText::new(),
            anchor: 0,
            caret: 0,
            input_style: style,
            foreground: style.color,
            change_notifier: ChangeNotifier::new(),
        }
    }

    /// キャレット位置に1文字入力する（選択範囲があれば置き換える）
    pub fn type_char(&mut self, ch: char) -> Result<()> {
        self.delete_selection()?;
        let position = self.caret;
        self.insert_text(position, &ch.to_string(), EditOrigin::Typing)
    }

    /// キャレット位置に文字列を入力する（貼り付け相当）
    pub fn type_str(&mut self, text: &str) -> Result<()> {
        self.delete_selection()?;
        let position = self.caret;
        self.insert_text(position, text, EditOrigin::Other)
    }

    /// Backspace 削除
    pub fn delete_backward(&mut self) -> Result<bool> {
        if self.delete_selection()? {
            return Ok(true);
        }
        if self.caret == 0 {
            return Ok(false);
        }
        let position = self.caret;
        self.delete_range(position - 1, position)?;
        Ok(true)
    }

    /// Delete 削除
    pub fn delete_forward(&mut self) -> Result<bool> {
        if self.delete_selection()? {
            return Ok(true);
        }
        if self.caret >= self.content.len_chars() {
            return Ok(false);
        }
        let position = self.caret;
        self.delete_range(position, position + 1)?;
        Ok(true)
    }

    /// 選択範囲を削除（空なら何もしない）
    pub fn delete_selection(&mut self) -> Result<bool> {
        let selection = self.selection();
        if selection.is_empty() {
            return Ok(false);
        }
        self.delete_range(selection.start, selection.end)?;
        Ok(true)
    }

    /// 全選択
    pub fn select_all(&mut self) {
        self.anchor = 0;
        self.caret = self.content.len_chars();
        self.refresh_input_style(0);
    }

    /// キャレットを移動する。`extend` なら選択範囲を広げる
    pub fn move_caret(&mut self, motion: Motion, extend: bool) {
        let text: Vec<char> = self.content.to_text().chars().collect();
        let len = text.len();
        let caret = self.caret;

        let target = match motion {
            Motion::Left => caret.saturating_sub(1),
            Motion::Right => (caret + 1).min(len),
            Motion::LineStart => text[..caret]
                .iter()
                .rposition(|&c| c == '\n')
                .map(|idx| idx + 1)
                .unwrap_or(0),
            Motion::LineEnd => text[caret..]
                .iter()
                .position(|&c| c == '\n')
                .map(|idx| caret + idx)
                .unwrap_or(len),
            Motion::DocumentStart => 0,
            Motion::DocumentEnd => len,
        };

        self.caret = target;
        if !extend {
            self.anchor = target;
        }
        self.refresh_input_style(self.selection().start);
    }

    /// キャレット直前の文字の書式を入力書式にする
    fn refresh_input_style(&mut self, position: usize) {
        let probe = if position > 0 {
            self.content.style_at(position - 1)
        } else {
            self.content.style_at(0)
        };
        if let Some(style) = probe {
            self.input_style = style;
        }
    }

    fn check_position(&self, position: usize) -> Result<()> {
        let len = self.content.len_chars();
        if position > len {
            return Err(EditError::OutOfBounds { position, len }.into());
        }
        Ok(())
    }

    fn check_range(&self, start: usize, end: usize) -> Result<()> {
        if start > end {
            return Err(EditError::InvalidRange { start, end }.into());
        }
        self.check_position(end)
    }

    /// 挿入に合わせて選択位置をずらす
    fn shift_for_insert(&mut self, position: usize, len: usize) {
        let shift = |p: usize| if p >= position { p + len } else { p };
        self.anchor = shift(self.anchor);
        self.caret = shift(self.caret);
    }

    /// 削除に合わせて選択位置をずらす
    fn shift_for_delete(&mut self, start: usize, end: usize) {
        let shift = |p: usize| {
            if p >= end {
                p - (end - start)
            } else if p > start {
                start
            } else {
                p
            }
        };
        self.anchor = shift(self.anchor);
        self.caret = shift(self.caret);
    }
}

impl Default for StyledDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentSurface for StyledDocument {
    fn text(&self) -> String {
        self.content.to_text()
    }

    fn set_text(&mut self, text: &str) {
        let len = self.content.len_chars();
        if len > 0 {
            let removed = self.content.remove(0, len);
            self.shift_for_delete(0, len);
            self.change_notifier.notify(EditRecord::Delete {
                position: 0,
                runs: removed,
            });
        }
        if !text.is_empty() {
            let runs = vec![StyledRun::new(text, self.input_style)];
            self.content.insert_runs(0, &runs);
            self.shift_for_insert(0, runs_len(&runs));
            self.change_notifier.notify(EditRecord::Insert {
                position: 0,
                runs,
                origin: EditOrigin::Other,
            });
        }
    }

    fn len_chars(&self) -> usize {
        self.content.len_chars()
    }

    fn text_range(&self, start: usize, end: usize) -> Result<String> {
        self.check_range(start, end)?;
        Ok(self.content.text_range(start, end))
    }

    fn runs(&self) -> &[StyledRun] {
        self.content.runs()
    }

    fn style_at(&self, position: usize) -> Option<StyleState> {
        self.content.style_at(position)
    }

    fn selection(&self) -> Selection {
        Selection::new(self.anchor, self.caret)
    }

    fn set_selection(&mut self, selection: Selection) -> Result<()> {
        self.check_range(selection.start, selection.end)?;
        self.anchor = selection.start;
        self.caret = selection.end;
        self.refresh_input_style(selection.start);
        Ok(())
    }

    fn caret(&self) -> usize {
        self.caret
    }

    fn set_caret(&mut self, position: usize) -> Result<()> {
        self.check_position(position)?;
        self.anchor = position;
        self.caret = position;
        self.refresh_input_style(position);
        Ok(())
    }

    fn set_character_formatting(&mut self, selection: Selection, style: StyleState) -> Result<()> {
        self.check_range(selection.start, selection.end)?;
        if selection.is_empty() {
            self.input_style = style;
            return Ok(());
        }

        let before = self.content.set_style(selection.start, selection.end, style);
        let after = vec![StyledRun::new(runs_text(&before), style)];
        if before == after {
            return Ok(());
        }
        self.change_notifier.notify(EditRecord::Format {
            position: selection.start,
            before,
            after,
        });
        Ok(())
    }

    fn input_style(&self) -> StyleState {
        self.input_style
    }

    fn foreground_color(&self) -> Rgb {
        self.foreground
    }

    fn set_foreground_color(&mut self, color: Rgb) {
        self.foreground = color;
    }

    fn insert_text(&mut self, position: usize, text: &str, origin: EditOrigin) -> Result<()> {
        self.check_position(position)?;
        if text.is_empty() {
            return Ok(());
        }
        let runs = vec![StyledRun::new(text, self.input_style)];
        self.content.insert_runs(position, &runs);
        self.shift_for_insert(position, runs_len(&runs));
        self.change_notifier.notify(EditRecord::Insert {
            position,
            runs,
            origin,
        });
        Ok(())
    }

    fn insert_runs(&mut self, position: usize, runs: &[StyledRun]) -> Result<()> {
        self.check_position(position)?;
        let len = runs_len(runs);
        if len == 0 {
            return Ok(());
        }
        self.content.insert_runs(position, runs);
        self.shift_for_insert(position, len);
        self.change_notifier.notify(EditRecord::Insert {
            position,
            runs: runs.to_vec(),
            origin: EditOrigin::Other,
        });
        Ok(())
    }

    fn delete_range(&mut self, start: usize, end: usize) -> Result<Vec<StyledRun>> {
        self.check_range(start, end)?;
        if start == end {
            return Ok(Vec::new());
        }
        let removed = self.content.remove(start, end);
        self.shift_for_delete(start, end);
        self.change_notifier.notify(EditRecord::Delete {
            position: start,
            runs: removed.clone(),
        });
        Ok(removed)
    }

    fn restore_runs(&mut self, position: usize, runs: &[StyledRun]) -> Result<()> {
        let end = position + runs_len(runs);
        self.check_range(position, end)?;
        let expected = runs_text(runs);
        if self.content.text_range(position, end) != expected {
            return Err(EditError::ContentMismatch { position, expected }.into());
        }

        let before = self.content.slice(position, end);
        if before.as_slice() == runs {
            return Ok(());
        }
        self.content.restore(position, runs);
        self.change_notifier.notify(EditRecord::Format {
            position,
            before,
            after: runs.to_vec(),
        });
        Ok(())
    }

    fn add_change_listener(&mut self, listener: Box<dyn ChangeListener>) {
        self.change_notifier.add_listener(listener);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Clone, Default)]
    struct Collector(Rc<RefCell<Vec<EditRecord>>>);

    impl ChangeListener for Collector {
        fn on_change(&mut self, record: &EditRecord) {
            self.0.borrow_mut().push(record.clone());
        }
    }

    fn bold() -> StyleState {
        StyleState {
            bold: true,
            ..StyleState::default()
        }
    }

    #[test]
    fn typing_advances_caret_and_reports_inserts() {
        let mut doc = StyledDocument::new();
        let collector = Collector::default();
        doc.add_change_listener(Box::new(collector.clone()));

        for ch in "Hi".chars() {
            doc.type_char(ch).unwrap();
        }

        assert_eq!(doc.text(), "Hi");
        assert_eq!(doc.caret(), 2);
        let records = collector.0.borrow();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].position(), 1);
        assert_eq!(records[1].origin(), EditOrigin::Typing);
    }

    #[test]
    fn formatting_empty_selection_only_changes_input_style() {
        let mut doc = StyledDocument::new();
        let collector = Collector::default();
        doc.add_change_listener(Box::new(collector.clone()));
        doc.type_str("ab").unwrap();
        collector.0.borrow_mut().clear();

        doc.set_character_formatting(Selection::caret(2), bold()).unwrap();
        assert!(collector.0.borrow().is_empty());
        assert_eq!(doc.style_at(0), Some(StyleState::default()));

        doc.type_char('c').unwrap();
        assert_eq!(doc.style_at(2), Some(bold()));
        assert_eq!(doc.style_at(1), Some(StyleState::default()));
    }

    #[test]
    fn formatting_range_reports_before_and_after() {
        let mut doc = StyledDocument::new();
        let collector = Collector::default();
        doc.add_change_listener(Box::new(collector.clone()));
        doc.type_str("Hello").unwrap();

        doc.set_character_formatting(Selection::new(0, 5), bold()).unwrap();

        let records = collector.0.borrow();
        assert_eq!(
            records.last(),
            Some(&EditRecord::Format {
                position: 0,
                before: vec![StyledRun::new("Hello", StyleState::default())],
                after: vec![StyledRun::new("Hello", bold())],
            })
        );
        assert_eq!(doc.caret(), 5);
        assert_eq!(doc.text(), "Hello");
    }

    #[test]
    fn formatting_range_keeps_input_style() {
        let mut doc = StyledDocument::new();
        doc.type_str("Hello").unwrap();

        doc.set_character_formatting(Selection::new(0, 5), bold()).unwrap();
        assert_eq!(doc.input_style(), StyleState::default());
        assert_eq!(doc.style_at(0), Some(bold()));
    }

    #[test]
    fn out_of_range_operations_leave_document_untouched() {
        let mut doc = StyledDocument::new();
        doc.type_str("abc").unwrap();

        assert!(doc.delete_range(1, 9).is_err());
        assert!(doc.insert_text(4, "x", EditOrigin::Other).is_err());
        assert!(doc
            .set_character_formatting(Selection::new(2, 7), bold())
            .is_err());
        assert!(doc.set_caret(10).is_err());
        assert_eq!(doc.text(), "abc");
        assert_eq!(doc.runs().len(), 1);
    }

    #[test]
    fn restore_rejects_mismatched_text() {
        let mut doc = StyledDocument::new();
        doc.type_str("abc").unwrap();
        let result = doc.restore_runs(0, &[StyledRun::new("xyz", bold())]);
        assert!(result.is_err());
        assert_eq!(doc.style_at(0), Some(StyleState::default()));
    }

    #[test]
    fn typing_replaces_selection() {
        let mut doc = StyledDocument::new();
        doc.type_str("hello world").unwrap();
        doc.set_selection(Selection::new(0, 5)).unwrap();
        doc.type_char('J').unwrap();
        assert_eq!(doc.text(), "J world");
        assert_eq!(doc.caret(), 1);
    }

    #[test]
    fn set_text_reports_delete_then_insert() {
        let mut doc = StyledDocument::new();
        doc.type_str("old").unwrap();
        let collector = Collector::default();
        doc.add_change_listener(Box::new(collector.clone()));

        doc.set_text("new text");

        let records = collector.0.borrow();
        assert!(matches!(records[0], EditRecord::Delete { position: 0, .. }));
        assert!(matches!(records[1], EditRecord::Insert { position: 0, .. }));
        assert_eq!(doc.text(), "new text");
    }

    #[test]
    fn caret_motions_follow_lines() {
        let mut doc = StyledDocument::new();
        doc.type_str("one\ntwo").unwrap();
        doc.move_caret(Motion::LineStart, false);
        assert_eq!(doc.caret(), 4);
        doc.move_caret(Motion::Left, false);
        assert_eq!(doc.caret(), 3);
        doc.move_caret(Motion::LineStart, true);
        assert_eq!(doc.selection(), Selection::new(0, 3));
        doc.move_caret(Motion::DocumentEnd, false);
        assert_eq!(doc.caret(), 7);
        assert!(doc.selection().is_empty());
    }
}
