//! 変更通知
//!
//! 文書が内容・書式を変更するたびに、可逆な編集単位 [`EditRecord`] を
//! 登録済みリスナーへ配信する。

use super::runs::{runs_len, runs_text, StyledRun};

/// 編集の発生元
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOrigin {
    /// キー入力による1文字ずつの挿入（履歴で結合されうる）
    Typing,
    /// それ以外（貼り付け、置換、プログラムからの編集）
    Other,
}

/// 可逆な編集単位
#[derive(Debug, Clone, PartialEq)]
pub enum EditRecord {
    /// テキスト挿入
    Insert {
        position: usize,
        runs: Vec<StyledRun>,
        origin: EditOrigin,
    },
    /// テキスト削除
    Delete { position: usize, runs: Vec<StyledRun> },
    /// 書式変更（テキストは同一、ランの書式だけが `before` から `after` に変わる）
    Format {
        position: usize,
        before: Vec<StyledRun>,
        after: Vec<StyledRun>,
    },
}

impl EditRecord {
    pub fn position(&self) -> usize {
        match self {
            EditRecord::Insert { position, .. }
            | EditRecord::Delete { position, .. }
            | EditRecord::Format { position, .. } => *position,
        }
    }

    /// 対象範囲の文字数
    pub fn len_chars(&self) -> usize {
        match self {
            EditRecord::Insert { runs, .. } | EditRecord::Delete { runs, .. } => runs_len(runs),
            EditRecord::Format { before, .. } => runs_len(before),
        }
    }

    /// 対象範囲のテキスト
    pub fn text(&self) -> String {
        match self {
            EditRecord::Insert { runs, .. } | EditRecord::Delete { runs, .. } => runs_text(runs),
            EditRecord::Format { before, .. } => runs_text(before),
        }
    }

    pub fn origin(&self) -> EditOrigin {
        match self {
            EditRecord::Insert { origin, .. } => *origin,
            _ => EditOrigin::Other,
        }
    }
}

/// 変更通知リスナー
pub trait ChangeListener {
    fn on_change(&mut self, record: &EditRecord);
}

/// 変更通知システム
#[derive(Default)]
pub struct ChangeNotifier {
    listeners: Vec<Box<dyn ChangeListener>>,
}

impl ChangeNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// リスナーを追加
    pub fn add_listener(&mut self, listener: Box<dyn ChangeListener>) {
        self.listeners.push(listener);
    }

    /// 変更を通知
    pub fn notify(&mut self, record: EditRecord) {
        for listener in &mut self.listeners {
            listener.on_change(&record);
        }
    }
}
