//! スタイル付きランの列
//!
//! 文書内容を「同じ書式を共有する最大の文字列片」の順序付き列として保持する。
//! 位置はすべて文字単位。隣接する同一書式のランは常に結合され、空のランは残らない。

use super::style::StyleState;

/// 単一書式のテキスト片
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyledRun {
    pub text: String,
    pub style: StyleState,
}

impl StyledRun {
    pub fn new(text: impl Into<String>, style: StyleState) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }

    /// 文字数
    pub fn len_chars(&self) -> usize {
        self.text.chars().count()
    }

    /// `at` 文字目で分割し、後半を返す
    fn split_off(&mut self, at: usize) -> StyledRun {
        let byte = char_to_byte(&self.text, at);
        StyledRun {
            text: self.text.split_off(byte),
            style: self.style,
        }
    }
}

/// ラン列の合計文字数
pub fn runs_len(runs: &[StyledRun]) -> usize {
    runs.iter().map(StyledRun::len_chars).sum()
}

/// ラン列の連結テキスト
pub fn runs_text(runs: &[StyledRun]) -> String {
    runs.iter().map(|run| run.text.as_str()).collect()
}

fn char_to_byte(s: &str, char_pos: usize) -> usize {
    s.char_indices()
        .nth(char_pos)
        .map(|(idx, _)| idx)
        .unwrap_or(s.len())
}

/// スタイル付きテキスト本体
///
/// 呼び出し側は範囲の妥当性を事前に検証すること。範囲外の位置は末尾に丸められる。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyledText {
    runs: Vec<StyledRun>,
    len: usize,
}

impl StyledText {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_runs(runs: Vec<StyledRun>) -> Self {
        let mut text = Self { runs, len: 0 };
        text.normalize();
        text
    }

    pub fn len_chars(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn runs(&self) -> &[StyledRun] {
        &self.runs
    }

    pub fn to_text(&self) -> String {
        runs_text(&self.runs)
    }

    /// `[start, end)` のテキスト
    pub fn text_range(&self, start: usize, end: usize) -> String {
        runs_text(&self.slice(start, end))
    }

    /// 位置 `pos` の文字の書式
    pub fn style_at(&self, pos: usize) -> Option<StyleState> {
        let mut offset = 0;
        for run in &self.runs {
            let run_len = run.len_chars();
            if pos < offset + run_len {
                return Some(run.style);
            }
            offset += run_len;
        }
        None
    }

    /// `[start, end)` のランを複製して返す
    pub fn slice(&self, start: usize, end: usize) -> Vec<StyledRun> {
        let mut result = Vec::new();
        let mut offset = 0;
        for run in &self.runs {
            let run_len = run.len_chars();
            let run_end = offset + run_len;
            if run_end > start && offset < end {
                let from = start.saturating_sub(offset);
                let to = (end - offset).min(run_len);
                let text: String = run.text.chars().skip(from).take(to - from).collect();
                result.push(StyledRun::new(text, run.style));
            }
            offset = run_end;
            if offset >= end {
                break;
            }
        }
        result
    }

    /// `pos` にランを挿入
    pub fn insert_runs(&mut self, pos: usize, runs: &[StyledRun]) {
        let idx = self.split_at(pos);
        self.runs.splice(idx..idx, runs.iter().cloned());
        self.normalize();
    }

    /// `[start, end)` を削除し、削除したランを返す
    pub fn remove(&mut self, start: usize, end: usize) -> Vec<StyledRun> {
        let from = self.split_at(start);
        let to = self.split_at(end);
        let removed: Vec<StyledRun> = self.runs.drain(from..to).collect();
        self.normalize();
        StyledText::from_runs(removed).runs
    }

    /// `[start, end)` に書式を設定し、設定前のランを返す
    pub fn set_style(&mut self, start: usize, end: usize, style: StyleState) -> Vec<StyledRun> {
        let before = self.slice(start, end);
        let from = self.split_at(start);
        let to = self.split_at(end);
        for run in &mut self.runs[from..to] {
            run.style = style;
        }
        self.normalize();
        before
    }

    /// `pos` から始まる範囲をランで置き換える（書式の復元用）
    pub fn restore(&mut self, pos: usize, runs: &[StyledRun]) {
        let end = pos + runs_len(runs);
        self.remove(pos, end);
        self.insert_runs(pos, runs);
    }

    /// `pos` にラン境界を作り、`pos` から始まるランのインデックスを返す
    fn split_at(&mut self, pos: usize) -> usize {
        let mut offset = 0;
        for idx in 0..self.runs.len() {
            if pos == offset {
                return idx;
            }
            let run_len = self.runs[idx].len_chars();
            if pos < offset + run_len {
                let tail = self.runs[idx].split_off(pos - offset);
                self.runs.insert(idx + 1, tail);
                return idx + 1;
            }
            offset += run_len;
        }
        self.runs.len()
    }

    fn normalize(&mut self) {
        let mut merged: Vec<StyledRun> = Vec::with_capacity(self.runs.len());
        for run in self.runs.drain(..) {
            if run.text.is_empty() {
                continue;
            }
            match merged.last_mut() {
                Some(last) if last.style == run.style => last.text.push_str(&run.text),
                _ => merged.push(run),
            }
        }
        self.runs = merged;
        self.len = runs_len(&self.runs);
    }
}
