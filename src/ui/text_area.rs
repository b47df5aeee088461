//! テキストエリア描画
//!
//! スタイル付きランを端末の行・スパンに変換する。フォントサイズは端末では表現できないため
//! 描画には反映しない。

use crate::document::{DocumentSurface, StyleState, StyledDocument};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use unicode_width::UnicodeWidthChar;

/// タブの表示幅
pub const TAB_WIDTH: usize = 4;

/// 描画用の文書ビュー
#[derive(Debug, Clone, Default)]
pub struct DocumentView {
    /// 行ごとのスパン
    pub lines: Vec<Line<'static>>,
    /// キャレットの行
    pub caret_line: usize,
    /// キャレットの表示列
    pub caret_column: usize,
}

/// 文字書式から端末スタイルへ
pub fn terminal_style(style: &StyleState) -> Style {
    let mut result = Style::default().fg(Color::Rgb(style.color.r, style.color.g, style.color.b));
    if style.bold {
        result = result.add_modifier(Modifier::BOLD);
    }
    if style.italic {
        result = result.add_modifier(Modifier::ITALIC);
    }
    if style.underline {
        result = result.add_modifier(Modifier::UNDERLINED);
    }
    result
}

/// 行を組み立てる途中の状態
struct LineBuilder {
    spans: Vec<Span<'static>>,
    pending: String,
    pending_style: Style,
    width: usize,
}

impl LineBuilder {
    fn new() -> Self {
        Self {
            spans: Vec::new(),
            pending: String::new(),
            pending_style: Style::default(),
            width: 0,
        }
    }

    fn push(&mut self, text: &str, style: Style, width: usize) {
        if style != self.pending_style && !self.pending.is_empty() {
            self.flush();
        }
        self.pending_style = style;
        self.pending.push_str(text);
        self.width += width;
    }

    fn flush(&mut self) {
        if !self.pending.is_empty() {
            let text = std::mem::take(&mut self.pending);
            self.spans.push(Span::styled(text, self.pending_style));
        }
    }

    fn finish(mut self) -> Line<'static> {
        self.flush();
        Line::from(self.spans)
    }
}

/// 文書から描画用ビューを作る（選択範囲は反転表示）
pub fn document_view(document: &StyledDocument) -> DocumentView {
    let selection = document.selection();
    let caret = document.caret();

    let mut view = DocumentView::default();
    let mut line = LineBuilder::new();
    let mut position = 0;

    for run in document.runs() {
        let base = terminal_style(&run.style);
        for ch in run.text.chars() {
            if position == caret {
                view.caret_line = view.lines.len();
                view.caret_column = line.width;
            }
            let style = if selection.contains(position) {
                base.add_modifier(Modifier::REVERSED)
            } else {
                base
            };

            match ch {
                '\n' => {
                    if selection.contains(position) {
                        line.push(" ", style, 1);
                    }
                    let finished = std::mem::replace(&mut line, LineBuilder::new());
                    view.lines.push(finished.finish());
                }
                '\t' => line.push(&" ".repeat(TAB_WIDTH), style, TAB_WIDTH),
                _ => {
                    let mut buf = [0u8; 4];
                    line.push(ch.encode_utf8(&mut buf), style, ch.width().unwrap_or(0));
                }
            }
            position += 1;
        }
    }

    if position == caret {
        view.caret_line = view.lines.len();
        view.caret_column = line.width;
    }
    view.lines.push(line.finish());
    view
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Rgb, Selection};

    #[test]
    fn caret_is_tracked_across_lines() {
        let mut doc = StyledDocument::new();
        doc.type_str("ab\n日本").unwrap();

        let view = document_view(&doc);
        assert_eq!(view.lines.len(), 2);
        assert_eq!(view.caret_line, 1);
        // 全角文字は幅 2
        assert_eq!(view.caret_column, 4);
    }

    #[test]
    fn styled_runs_become_styled_spans() {
        let mut doc = StyledDocument::new();
        doc.type_str("plain bold").unwrap();
        let bold_blue = StyleState {
            bold: true,
            color: Rgb::new(0, 0, 255),
            ..StyleState::default()
        };
        doc.set_character_formatting(Selection::new(6, 10), bold_blue).unwrap();
        doc.set_caret(0).unwrap();

        let view = document_view(&doc);
        let spans = &view.lines[0].spans;
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0].content, "plain ");
        assert_eq!(spans[1].content, "bold");
        assert!(spans[1].style.add_modifier.contains(Modifier::BOLD));
        assert_eq!(spans[1].style.fg, Some(Color::Rgb(0, 0, 255)));
    }

    #[test]
    fn selection_is_reversed() {
        let mut doc = StyledDocument::new();
        doc.type_str("abcd").unwrap();
        doc.set_selection(Selection::new(1, 3)).unwrap();

        let view = document_view(&doc);
        let spans = &view.lines[0].spans;
        assert_eq!(spans.len(), 3);
        assert!(spans[1].style.add_modifier.contains(Modifier::REVERSED));
        assert!(!spans[0].style.add_modifier.contains(Modifier::REVERSED));
    }
}
