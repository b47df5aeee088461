//! 画面全体のレイアウトと描画

use super::text_area::DocumentView;
use ratatui::layout::{Constraint, Direction, Layout, Position, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

/// 描画する画面内容
#[derive(Debug, Clone, Default)]
pub struct Screen {
    pub toolbar: Line<'static>,
    pub document: DocumentView,
    pub status: Line<'static>,
}

/// 最下行に重ねる入力プロンプト
#[derive(Debug, Clone)]
pub struct PromptView {
    pub label: String,
    pub input: String,
    /// 入力欄に置くカーソルの表示列（`None` ならカーソルを出さない）
    pub cursor: Option<usize>,
}

/// 画面の三分割（ツールバー・本文・ステータス）
pub fn split_area(area: Rect) -> [Rect; 3] {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(area);
    [chunks[0], chunks[1], chunks[2]]
}

/// キャレットが見えるように先頭行を調整する
pub fn adjust_scroll(scroll_top: usize, caret_line: usize, height: usize) -> usize {
    let height = height.max(1);
    if caret_line < scroll_top {
        caret_line
    } else if caret_line >= scroll_top + height {
        caret_line + 1 - height
    } else {
        scroll_top
    }
}

/// 画面を描画する。戻り値は調整後の先頭行
pub fn draw_screen(
    frame: &mut Frame<'_>,
    screen: &Screen,
    prompt: Option<&PromptView>,
    scroll_top: usize,
) -> usize {
    let [toolbar_area, body_area, status_area] = split_area(frame.area());

    frame.render_widget(
        Paragraph::new(screen.toolbar.clone())
            .style(Style::default().add_modifier(Modifier::REVERSED)),
        toolbar_area,
    );

    let view = &screen.document;
    let height = body_area.height as usize;
    let top = adjust_scroll(scroll_top, view.caret_line, height);
    let visible: Vec<Line<'static>> = view.lines.iter().skip(top).take(height).cloned().collect();
    frame.render_widget(Paragraph::new(visible), body_area);

    match prompt {
        Some(prompt) => {
            let line = Line::from(vec![
                Span::styled(prompt.label.clone(), Style::default().add_modifier(Modifier::BOLD)),
                Span::raw(prompt.input.clone()),
            ]);
            frame.render_widget(Paragraph::new(line), status_area);
            if let Some(cursor) = prompt.cursor {
                let label_width = unicode_width::UnicodeWidthStr::width(prompt.label.as_str());
                let x = status_area.x + (label_width + cursor).min(u16::MAX as usize) as u16;
                frame.set_cursor_position(Position::new(
                    x.min(status_area.right().saturating_sub(1)),
                    status_area.y,
                ));
            }
        }
        None => {
            frame.render_widget(Paragraph::new(screen.status.clone()), status_area);
            let x = body_area.x + view.caret_column.min(u16::MAX as usize) as u16;
            let y = body_area.y + (view.caret_line - top) as u16;
            frame.set_cursor_position(Position::new(
                x.min(body_area.right().saturating_sub(1)),
                y,
            ));
        }
    }

    top
}
