//! ツールバー行とステータスライン

use crate::document::DocumentSurface;
use crate::error::{ErrorDisplay, ErrorLevel};
use crate::shell::EditorState;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

fn toggle_span(label: &'static str, active: bool, modifier: Modifier) -> Span<'static> {
    let style = if active {
        Style::default()
            .fg(Color::Black)
            .bg(Color::Gray)
            .add_modifier(modifier)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    Span::styled(format!(" {} ", label), style)
}

/// ツールバー行（サイズ・B/I/U・現在の前景色）
pub fn toolbar_line(state: &EditorState) -> Line<'static> {
    let toolbar = &state.toolbar;
    let color = state.document.foreground_color();

    Line::from(vec![
        Span::styled(
            format!(" Size {}pt ", toolbar.font_size),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
        toggle_span("B", toolbar.bold, Modifier::BOLD),
        toggle_span("I", toolbar.italic, Modifier::ITALIC),
        toggle_span("U", toolbar.underline, Modifier::UNDERLINED),
        Span::raw("  "),
        Span::styled("■", Style::default().fg(Color::Rgb(color.r, color.g, color.b))),
        Span::raw(format!(" {}", color.to_hex())),
    ])
}

/// ステータスライン。通知があればそちらを優先する
pub fn status_line(state: &EditorState, notice: Option<&ErrorDisplay>) -> Line<'static> {
    if let Some(notice) = notice {
        let color = match notice.level {
            ErrorLevel::Info => Color::Cyan,
            ErrorLevel::Warning => Color::Yellow,
            ErrorLevel::Error => Color::Red,
        };
        return Line::from(Span::styled(
            notice.message.clone(),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ));
    }

    let (undo, redo) = state.history.depth();
    let mut spans = vec![
        Span::styled(
            format!(" {} ", state.file_label()),
            Style::default().add_modifier(Modifier::REVERSED),
        ),
        Span::raw(format!(
            "  {} chars  undo {} / redo {}",
            state.document.len_chars(),
            undo,
            redo
        )),
    ];
    if let Some(status) = state.status() {
        spans.push(Span::raw(format!("  {}", status)));
    }
    Line::from(spans)
}
