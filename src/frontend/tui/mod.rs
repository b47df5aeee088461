pub mod prompt;

use crate::config::EditorConfig;
use crate::document::Rgb;
use crate::error::{EditorError, ErrorDisplay, FileError, Result, UiError};
use crate::file::expand_path;
use crate::input::KeyMap;
use crate::shell::{Dispatcher, EditorState, Host};
use crate::ui::{document_view, draw_screen, status_line, toolbar_line, PromptView, Screen};
use crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen};
use prompt::{PalettePrompt, PathPrompt, Prompt, PromptStep};
use ratatui::backend::{Backend, CrosstermBackend};
use ratatui::Terminal;
use std::collections::VecDeque;
use std::io::stdout;
use std::path::{Path, PathBuf};
use std::time::Duration;

const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// 端末イベントの取得元
pub trait EventSource {
    /// `timeout` 以内にイベントが届くか
    fn poll(&mut self, timeout: Duration) -> Result<bool>;

    /// 次のイベント。入力が閉じていれば `None`
    fn read(&mut self) -> Result<Option<Event>>;
}

/// crossterm から読むイベントソース
pub struct CrosstermEvents;

impl EventSource for CrosstermEvents {
    fn poll(&mut self, timeout: Duration) -> Result<bool> {
        event::poll(timeout).map_err(|err| terminal_error("event poll", err))
    }

    fn read(&mut self) -> Result<Option<Event>> {
        event::read()
            .map(Some)
            .map_err(|err| terminal_error("event read", err))
    }
}

/// あらかじめ積んだイベントを返すソース（自動操作・テスト向け）
#[derive(Debug, Default)]
pub struct QueuedEvents {
    events: VecDeque<Event>,
}

impl QueuedEvents {
    pub fn new(events: impl IntoIterator<Item = Event>) -> Self {
        Self {
            events: events.into_iter().collect(),
        }
    }
}

impl EventSource for QueuedEvents {
    fn poll(&mut self, _timeout: Duration) -> Result<bool> {
        // 空になったら read が None を返して終了させる
        Ok(true)
    }

    fn read(&mut self) -> Result<Option<Event>> {
        Ok(self.events.pop_front())
    }
}

/// 端末上のホスト実装
///
/// ダイアログは最下行のプロンプトとして同期的に実行する。プロンプト中も直前の画面を背景として描く。
pub struct TerminalHost<B: Backend> {
    terminal: Terminal<B>,
    events: Box<dyn EventSource>,
    palette: Vec<Rgb>,
    backdrop: Screen,
    notice: Option<ErrorDisplay>,
    scroll_top: usize,
}

impl<B: Backend> TerminalHost<B> {
    pub fn new(terminal: Terminal<B>, events: Box<dyn EventSource>, palette: Vec<Rgb>) -> Self {
        Self {
            terminal,
            events,
            palette,
            backdrop: Screen::default(),
            notice: None,
            scroll_top: 0,
        }
    }

    pub fn notice(&self) -> Option<&ErrorDisplay> {
        self.notice.as_ref()
    }

    /// エディタ状態を描画する
    pub fn render(&mut self, state: &EditorState) -> Result<()> {
        if self.notice.as_ref().is_some_and(|notice| notice.is_expired()) {
            self.notice = None;
        }
        self.backdrop = Screen {
            toolbar: toolbar_line(state),
            document: document_view(&state.document),
            status: status_line(state, self.notice.as_ref()),
        };
        self.draw(None)
    }

    fn draw(&mut self, prompt: Option<&PromptView>) -> Result<()> {
        let screen = &self.backdrop;
        let mut top = self.scroll_top;
        self.terminal
            .draw(|frame| {
                top = draw_screen(frame, screen, prompt, top);
            })
            .map_err(|err| terminal_error("render", err))?;
        self.scroll_top = top;
        Ok(())
    }

    /// 次のキー押下を待つ。入力が閉じていれば `None`
    fn next_key(&mut self) -> Result<Option<KeyEvent>> {
        loop {
            if !self.events.poll(POLL_INTERVAL)? {
                continue;
            }
            match self.events.read()? {
                None => return Ok(None),
                Some(Event::Key(key)) if key.kind == KeyEventKind::Press => return Ok(Some(key)),
                Some(_) => {}
            }
        }
    }

    fn run_prompt<P: Prompt>(&mut self, mut prompt: P) -> Result<Option<P::Output>> {
        loop {
            self.draw(Some(&prompt.view()))?;
            let Some(key) = self.next_key()? else {
                return Ok(None);
            };
            match prompt.handle_key(key) {
                PromptStep::Continue => {}
                PromptStep::Submit(value) => return Ok(Some(value)),
                PromptStep::Cancel => return Ok(None),
            }
        }
    }

    /// プロンプトを実行し、端末エラーはキャンセル扱いにして報告する
    fn prompt_or_cancel<P: Prompt>(&mut self, prompt: P) -> Option<P::Output> {
        match self.run_prompt(prompt) {
            Ok(value) => value,
            Err(err) => {
                self.report_error(&err);
                None
            }
        }
    }

    fn prompt_path(&mut self, label: &'static str, initial: &str) -> Option<PathBuf> {
        let input = self.prompt_or_cancel(PathPrompt::new(label, initial))?;
        match expand_path(&input) {
            Ok(path) => Some(path),
            Err(err) => {
                self.report_error(&err);
                None
            }
        }
    }
}

impl<B: Backend> Host for TerminalHost<B> {
    fn choose_open_path(&mut self) -> Option<PathBuf> {
        self.prompt_path("Open: ", "")
    }

    fn choose_save_path(&mut self, current: Option<&Path>) -> Option<PathBuf> {
        let initial = current
            .map(|path| path.display().to_string())
            .unwrap_or_default();
        self.prompt_path("Save as: ", &initial)
    }

    fn choose_color(&mut self, initial: Rgb) -> Option<Rgb> {
        let prompt = PalettePrompt::new(&self.palette, initial);
        self.prompt_or_cancel(prompt)
    }

    fn report_error(&mut self, error: &EditorError) {
        log::error!("{}", error);
        self.notice = Some(ErrorDisplay::new(error));
    }
}

/// 端末アプリケーション
pub struct TuiApplication {
    state: EditorState,
    dispatcher: Dispatcher,
    keymap: KeyMap,
    palette: Vec<Rgb>,
}

impl TuiApplication {
    pub fn new(config: &EditorConfig) -> Result<Self> {
        Ok(Self {
            state: EditorState::with_config(config)?,
            dispatcher: Dispatcher::new(),
            keymap: KeyMap::new(),
            palette: config.palette.clone(),
        })
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    /// 起動時に指定されたファイルを開く。存在しなければ新規ファイルとして扱う
    pub fn open_initial(&mut self, path: &Path) -> Result<()> {
        match self.state.load_file(path) {
            Ok(()) => Ok(()),
            Err(EditorError::File(FileError::NotFound { .. })) => {
                self.state.set_file_path(Some(path.to_path_buf()));
                self.state.set_status("(新規ファイル)");
                Ok(())
            }
            Err(err) => Err(err),
        }
    }

    pub fn run(&mut self) -> Result<()> {
        enter_terminal()?;

        let backend = CrosstermBackend::new(stdout());
        let terminal = match Terminal::new(backend) {
            Ok(terminal) => terminal,
            Err(err) => {
                let _ = leave_terminal();
                return Err(terminal_error("terminal init", err));
            }
        };
        let mut host = TerminalHost::new(terminal, Box::new(CrosstermEvents), self.palette.clone());

        let loop_result = self.event_loop(&mut host);
        let show_cursor_result = host
            .terminal
            .show_cursor()
            .map_err(|err| terminal_error("show cursor", err));
        drop(host);
        let cleanup_result = leave_terminal();

        loop_result.and(show_cursor_result).and(cleanup_result)
    }

    /// 終了要求か入力の終わりまでイベントを処理する
    pub fn event_loop<B: Backend>(&mut self, host: &mut TerminalHost<B>) -> Result<()> {
        while self.state.is_running() {
            host.render(&self.state)?;

            if !host.events.poll(POLL_INTERVAL)? {
                continue;
            }
            match host.events.read()? {
                None => break,
                Some(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                    self.handle_key(host, key);
                }
                Some(Event::Resize(_, _)) => {}
                Some(_) => {}
            }
        }

        Ok(())
    }

    fn handle_key<B: Backend>(&mut self, host: &mut TerminalHost<B>, key: KeyEvent) {
        let Some(event) = self.keymap.lookup_event(key) else {
            return;
        };
        self.state.clear_status();
        let result = self.dispatcher.dispatch(&mut self.state, host, &event);
        if result.success {
            host.notice = None;
        }
    }
}

/// 端末を生モード・代替画面に切り替える
pub fn enter_terminal() -> Result<()> {
    enable_raw_mode().map_err(|_| EditorError::Ui(UiError::TerminalInit))?;
    let mut out = stdout();
    execute!(out, EnterAlternateScreen).map_err(|err| terminal_error("enter alternate screen", err))?;
    Ok(())
}

/// 端末を元に戻す
pub fn leave_terminal() -> Result<()> {
    let mut out = stdout();
    execute!(out, LeaveAlternateScreen).map_err(|err| terminal_error("leave alternate screen", err))?;
    disable_raw_mode().map_err(|err| terminal_error("disable raw mode", err))?;
    Ok(())
}

fn terminal_error(context: &str, err: impl std::fmt::Display) -> EditorError {
    EditorError::Ui(UiError::RenderingFailed {
        component: format!("{}: {}", context, err),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::DocumentSurface;
    use crossterm::event::{KeyCode, KeyModifiers};
    use ratatui::backend::TestBackend;
    use tempfile::tempdir;

    fn press(code: KeyCode, modifiers: KeyModifiers) -> Event {
        Event::Key(KeyEvent::new(code, modifiers))
    }

    fn typed(text: &str) -> Vec<Event> {
        text.chars()
            .map(|ch| press(KeyCode::Char(ch), KeyModifiers::NONE))
            .collect()
    }

    fn host_with(events: Vec<Event>) -> TerminalHost<TestBackend> {
        let terminal = Terminal::new(TestBackend::new(60, 10)).unwrap();
        TerminalHost::new(
            terminal,
            Box::new(QueuedEvents::new(events)),
            EditorConfig::default().palette,
        )
    }

    #[test]
    fn typing_and_undo_through_key_chords() {
        let mut app = TuiApplication::new(&EditorConfig::default()).unwrap();
        let mut events = typed("Hello");
        events.push(press(KeyCode::Char('z'), KeyModifiers::CONTROL));
        let mut host = host_with(events);

        app.event_loop(&mut host).unwrap();
        assert_eq!(app.state().document.text(), "");
        assert!(app.state().history.can_redo());
    }

    #[test]
    fn save_prompt_writes_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.txt");

        let mut app = TuiApplication::new(&EditorConfig::default()).unwrap();
        let mut events = typed("abc");
        events.push(press(KeyCode::Char('s'), KeyModifiers::CONTROL));
        events.extend(typed(&path.display().to_string()));
        events.push(press(KeyCode::Enter, KeyModifiers::NONE));
        let mut host = host_with(events);

        app.event_loop(&mut host).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "abc");
        assert_eq!(app.state().file_path(), Some(path.as_path()));
    }

    #[test]
    fn failed_open_reports_notice() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("missing.txt");

        let mut app = TuiApplication::new(&EditorConfig::default()).unwrap();
        let mut events = vec![press(KeyCode::Char('o'), KeyModifiers::CONTROL)];
        events.extend(typed(&missing.display().to_string()));
        events.push(press(KeyCode::Enter, KeyModifiers::NONE));
        let mut host = host_with(events);

        app.event_loop(&mut host).unwrap();
        assert!(host.notice().is_some());
        assert_eq!(app.state().file_path(), None);
    }

    #[test]
    fn color_prompt_applies_palette_entry() {
        let mut app = TuiApplication::new(&EditorConfig::default()).unwrap();
        let mut events = typed("ab");
        events.push(press(KeyCode::Char('a'), KeyModifiers::CONTROL));
        events.push(press(KeyCode::F(3), KeyModifiers::NONE));
        events.push(press(KeyCode::Char('4'), KeyModifiers::NONE));
        let mut host = host_with(events);

        app.event_loop(&mut host).unwrap();
        let blue = EditorConfig::default().palette[3];
        assert_eq!(app.state().document.foreground_color(), blue);
        assert_eq!(app.state().document.style_at(0).map(|s| s.color), Some(blue));
    }

    #[test]
    fn exit_chord_stops_loop() {
        let mut app = TuiApplication::new(&EditorConfig::default()).unwrap();
        let mut events = vec![press(KeyCode::Char('q'), KeyModifiers::CONTROL)];
        events.extend(typed("ignored"));
        let mut host = host_with(events);

        app.event_loop(&mut host).unwrap();
        assert!(!app.state().is_running());
        assert_eq!(app.state().document.text(), "");
    }

    #[test]
    fn missing_initial_file_starts_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("new.txt");

        let mut app = TuiApplication::new(&EditorConfig::default()).unwrap();
        app.open_initial(&path).unwrap();
        assert_eq!(app.state().file_path(), Some(path.as_path()));
        assert_eq!(app.state().document.text(), "");
    }
}
