//! 最下行のプロンプト（パス入力・パレット色選択）
//!
//! キー入力を受けて状態を進めるだけの純粋な状態機械。描画とイベント取得は呼び出し側。

use crate::document::Rgb;
use crate::ui::PromptView;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use unicode_width::UnicodeWidthStr;

/// プロンプトの進行結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptStep<T> {
    Continue,
    Submit(T),
    Cancel,
}

/// 最下行で入力を受け付けるプロンプト
pub trait Prompt {
    type Output;

    /// キーを 1 つ処理する
    fn handle_key(&mut self, key: KeyEvent) -> PromptStep<Self::Output>;

    /// 描画内容
    fn view(&self) -> PromptView;
}

/// パス入力プロンプト
#[derive(Debug, Clone)]
pub struct PathPrompt {
    label: &'static str,
    input: String,
}

impl PathPrompt {
    pub fn new(label: &'static str, initial: &str) -> Self {
        Self {
            label,
            input: initial.to_string(),
        }
    }
}

impl Prompt for PathPrompt {
    type Output = String;

    fn handle_key(&mut self, key: KeyEvent) -> PromptStep<String> {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return match key.code {
                // C-g で中止、C-u で入力をクリア
                KeyCode::Char('g') => PromptStep::Cancel,
                KeyCode::Char('u') => {
                    self.input.clear();
                    PromptStep::Continue
                }
                _ => PromptStep::Continue,
            };
        }

        match key.code {
            KeyCode::Esc => PromptStep::Cancel,
            KeyCode::Enter => {
                let trimmed = self.input.trim();
                if trimmed.is_empty() {
                    PromptStep::Cancel
                } else {
                    PromptStep::Submit(trimmed.to_string())
                }
            }
            KeyCode::Backspace => {
                self.input.pop();
                PromptStep::Continue
            }
            KeyCode::Char(ch) => {
                self.input.push(ch);
                PromptStep::Continue
            }
            _ => PromptStep::Continue,
        }
    }

    fn view(&self) -> PromptView {
        PromptView {
            label: self.label.to_string(),
            input: self.input.clone(),
            cursor: Some(self.input.width()),
        }
    }
}

/// パレットからの色選択プロンプト
#[derive(Debug, Clone)]
pub struct PalettePrompt {
    palette: Vec<Rgb>,
    index: usize,
}

impl PalettePrompt {
    /// `initial` がパレットにあればそれを選択した状態で開く
    pub fn new(palette: &[Rgb], initial: Rgb) -> Self {
        let mut palette = palette.to_vec();
        if palette.is_empty() {
            palette.push(initial);
        }
        let index = palette.iter().position(|c| *c == initial).unwrap_or(0);
        Self { palette, index }
    }

    pub fn selected(&self) -> Rgb {
        self.palette[self.index]
    }
}

impl Prompt for PalettePrompt {
    type Output = Rgb;

    fn handle_key(&mut self, key: KeyEvent) -> PromptStep<Rgb> {
        let len = self.palette.len();
        match key.code {
            KeyCode::Esc => PromptStep::Cancel,
            KeyCode::Char('g') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                PromptStep::Cancel
            }
            KeyCode::Enter => PromptStep::Submit(self.selected()),
            KeyCode::Left => {
                self.index = (self.index + len - 1) % len;
                PromptStep::Continue
            }
            KeyCode::Right | KeyCode::Tab => {
                self.index = (self.index + 1) % len;
                PromptStep::Continue
            }
            KeyCode::Char(ch) => match ch.to_digit(10) {
                Some(digit) if digit >= 1 && (digit as usize) <= len => {
                    self.index = digit as usize - 1;
                    PromptStep::Submit(self.selected())
                }
                _ => PromptStep::Continue,
            },
            _ => PromptStep::Continue,
        }
    }

    fn view(&self) -> PromptView {
        let entries: Vec<String> = self
            .palette
            .iter()
            .enumerate()
            .map(|(idx, color)| {
                if idx == self.index {
                    format!("[{}:{}]", idx + 1, color.to_hex())
                } else {
                    format!(" {}:{} ", idx + 1, color.to_hex())
                }
            })
            .collect();
        PromptView {
            label: "Color: ".to_string(),
            input: entries.join(""),
            cursor: None,
        }
    }
}
