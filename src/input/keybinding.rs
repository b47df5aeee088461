//! キーバインドシステム
//!
//! キー操作を UI イベントに対応付ける。メニューと同じ [`UiEvent`] を発行するので、
//! どちらから呼んでも同じ振り分け表・同じ履歴を通る。

use crate::document::Motion;
use crate::editor::FONT_SIZES;
use crate::shell::UiEvent;
use crossterm::event::{KeyCode as CrosstermKeyCode, KeyEvent, KeyModifiers as CrosstermModifiers};
use std::collections::HashMap;

/// キー入力の内部表現
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Key {
    /// 修飾キー
    pub modifiers: KeyModifiers,
    /// 基本キー
    pub code: KeyCode,
}

/// 修飾キーの組み合わせ
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct KeyModifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
}

/// 基本キーコード
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Char(char),
    Enter,
    Backspace,
    Delete,
    Tab,
    Left,
    Right,
    Home,
    End,
    F(u8),
    Esc,
    Unknown,
}

impl Key {
    pub fn plain(code: KeyCode) -> Self {
        Self {
            modifiers: KeyModifiers::default(),
            code,
        }
    }

    pub fn ctrl(ch: char) -> Self {
        Self {
            modifiers: KeyModifiers {
                ctrl: true,
                ..KeyModifiers::default()
            },
            code: KeyCode::Char(ch),
        }
    }

    pub fn shift(code: KeyCode) -> Self {
        Self {
            modifiers: KeyModifiers {
                shift: true,
                ..KeyModifiers::default()
            },
            code,
        }
    }

    pub fn ctrl_shift(code: KeyCode) -> Self {
        Self {
            modifiers: KeyModifiers {
                ctrl: true,
                shift: true,
                ..KeyModifiers::default()
            },
            code,
        }
    }
}

impl From<KeyEvent> for Key {
    fn from(event: KeyEvent) -> Self {
        let modifiers = KeyModifiers {
            ctrl: event.modifiers.contains(CrosstermModifiers::CONTROL),
            alt: event.modifiers.contains(CrosstermModifiers::ALT),
            shift: event.modifiers.contains(CrosstermModifiers::SHIFT),
        };

        let code = match event.code {
            // Ctrl との組み合わせは小文字に揃える
            CrosstermKeyCode::Char(c) if modifiers.ctrl => KeyCode::Char(c.to_ascii_lowercase()),
            CrosstermKeyCode::Char(c) => KeyCode::Char(c),
            CrosstermKeyCode::Enter => KeyCode::Enter,
            CrosstermKeyCode::Backspace => KeyCode::Backspace,
            CrosstermKeyCode::Delete => KeyCode::Delete,
            CrosstermKeyCode::Tab => KeyCode::Tab,
            CrosstermKeyCode::Left => KeyCode::Left,
            CrosstermKeyCode::Right => KeyCode::Right,
            CrosstermKeyCode::Home => KeyCode::Home,
            CrosstermKeyCode::End => KeyCode::End,
            CrosstermKeyCode::F(n) => KeyCode::F(n),
            CrosstermKeyCode::Esc => KeyCode::Esc,
            _ => KeyCode::Unknown,
        };

        Key { modifiers, code }
    }
}

/// キーマップ
pub struct KeyMap {
    bindings: HashMap<Key, UiEvent>,
}

impl KeyMap {
    /// 既定のキーバインドで作成
    pub fn new() -> Self {
        let mut bindings = HashMap::with_capacity(32);
        Self::register_default_bindings(&mut bindings);
        Self { bindings }
    }

    fn register_default_bindings(map: &mut HashMap<Key, UiEvent>) {
        // 編集メニュー
        map.insert(Key::ctrl('z'), UiEvent::Undo);
        map.insert(Key::ctrl('y'), UiEvent::Redo);

        // ファイルメニュー
        map.insert(Key::ctrl('n'), UiEvent::NewFile);
        map.insert(Key::ctrl('o'), UiEvent::OpenFile);
        map.insert(Key::ctrl('s'), UiEvent::SaveFile);
        map.insert(Key::ctrl('q'), UiEvent::Exit);

        // ツールバー
        map.insert(Key::ctrl('b'), UiEvent::ToggleBold);
        map.insert(Key::ctrl('i'), UiEvent::ToggleItalic);
        // 多くの端末では C-i が Tab として届く
        map.insert(
            Key {
                modifiers: KeyModifiers {
                    alt: true,
                    ..KeyModifiers::default()
                },
                code: KeyCode::Char('i'),
            },
            UiEvent::ToggleItalic,
        );
        map.insert(Key::ctrl('u'), UiEvent::ToggleUnderline);
        map.insert(Key::plain(KeyCode::F(3)), UiEvent::ChooseTextColor);
        for (idx, size) in FONT_SIZES.iter().enumerate() {
            map.insert(
                Key::plain(KeyCode::F(5 + idx as u8)),
                UiEvent::SelectFontSize(size.to_string()),
            );
        }

        // 選択・編集
        map.insert(Key::ctrl('a'), UiEvent::SelectAll);
        map.insert(Key::plain(KeyCode::Enter), UiEvent::InsertNewline);
        map.insert(Key::plain(KeyCode::Tab), UiEvent::InsertChar('\t'));
        map.insert(Key::plain(KeyCode::Backspace), UiEvent::DeleteBackward);
        map.insert(Key::plain(KeyCode::Delete), UiEvent::DeleteForward);

        // キャレット移動（Shift で選択を拡張）
        let motions = [
            (KeyCode::Left, Motion::Left),
            (KeyCode::Right, Motion::Right),
            (KeyCode::Home, Motion::LineStart),
            (KeyCode::End, Motion::LineEnd),
        ];
        for (code, motion) in motions {
            map.insert(
                Key::plain(code.clone()),
                UiEvent::MoveCaret {
                    motion,
                    extend: false,
                },
            );
            map.insert(
                Key::shift(code),
                UiEvent::MoveCaret {
                    motion,
                    extend: true,
                },
            );
        }
        map.insert(
            Key::ctrl_shift(KeyCode::Home),
            UiEvent::MoveCaret {
                motion: Motion::DocumentStart,
                extend: true,
            },
        );
        map.insert(
            Key::ctrl_shift(KeyCode::End),
            UiEvent::MoveCaret {
                motion: Motion::DocumentEnd,
                extend: true,
            },
        );
        let mut ctrl = |code: KeyCode, motion: Motion| {
            map.insert(
                Key {
                    modifiers: KeyModifiers {
                        ctrl: true,
                        ..KeyModifiers::default()
                    },
                    code,
                },
                UiEvent::MoveCaret {
                    motion,
                    extend: false,
                },
            );
        };
        ctrl(KeyCode::Home, Motion::DocumentStart);
        ctrl(KeyCode::End, Motion::DocumentEnd);
    }

    /// キーを UI イベントに変換する
    pub fn lookup(&self, key: &Key) -> Option<UiEvent> {
        if let Some(event) = self.bindings.get(key) {
            return Some(event.clone());
        }

        // 修飾なし（Shift のみ可）の文字は入力
        match key.code {
            KeyCode::Char(ch) if !key.modifiers.ctrl && !key.modifiers.alt => {
                Some(UiEvent::InsertChar(ch))
            }
            _ => None,
        }
    }

    /// crossterm のキーイベントを変換する
    pub fn lookup_event(&self, event: KeyEvent) -> Option<UiEvent> {
        self.lookup(&Key::from(event))
    }
}

impl Default for KeyMap {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn undo_and_redo_chords() {
        let keymap = KeyMap::new();
        let ctrl_z = KeyEvent::new(CrosstermKeyCode::Char('z'), CrosstermModifiers::CONTROL);
        let ctrl_y = KeyEvent::new(CrosstermKeyCode::Char('y'), CrosstermModifiers::CONTROL);
        assert_eq!(keymap.lookup_event(ctrl_z), Some(UiEvent::Undo));
        assert_eq!(keymap.lookup_event(ctrl_y), Some(UiEvent::Redo));
    }

    #[test]
    fn printable_keys_insert_text() {
        let keymap = KeyMap::new();
        let upper = KeyEvent::new(CrosstermKeyCode::Char('A'), CrosstermModifiers::SHIFT);
        assert_eq!(keymap.lookup_event(upper), Some(UiEvent::InsertChar('A')));

        let alt_x = KeyEvent::new(CrosstermKeyCode::Char('x'), CrosstermModifiers::ALT);
        assert_eq!(keymap.lookup_event(alt_x), None);
    }

    #[test]
    fn shift_arrows_extend_selection() {
        let keymap = KeyMap::new();
        let event = KeyEvent::new(CrosstermKeyCode::Left, CrosstermModifiers::SHIFT);
        assert_eq!(
            keymap.lookup_event(event),
            Some(UiEvent::MoveCaret {
                motion: Motion::Left,
                extend: true
            })
        );
    }

    #[test]
    fn function_keys_select_font_sizes() {
        let keymap = KeyMap::new();
        assert_eq!(
            keymap.lookup(&Key::plain(KeyCode::F(7))),
            Some(UiEvent::SelectFontSize("16".to_string()))
        );
        assert_eq!(
            keymap.lookup(&Key::plain(KeyCode::F(3))),
            Some(UiEvent::ChooseTextColor)
        );
    }
}
