//! ツールバー書式の解決と適用
//!
//! ツールバーの状態（フォントサイズ・太字・斜体・下線）と現在の前景色から
//! 書式を組み立て、選択範囲に適用する。

use crate::document::{DocumentSurface, Rgb, StyleState};
use crate::error::{Result, StyleError};

/// ツールバーで選択できるフォントサイズ
pub const FONT_SIZES: [&str; 5] = ["12", "14", "16", "18", "20"];

/// ツールバーのコントロール状態
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolbarState {
    /// フォントサイズセレクタの選択値
    pub font_size: String,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
}

impl Default for ToolbarState {
    fn default() -> Self {
        Self {
            font_size: FONT_SIZES[0].to_string(),
            bold: false,
            italic: false,
            underline: false,
        }
    }
}

impl ToolbarState {
    pub fn select_font_size(&mut self, size: impl Into<String>) {
        self.font_size = size.into();
    }

    pub fn toggle_bold(&mut self) {
        self.bold = !self.bold;
    }

    pub fn toggle_italic(&mut self) {
        self.italic = !self.italic;
    }

    pub fn toggle_underline(&mut self) {
        self.underline = !self.underline;
    }
}

/// ツールバー状態と色から書式を組み立てる
///
/// フォントサイズが正の整数として解釈できない場合は既定値に逃がさず
/// `InvalidStyleValue` を返す。
pub fn resolve_style(toolbar: &ToolbarState, color: Rgb) -> Result<StyleState> {
    let invalid = || StyleError::InvalidStyleValue {
        field: "font size",
        value: toolbar.font_size.clone(),
    };
    let font_size_pt: u16 = toolbar.font_size.trim().parse().map_err(|_| invalid())?;
    if font_size_pt == 0 {
        return Err(invalid().into());
    }

    Ok(StyleState {
        font_size_pt,
        bold: toolbar.bold,
        italic: toolbar.italic,
        underline: toolbar.underline,
        color,
    })
}

/// 現在の選択範囲にツールバーの書式を適用する
///
/// 色は文書の現在の前景色を使う。選択が空なら以後の入力書式だけが変わる。
pub fn apply_attributes<S: DocumentSurface + ?Sized>(
    surface: &mut S,
    toolbar: &ToolbarState,
) -> Result<()> {
    let style = resolve_style(toolbar, surface.foreground_color())?;
    let selection = surface.selection();
    log::debug!(
        "apply {:?} to {}..{}",
        style,
        selection.start,
        selection.end
    );
    surface.set_character_formatting(selection, style)
}

/// 色選択ダイアログ
pub trait ColorPicker {
    /// 色を選ばせる。キャンセル時は `None`
    fn choose_color(&mut self, initial: Rgb) -> Option<Rgb>;
}

/// 色選択の結果を現在の前景色に反映する。キャンセル時は変更しない
pub fn choose_text_color<S, P>(surface: &mut S, picker: &mut P) -> bool
where
    S: DocumentSurface + ?Sized,
    P: ColorPicker + ?Sized,
{
    match picker.choose_color(surface.foreground_color()) {
        Some(color) => {
            surface.set_foreground_color(color);
            true
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Selection, StyledDocument};
    use crate::error::EditorError;

    struct FixedPicker(Option<Rgb>);

    impl ColorPicker for FixedPicker {
        fn choose_color(&mut self, _initial: Rgb) -> Option<Rgb> {
            self.0
        }
    }

    fn toolbar(size: &str, bold: bool, italic: bool, underline: bool) -> ToolbarState {
        ToolbarState {
            font_size: size.to_string(),
            bold,
            italic,
            underline,
        }
    }

    #[test]
    fn applies_exact_style_to_selection_only() {
        let mut doc = StyledDocument::new();
        doc.type_str("abcdefgh").unwrap();
        doc.set_foreground_color(Rgb::new(0, 0, 255));
        doc.set_selection(Selection::new(2, 6)).unwrap();

        apply_attributes(&mut doc, &toolbar("16", true, false, true)).unwrap();

        let expected = StyleState {
            font_size_pt: 16,
            bold: true,
            italic: false,
            underline: true,
            color: Rgb::new(0, 0, 255),
        };
        for pos in 2..6 {
            assert_eq!(doc.style_at(pos), Some(expected));
        }
        for pos in [0, 1, 6, 7] {
            assert_eq!(doc.style_at(pos), Some(StyleState::default()));
        }
        assert_eq!(doc.text(), "abcdefgh");
        assert_eq!(doc.selection(), Selection::new(2, 6));
    }

    #[test]
    fn invalid_font_size_fails_without_mutation() {
        let mut doc = StyledDocument::new();
        doc.type_str("abc").unwrap();
        doc.select_all();

        for bad in ["", "big", "0", "-4"] {
            let result = apply_attributes(&mut doc, &toolbar(bad, true, false, false));
            assert!(matches!(
                result,
                Err(EditorError::Style(StyleError::InvalidStyleValue { .. }))
            ));
        }
        assert_eq!(doc.style_at(0), Some(StyleState::default()));
        assert_eq!(doc.input_style(), StyleState::default());
    }

    #[test]
    fn all_toolbar_sizes_resolve() {
        for size in FONT_SIZES {
            let style = resolve_style(&toolbar(size, false, false, false), Rgb::BLACK).unwrap();
            assert_eq!(style.font_size_pt.to_string(), size);
        }
    }

    #[test]
    fn cancelled_color_choice_keeps_color() {
        let mut doc = StyledDocument::new();
        doc.set_foreground_color(Rgb::new(10, 20, 30));

        assert!(!choose_text_color(&mut doc, &mut FixedPicker(None)));
        assert_eq!(doc.foreground_color(), Rgb::new(10, 20, 30));

        assert!(choose_text_color(&mut doc, &mut FixedPicker(Some(Rgb::new(255, 0, 0)))));
        assert_eq!(doc.foreground_color(), Rgb::new(255, 0, 0));
    }

    #[test]
    fn current_color_is_reapplied_on_toggle() {
        let mut doc = StyledDocument::new();
        doc.type_str("ab").unwrap();
        doc.set_foreground_color(Rgb::new(0, 128, 0));
        doc.set_selection(Selection::new(0, 1)).unwrap();
        apply_attributes(&mut doc, &toolbar("12", false, false, false)).unwrap();

        assert_eq!(doc.style_at(0).map(|s| s.color), Some(Rgb::new(0, 128, 0)));
        assert_eq!(doc.style_at(1).map(|s| s.color), Some(Rgb::BLACK));
    }
}
