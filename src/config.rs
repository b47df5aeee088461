//! 設定ファイル
//!
//! `~/.stylepad/config.json`（または `--config` で指定したパス）から JSON で読み込む。
//! ファイルが無ければ既定値を使う。

use crate::document::{Rgb, StyleState};
use crate::editor::{resolve_style, ToolbarState, FONT_SIZES};
use crate::error::{ConfigError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// エディタ設定
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorConfig {
    /// 起動時のフォントサイズ
    pub default_font_size: String,
    /// 起動時の前景色
    pub default_color: Rgb,
    /// 色選択パレット
    pub palette: Vec<Rgb>,
    /// デバッグログの出力先
    pub debug_log: Option<PathBuf>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            default_font_size: FONT_SIZES[0].to_string(),
            default_color: Rgb::BLACK,
            palette: default_palette(),
            debug_log: None,
        }
    }
}

fn default_palette() -> Vec<Rgb> {
    vec![
        Rgb::new(0, 0, 0),
        Rgb::new(204, 0, 0),
        Rgb::new(0, 153, 0),
        Rgb::new(0, 0, 255),
        Rgb::new(204, 102, 0),
        Rgb::new(153, 0, 153),
        Rgb::new(0, 153, 153),
        Rgb::new(128, 128, 128),
    ]
}

impl EditorConfig {
    /// 既定の設定ファイルパス
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".stylepad").join("config.json"))
    }

    /// 設定を読み込む。`path` 未指定時は既定パス、存在しなければ既定値
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => match Self::default_path() {
                Some(path) => path,
                None => return Ok(Self::default()),
            },
        };

        if !path.exists() {
            log::debug!("no config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(&path).map_err(|err| ConfigError::InvalidFile {
            path: path.display().to_string(),
            message: err.to_string(),
        })?;
        Self::from_json(&raw).map_err(|err| match err {
            crate::error::EditorError::Config(ConfigError::InvalidFile { message, .. }) => {
                ConfigError::InvalidFile {
                    path: path.display().to_string(),
                    message,
                }
                .into()
            }
            other => other,
        })
    }

    /// JSON 文字列から読み込んで検証する
    pub fn from_json(raw: &str) -> Result<Self> {
        let config: EditorConfig =
            serde_json::from_str(raw).map_err(|err| ConfigError::InvalidFile {
                path: "<inline>".to_string(),
                message: err.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if !FONT_SIZES.contains(&self.default_font_size.trim()) {
            return Err(ConfigError::InvalidValue {
                key: "defaultFontSize".to_string(),
                value: self.default_font_size.clone(),
            }
            .into());
        }
        if self.palette.is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "palette".to_string(),
                value: "[]".to_string(),
            }
            .into());
        }
        Ok(())
    }

    /// 起動時のツールバー状態
    pub fn initial_toolbar(&self) -> ToolbarState {
        ToolbarState {
            font_size: self.default_font_size.trim().to_string(),
            ..ToolbarState::default()
        }
    }

    /// 起動時の入力書式
    pub fn initial_style(&self) -> Result<StyleState> {
        resolve_style(&self.initial_toolbar(), self.default_color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EditorError;
    use tempfile::tempdir;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let config = EditorConfig::load(Some(&dir.path().join("none.json"))).unwrap();
        assert_eq!(config, EditorConfig::default());
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config =
            EditorConfig::from_json(r##"{"defaultFontSize": "18", "defaultColor": "#336699"}"##)
                .unwrap();
        assert_eq!(config.default_font_size, "18");
        assert_eq!(config.default_color, Rgb::new(0x33, 0x66, 0x99));
        assert_eq!(config.palette, default_palette());

        let style = config.initial_style().unwrap();
        assert_eq!(style.font_size_pt, 18);
        assert_eq!(style.color, Rgb::new(0x33, 0x66, 0x99));
    }

    #[test]
    fn rejects_font_size_outside_toolbar() {
        let result = EditorConfig::from_json(r#"{"defaultFontSize": "13"}"#);
        assert!(matches!(
            result,
            Err(EditorError::Config(ConfigError::InvalidValue { .. }))
        ));
    }

    #[test]
    fn malformed_file_reports_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();

        match EditorConfig::load(Some(&path)) {
            Err(EditorError::Config(ConfigError::InvalidFile { path: reported, .. })) => {
                assert_eq!(reported, path.display().to_string());
            }
            other => panic!("expected InvalidFile, got {:?}", other),
        }
    }
}
