//! プレーンテキストのファイルI/O
//!
//! 書式は保存しない。開くときはファイルのバイト列をそのまま文書テキストとし、
//! 保存するときは文書テキストをそのまま書き出す（確認なしで上書き）。

use crate::error::{EditorError, FileError, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// ファイル操作のトレイト
pub trait FileOperations {
    /// ファイルからテキストを読み込み
    fn read_file(&self, path: &Path) -> Result<String>;

    /// テキストをファイルに書き込み
    fn write_file(&self, path: &Path, content: &str) -> Result<()>;
}

/// ファイル操作の実装
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextFiles;

impl FileOperations for PlainTextFiles {
    fn read_file(&self, path: &Path) -> Result<String> {
        read_plain_text(path)
    }

    fn write_file(&self, path: &Path, content: &str) -> Result<()> {
        write_plain_text(path, content)
    }
}

/// ファイル内容をそのまま読み込む
pub fn read_plain_text(path: &Path) -> Result<String> {
    // ディレクトリではないことを確認
    if path.is_dir() {
        return Err(FileError::InvalidPath {
            path: path.display().to_string(),
        }
        .into());
    }

    let bytes = fs::read(path).map_err(|err| io_error(path, err))?;
    let content = String::from_utf8(bytes)?;
    log::debug!("read {} chars from {}", content.chars().count(), path.display());
    Ok(content)
}

/// 内容をそのまま書き込む
///
/// 既存ファイルはその場で上書きする。シンボリックリンクはリンク先に書き込まれ、
/// パーミッションも保たれる。
pub fn write_plain_text(path: &Path, content: &str) -> Result<()> {
    if path.as_os_str().is_empty() || path.is_dir() {
        return Err(FileError::InvalidPath {
            path: path.display().to_string(),
        }
        .into());
    }

    fs::write(path, content).map_err(|err| io_error(path, err))?;
    log::debug!("wrote {} bytes to {}", content.len(), path.display());
    Ok(())
}

fn io_error(path: &Path, err: std::io::Error) -> EditorError {
    let path = path.display().to_string();
    match err.kind() {
        ErrorKind::NotFound => FileError::NotFound { path }.into(),
        ErrorKind::PermissionDenied => FileError::PermissionDenied { path }.into(),
        _ => FileError::Io {
            message: format!("{}: {}", path, err),
        }
        .into(),
    }
}

/// `~` と環境変数を展開したパス
pub fn expand_path(input: &str) -> Result<PathBuf> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(FileError::InvalidPath {
            path: input.to_string(),
        }
        .into());
    }
    let expanded = shellexpand::full(trimmed).map_err(|err| FileError::InvalidPath {
        path: format!("{}: {}", trimmed, err),
    })?;
    Ok(PathBuf::from(expanded.into_owned()))
}
