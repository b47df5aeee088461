//! ロギングシステム
//!
//! `log` ファサードの出力先。開発者向けの詳細ログを stderr または
//! 追記専用ファイルへ書き出す。

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// ログレベル
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
}

impl LogLevel {
    fn tag(self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warning => "WARNING",
            LogLevel::Error => "ERROR",
        }
    }

    fn from_log(level: log::Level) -> Self {
        match level {
            log::Level::Error => LogLevel::Error,
            log::Level::Warn => LogLevel::Warning,
            log::Level::Info => LogLevel::Info,
            log::Level::Debug | log::Level::Trace => LogLevel::Debug,
        }
    }

    fn to_filter(self) -> log::LevelFilter {
        match self {
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Warning => log::LevelFilter::Warn,
            LogLevel::Error => log::LevelFilter::Error,
        }
    }
}

/// ロガー
///
/// * stderr 出力はターミナル UI 実行中は無効にする
/// * ファイル出力は `--debug-log` または設定ファイルで指定
#[derive(Debug)]
pub struct Logger {
    level: LogLevel,
    output_stderr: bool,
    output_file: Option<PathBuf>,
    write_lock: Mutex<()>,
}

impl Logger {
    /// デフォルト構築
    pub fn new(level: LogLevel) -> Self {
        Self {
            level,
            output_stderr: true,
            output_file: None,
            write_lock: Mutex::new(()),
        }
    }

    /// 開発者向けロガー
    pub fn for_development() -> Self {
        Self::new(LogLevel::Debug)
    }

    /// ログレベルを取得
    pub fn level(&self) -> LogLevel {
        self.level
    }

    /// ログレベルを変更
    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    /// ファイル出力を設定
    pub fn with_file_output<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.output_file = Some(path.into());
        self
    }

    /// 標準エラー出力を無効化（ターミナルUI・テスト向け）
    pub fn without_stderr(mut self) -> Self {
        self.output_stderr = false;
        self
    }

    /// ファイル出力先
    pub fn file_output(&self) -> Option<&Path> {
        self.output_file.as_deref()
    }

    fn should_log(&self, level: LogLevel) -> bool {
        level >= self.level
    }

    fn write_line(&self, message: &str) {
        let _guard = self.write_lock.lock();

        if self.output_stderr {
            eprintln!("{}", message);
        }

        if let Some(path) = &self.output_file {
            if let Ok(mut file) = OpenOptions::new().create(true).append(true).open(path) {
                let _ = writeln!(file, "{}", message);
            }
        }
    }

    /// 任意のログレベルでメッセージを出力
    pub fn log_message(&self, level: LogLevel, target: &str, message: impl AsRef<str>) {
        if self.should_log(level) {
            self.write_line(&format!("{} [{}]: {}", level.tag(), target, message.as_ref()));
        }
    }

    /// `log` ファサードにグローバルロガーとして登録
    pub fn install(self) -> std::result::Result<(), log::SetLoggerError> {
        let filter = self.level.to_filter();
        log::set_logger(Box::leak(Box::new(self)))?;
        log::set_max_level(filter);
        Ok(())
    }
}

impl log::Log for Logger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        self.should_log(LogLevel::from_log(metadata.level()))
    }

    fn log(&self, record: &log::Record) {
        let level = LogLevel::from_log(record.level());
        self.log_message(level, record.target(), record.args().to_string());
    }

    fn flush(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn logger_respects_log_level() {
        let logger = Logger::for_development().without_stderr();
        assert!(logger.should_log(LogLevel::Debug));
        assert!(logger.should_log(LogLevel::Error));

        let info_logger = Logger::for_development()
            .with_level(LogLevel::Info)
            .without_stderr();
        assert!(!info_logger.should_log(LogLevel::Debug));
        assert!(info_logger.should_log(LogLevel::Warning));
    }

    #[test]
    fn logger_appends_to_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("debug.log");
        let logger = Logger::new(LogLevel::Info)
            .without_stderr()
            .with_file_output(&path);

        logger.log_message(LogLevel::Debug, "test", "hidden");
        logger.log_message(LogLevel::Warning, "test", "first");
        logger.log_message(LogLevel::Error, "test", "second");

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(!written.contains("hidden"));
        assert!(written.contains("WARNING [test]: first"));
        assert!(written.contains("ERROR [test]: second"));
        assert_eq!(written.lines().count(), 2);
    }

    #[test]
    fn installed_logger_receives_log_macros() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("installed.log");
        Logger::new(LogLevel::Debug)
            .without_stderr()
            .with_file_output(&path)
            .install()
            .unwrap();

        log::info!(target: "stylepad::test", "installed");
        // 二度目の登録は拒否される
        assert!(Logger::new(LogLevel::Debug).without_stderr().install().is_err());

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("installed"));
    }
}
