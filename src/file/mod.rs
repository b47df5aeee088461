//! ファイル操作モジュール

pub mod io;

pub use io::{expand_path, read_plain_text, write_plain_text, FileOperations, PlainTextFiles};
