//! シェル
//!
//! UI イベントの振り分け表、アプリケーション状態、ホスト機能のインターフェース

pub mod dispatch;
pub mod host;
pub mod state;

pub use dispatch::{CommandResult, Dispatcher, EventKind, Handler, UiEvent};
pub use host::{Host, HostColorPicker, ScriptedHost};
pub use state::EditorState;
