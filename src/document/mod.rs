//! 文書モジュール
//!
//! リッチテキストの内容（スタイル付きラン列）、選択範囲、書式、変更通知を提供

pub mod change;
pub mod runs;
pub mod selection;
pub mod style;
pub mod surface;

// 公開API
pub use change::{ChangeListener, ChangeNotifier, EditOrigin, EditRecord};
pub use runs::{runs_len, runs_text, StyledRun, StyledText};
pub use selection::Selection;
pub use style::{Rgb, StyleState};
pub use surface::{DocumentSurface, Motion, StyledDocument};
