/// 半開区間 `[start, end)` の選択範囲（文字単位）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Selection {
    pub start: usize,
    pub end: usize,
}

impl Selection {
    /// 2点から選択範囲を作成（順序は問わない）
    pub fn new(a: usize, b: usize) -> Self {
        Self {
            start: a.min(b),
            end: a.max(b),
        }
    }

    /// キャレットのみ（空の選択）
    pub fn caret(position: usize) -> Self {
        Self {
            start: position,
            end: position,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn contains(&self, position: usize) -> bool {
        self.start <= position && position < self.end
    }
}
