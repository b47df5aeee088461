//! undo/redo のプロパティテスト
//!
//! キー入力（まとめられるものを含む）を混ぜた任意の編集列を同じ数だけ undo すると元の文書（テキストと書式）に戻り、redo で最終状態に戻ることを確認する。

use proptest::test_runner::Config as ProptestConfig;
use proptest::{prelude::*, prop_oneof};
use stylepad::document::{DocumentSurface, EditOrigin, Rgb, Selection, StyleState, StyledDocument, StyledRun};
use stylepad::editor::UndoCoordinator;
use stylepad::error::{EditorError, HistoryError};

#[derive(Debug, Clone)]
enum Operation {
    Type { pos: usize, ch: char },
    Insert { pos: usize, text: String },
    Delete { pos: usize, len: usize },
    Format { pos: usize, len: usize, style: StyleState },
}

fn style_strategy() -> impl Strategy<Value = StyleState> {
    (
        prop::sample::select(vec![12u16, 14, 16, 18, 20]),
        any::<bool>(),
        any::<bool>(),
        any::<bool>(),
        (any::<u8>(), any::<u8>(), any::<u8>()),
    )
        .prop_map(|(font_size_pt, bold, italic, underline, (r, g, b))| StyleState {
            font_size_pt,
            bold,
            italic,
            underline,
            color: Rgb::new(r, g, b),
        })
}

fn operation_strategy() -> impl Strategy<Value = Operation> {
    let insert = (0u16..64u16, "[a-zあ-ん \n]{1,6}")
        .prop_map(|(pos, text)| Operation::Insert { pos: pos as usize, text });
    let delete = (0u16..64u16, 1u16..8u16).prop_map(|(pos, len)| Operation::Delete {
        pos: pos as usize,
        len: len as usize,
    });
    let format = (0u16..64u16, 1u16..16u16, style_strategy()).prop_map(|(pos, len, style)| {
        Operation::Format {
            pos: pos as usize,
            len: len as usize,
            style,
        }
    });

    let typing = (0u16..64u16, prop::sample::select(vec!['a', 'b', 'z', '_', ' ', '.', 'あ']))
        .prop_map(|(pos, ch)| Operation::Type { pos: pos as usize, ch });

    prop_oneof![2 => typing, 1 => insert, 1 => delete, 1 => format]
}

fn apply(doc: &mut StyledDocument, op: &Operation) {
    let len = doc.len_chars();
    match op {
        Operation::Type { pos, ch } => {
            // 連続した位置ならキー入力として 1 つの記録にまとめられる
            doc.set_caret((*pos).min(len)).unwrap();
            doc.type_char(*ch).unwrap();
        }
        Operation::Insert { pos, text } => {
            doc.insert_text((*pos).min(len), text, EditOrigin::Other).unwrap();
        }
        Operation::Delete { pos, len: count } => {
            if len == 0 {
                return;
            }
            let start = pos % len;
            let end = (start + count).min(len);
            doc.delete_range(start, end).unwrap();
        }
        Operation::Format { pos, len: count, style } => {
            if len == 0 {
                return;
            }
            let start = pos % len;
            let end = (start + count).min(len);
            doc.set_character_formatting(Selection::new(start, end), *style).unwrap();
        }
    }
}

fn snapshot(doc: &StyledDocument) -> Vec<StyledRun> {
    doc.runs().to_vec()
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 96, .. ProptestConfig::default() })]

    #[test]
    fn undo_all_restores_initial_and_redo_all_restores_final(
        initial in "[a-z ]{0,24}",
        ops in proptest::collection::vec(operation_strategy(), 0..16)
    ) {
        let mut doc = StyledDocument::new();
        doc.type_str(&initial).unwrap();

        let mut history = UndoCoordinator::new();
        history.attach(&mut doc);
        let before = snapshot(&doc);

        for op in &ops {
            apply(&mut doc, op);
        }
        let after = snapshot(&doc);
        let (undo_depth, _) = history.depth();
        prop_assert!(undo_depth <= ops.len());

        for _ in 0..undo_depth {
            history.undo(&mut doc).unwrap();
        }
        prop_assert_eq!(snapshot(&doc), before);
        prop_assert_eq!(
            history.undo(&mut doc),
            Err(EditorError::History(HistoryError::NothingToUndo))
        );

        for _ in 0..undo_depth {
            history.redo(&mut doc).unwrap();
        }
        prop_assert_eq!(snapshot(&doc), after);
        prop_assert!(!history.can_redo());
    }

    #[test]
    fn adjacent_runs_never_share_a_style(
        ops in proptest::collection::vec(operation_strategy(), 0..24)
    ) {
        let mut doc = StyledDocument::new();
        for op in &ops {
            apply(&mut doc, op);
        }
        for pair in doc.runs().windows(2) {
            prop_assert_ne!(pair[0].style, pair[1].style);
        }
        prop_assert!(doc.runs().iter().all(|run| !run.text.is_empty()));
    }
}
