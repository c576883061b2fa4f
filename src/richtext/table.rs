//! In-place table editing over the block document.
//!
//! Commands address the cell the cursor was last in. Missing context is
//! never an error: inserts with no enclosing table create a fresh
//! single-cell table instead, deletes do nothing, and deleting the last
//! row or column removes the whole table.

use super::{Block, CellAlign, Table};

/// Address of a focused table cell within a block document.
/// `row == None` points at the header row.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct CellRef {
    pub block: usize,
    pub row: Option<usize>,
    pub col: usize,
}

/// Validate that `at` still points inside a table column; cell refs can go
/// stale after edits from other commands.
fn resolve(doc: &[Block], at: Option<CellRef>) -> Option<CellRef> {
    let at = at?;
    match doc.get(at.block) {
        Some(Block::Table(t)) if at.col < t.column_count() => Some(at),
        _ => None,
    }
}

fn table_mut(doc: &mut [Block], block: usize) -> Option<&mut Table> {
    match doc.get_mut(block) {
        Some(Block::Table(t)) => Some(t),
        _ => None,
    }
}

/// Returns true when the document changed.
pub(crate) fn insert_row_below(doc: &mut Vec<Block>, at: Option<CellRef>) -> bool {
    let Some(at) = resolve(doc, at) else {
        doc.push(Block::Table(Table::single_cell()));
        return true;
    };
    let Some(t) = table_mut(doc, at.block) else {
        return false;
    };
    let empty = vec![String::new(); t.column_count()];
    // From the header the new row becomes the first body row.
    let idx = match at.row {
        Some(r) => (r + 1).min(t.rows.len()),
        None => 0,
    };
    t.rows.insert(idx, empty);
    true
}

/// Returns true when the document changed.
pub(crate) fn insert_column_right(doc: &mut Vec<Block>, at: Option<CellRef>) -> bool {
    let Some(at) = resolve(doc, at) else {
        doc.push(Block::Table(Table::single_cell()));
        return true;
    };
    let Some(t) = table_mut(doc, at.block) else {
        return false;
    };
    let idx = at.col + 1;
    t.alignments.insert(idx, CellAlign::Left);
    t.header
        .insert(idx, format!("Column {}", t.column_count() + 1));
    for row in t.rows.iter_mut() {
        row.insert(idx, String::new());
    }
    true
}

/// Deleting from the header, or deleting the only body row, removes the
/// whole table. Returns true when the document changed.
pub(crate) fn delete_row(doc: &mut Vec<Block>, at: Option<CellRef>) -> bool {
    let Some(at) = resolve(doc, at) else {
        return false;
    };
    let remove_table = {
        let Some(t) = table_mut(doc, at.block) else {
            return false;
        };
        match at.row {
            None => true,
            Some(r) if r >= t.rows.len() => return false,
            Some(r) => {
                if t.rows.len() > 1 {
                    t.rows.remove(r);
                    return true;
                }
                true
            }
        }
    };
    if remove_table {
        doc.remove(at.block);
    }
    true
}

/// Deleting the last remaining column removes the whole table.
/// Returns true when the document changed.
pub(crate) fn delete_column(doc: &mut Vec<Block>, at: Option<CellRef>) -> bool {
    let Some(at) = resolve(doc, at) else {
        return false;
    };
    let remove_table = {
        let Some(t) = table_mut(doc, at.block) else {
            return false;
        };
        if t.column_count() > 1 {
            t.alignments.remove(at.col);
            t.header.remove(at.col);
            for row in t.rows.iter_mut() {
                if at.col < row.len() {
                    row.remove(at.col);
                }
            }
            return true;
        }
        true
    };
    if remove_table {
        doc.remove(at.block);
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc_with_table(cols: usize, rows: usize) -> Vec<Block> {
        let header = (0..cols).map(|c| format!("H{c}")).collect();
        let body = (0..rows)
            .map(|r| (0..cols).map(|c| format!("r{r}c{c}")).collect())
            .collect();
        vec![Block::Table(Table {
            alignments: vec![CellAlign::Left; cols],
            header,
            rows: body,
        })]
    }

    fn cell(block: usize, row: Option<usize>, col: usize) -> Option<CellRef> {
        Some(CellRef { block, row, col })
    }

    fn table(doc: &[Block], idx: usize) -> &Table {
        match &doc[idx] {
            Block::Table(t) => t,
            other => panic!("expected table, got {other:?}"),
        }
    }

    #[test]
    fn test_insert_column_right_on_single_cell_table() {
        let mut doc = doc_with_table(1, 1);
        assert!(insert_column_right(&mut doc, cell(0, Some(0), 0)));

        let t = table(&doc, 0);
        assert_eq!(t.column_count(), 2);
        // New header cell carries a label, new body cell is empty.
        assert!(!t.header[1].trim().is_empty());
        assert_eq!(t.rows[0], vec!["r0c0".to_string(), String::new()]);
        assert_eq!(t.alignments.len(), 2);
    }

    #[test]
    fn test_delete_column_on_single_column_removes_table() {
        let mut doc = doc_with_table(1, 2);
        assert!(delete_column(&mut doc, cell(0, Some(0), 0)));
        assert!(doc.is_empty());
    }

    #[test]
    fn test_delete_middle_column() {
        let mut doc = doc_with_table(3, 1);
        assert!(delete_column(&mut doc, cell(0, Some(0), 1)));
        let t = table(&doc, 0);
        assert_eq!(t.header, vec!["H0", "H2"]);
        assert_eq!(t.rows[0], vec!["r0c0".to_string(), "r0c2".to_string()]);
    }

    #[test]
    fn test_insert_row_below_body_row() {
        let mut doc = doc_with_table(2, 2);
        assert!(insert_row_below(&mut doc, cell(0, Some(0), 1)));
        let t = table(&doc, 0);
        assert_eq!(t.rows.len(), 3);
        assert_eq!(t.rows[1], vec![String::new(), String::new()]);
        assert_eq!(t.rows[2][0], "r1c0");
    }

    #[test]
    fn test_insert_row_below_header_goes_first() {
        let mut doc = doc_with_table(2, 1);
        assert!(insert_row_below(&mut doc, cell(0, None, 0)));
        let t = table(&doc, 0);
        assert_eq!(t.rows[0], vec![String::new(), String::new()]);
        assert_eq!(t.rows[1][0], "r0c0");
    }

    #[test]
    fn test_delete_last_body_row_removes_table() {
        let mut doc = doc_with_table(2, 1);
        assert!(delete_row(&mut doc, cell(0, Some(0), 0)));
        assert!(doc.is_empty());
    }

    #[test]
    fn test_delete_row_keeps_table_when_rows_remain() {
        let mut doc = doc_with_table(2, 3);
        assert!(delete_row(&mut doc, cell(0, Some(1), 0)));
        let t = table(&doc, 0);
        assert_eq!(t.rows.len(), 2);
        assert_eq!(t.rows[1][0], "r2c0");
    }

    #[test]
    fn test_delete_header_row_removes_table() {
        let mut doc = doc_with_table(2, 2);
        assert!(delete_row(&mut doc, cell(0, None, 0)));
        assert!(doc.is_empty());
    }

    #[test]
    fn test_insert_without_context_creates_single_cell_table() {
        let mut doc = vec![];
        assert!(insert_row_below(&mut doc, None));
        let t = table(&doc, 0);
        assert_eq!(t.column_count(), 1);
        assert_eq!(t.rows, vec![vec![String::new()]]);

        let mut doc2 = vec![Block::Paragraph {
            text: "p".to_string(),
        }];
        assert!(insert_column_right(&mut doc2, cell(0, Some(0), 0)));
        assert_eq!(doc2.len(), 2);
        assert!(matches!(doc2[1], Block::Table(_)));
    }

    #[test]
    fn test_delete_without_context_is_noop() {
        let mut doc = vec![Block::Paragraph {
            text: "p".to_string(),
        }];
        assert!(!delete_row(&mut doc, None));
        assert!(!delete_column(&mut doc, cell(0, Some(0), 0)));
        assert_eq!(doc.len(), 1);
    }

    #[test]
    fn test_stale_cell_ref_out_of_range_is_noop_for_delete() {
        let mut doc = doc_with_table(2, 1);
        assert!(!delete_column(&mut doc, cell(0, Some(0), 5)));
        assert!(!delete_row(&mut doc, cell(5, Some(0), 0)));
    }
}
