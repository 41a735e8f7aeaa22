//! Row layout for the composer.
//!
//! Hard breaks at `\n`, soft breaks when a row would overflow the box.
//! Widths are terminal columns so CJK input wraps where it is drawn. One
//! column per row stays free so the cursor can sit after the last character.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Left + right borders.
pub(super) const HORIZONTAL_OVERHEAD: u16 = 2;
/// Top + bottom borders.
pub(super) const VERTICAL_OVERHEAD: u16 = 2;
/// Rows shown before the box scrolls internally.
pub(super) const MAX_VISIBLE_LINES: u16 = 5;

/// One visual row as a byte range of the buffer. Never includes the `\n`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct Row {
    pub start: usize,
    pub end: usize,
}

/// Columns available to text inside a box `area_width` wide.
pub(super) fn wrap_width(area_width: u16) -> usize {
    usize::from(area_width.saturating_sub(HORIZONTAL_OVERHEAD + 1))
}

/// Splits `text` into visual rows. Always returns at least one row.
pub(super) fn rows(text: &str, width: usize) -> Vec<Row> {
    let mut rows = Vec::new();
    let mut offset = 0;
    for line in text.split('\n') {
        let mut start = offset;
        let mut col = 0;
        for (i, ch) in line.char_indices() {
            let w = ch.width().unwrap_or(0);
            if col > 0 && col + w > width {
                rows.push(Row {
                    start,
                    end: offset + i,
                });
                start = offset + i;
                col = 0;
            }
            col += w;
        }
        rows.push(Row {
            start,
            end: offset + line.len(),
        });
        offset += line.len() + 1;
    }
    rows
}

/// Row index and display column of byte offset `pos`.
///
/// At a soft break the cursor belongs to the following row.
pub(super) fn locate(text: &str, rows: &[Row], pos: usize) -> (usize, usize) {
    let row = rows.iter().rposition(|r| r.start <= pos).unwrap_or(0);
    let col = rows
        .get(row)
        .map(|r| text[r.start..pos.min(r.end)].width())
        .unwrap_or(0);
    (row, col)
}

/// Byte offset in `row` closest to display column `col` without passing it.
pub(super) fn offset_at_column(text: &str, row: Row, col: usize) -> usize {
    let mut used = 0;
    for (i, ch) in text[row.start..row.end].char_indices() {
        let w = ch.width().unwrap_or(0);
        if used + w > col {
            return row.start + i;
        }
        used += w;
    }
    row.end
}
