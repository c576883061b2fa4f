//! Structured note content and the paste-time markup import.
//!
//! Note content is stored as a JSON block document inside the note's
//! `content` string; the backend treats it as opaque. Pasted text that
//! looks like lightweight markup is converted to blocks by a single
//! forward scan that buffers runs of row-like lines so pipe tables can be
//! recognized with one piece of lookahead.

pub(crate) mod table;

use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub(crate) enum CellAlign {
    #[default]
    Left,
    Center,
    Right,
}

impl CellAlign {
    pub fn css(&self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Center => "center",
            Self::Right => "right",
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub(crate) struct Table {
    pub alignments: Vec<CellAlign>,
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn column_count(&self) -> usize {
        self.header.len()
    }

    /// Fresh 1x1 table, used when an insert command runs with no table
    /// under the cursor.
    pub fn single_cell() -> Self {
        Self {
            alignments: vec![CellAlign::Left],
            header: vec!["Column 1".to_string()],
            rows: vec![vec![String::new()]],
        }
    }
}

/// One rendered block of note content. Inline text is stored escaped;
/// the importer only ever emits `<strong>` markup into it.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub(crate) enum Block {
    Heading { level: u8, text: String },
    Paragraph { text: String },
    List { items: Vec<String> },
    Table(Table),
}

impl Block {
    fn paragraph(text: impl Into<String>) -> Self {
        Self::Paragraph { text: text.into() }
    }

    fn has_visible_text(&self) -> bool {
        match self {
            Self::Heading { text, .. } | Self::Paragraph { text } => !text.trim().is_empty(),
            Self::List { items } => items.iter().any(|i| !i.trim().is_empty()),
            Self::Table(t) => {
                t.header.iter().any(|c| !c.trim().is_empty())
                    || t.rows.iter().flatten().any(|c| !c.trim().is_empty())
            }
        }
    }
}

// ====== content string <-> block document ======

pub(crate) fn doc_from_content(content: &str) -> Vec<Block> {
    if content.trim().is_empty() {
        return vec![];
    }
    if let Ok(doc) = serde_json::from_str::<Vec<Block>>(content) {
        return doc;
    }
    // Legacy/plain content: one escaped paragraph per line.
    content
        .lines()
        .map(|l| Block::paragraph(escape_html(l)))
        .collect()
}

pub(crate) fn content_from_doc(doc: &[Block]) -> String {
    if doc.is_empty() {
        return String::new();
    }
    serde_json::to_string(doc).unwrap_or_default()
}

pub(crate) fn doc_is_empty(doc: &[Block]) -> bool {
    !doc.iter().any(Block::has_visible_text)
}

// ====== inline handling ======

/// Escape user text before any inline substitution so pasted markup can
/// never inject live HTML.
pub(crate) fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Replace paired `**` markers with `<strong>` tags; an unpaired trailing
/// marker stays literal.
fn bold_substitute(escaped: &str) -> String {
    let parts: Vec<&str> = escaped.split("**").collect();
    if parts.len() < 2 {
        return escaped.to_string();
    }

    let mut out = String::with_capacity(escaped.len());
    out.push_str(parts[0]);
    for (i, part) in parts.iter().enumerate().skip(1) {
        if i % 2 == 1 {
            if i == parts.len() - 1 {
                out.push_str("**");
                out.push_str(part);
            } else {
                out.push_str("<strong>");
                out.push_str(part);
                out.push_str("</strong>");
            }
        } else {
            out.push_str(part);
        }
    }
    out
}

fn inline(text: &str) -> String {
    bold_substitute(&escape_html(text))
}

// ====== line classification ======

fn heading_level(line: &str) -> Option<(u8, &str)> {
    let hashes = line.chars().take_while(|c| *c == '#').count();
    if (1..=6).contains(&hashes) {
        if let Some(rest) = line[hashes..].strip_prefix(' ') {
            return Some((hashes as u8, rest));
        }
    }
    None
}

fn list_item(line: &str) -> Option<&str> {
    line.strip_prefix("- ").or_else(|| line.strip_prefix("* "))
}

fn split_row(line: &str) -> Vec<String> {
    let mut t = line.trim();
    t = t.strip_prefix('|').unwrap_or(t);
    t = t.strip_suffix('|').unwrap_or(t);
    t.split('|').map(|c| c.trim().to_string()).collect()
}

fn delimiter_cell_align(cell: &str) -> Option<CellAlign> {
    let lead = cell.starts_with(':');
    let trail = cell.ends_with(':') && cell.len() > 1;
    let dashes = &cell[usize::from(lead)..cell.len() - usize::from(trail)];
    if dashes.is_empty() || !dashes.chars().all(|c| c == '-') {
        return None;
    }
    Some(match (lead, trail) {
        (true, true) => CellAlign::Center,
        (false, true) => CellAlign::Right,
        _ => CellAlign::Left,
    })
}

fn delimiter_row_alignments(line: &str) -> Option<Vec<CellAlign>> {
    let cells = split_row(line);
    if cells.is_empty() {
        return None;
    }
    cells
        .iter()
        .map(|c| delimiter_cell_align(c))
        .collect::<Option<Vec<_>>>()
}

fn is_delimiter_row(line: &str) -> bool {
    line.contains('|') && delimiter_row_alignments(line).is_some()
}

/// Heuristic paste gate: convert only when the text carries markup the
/// importer understands.
pub(crate) fn looks_like_markup(text: &str) -> bool {
    text.lines().any(|line| {
        let t = line.trim_start();
        heading_level(t).is_some()
            || list_item(t).is_some()
            || t.contains("**")
            || is_delimiter_row(t)
    })
}

// ====== the forward scan ======

/// Convert line-oriented markup into a block document.
pub(crate) fn import_markup(input: &str) -> Vec<Block> {
    let mut out: Vec<Block> = vec![];
    let mut row_buffer: Vec<String> = vec![];
    let mut list_items: Vec<String> = vec![];

    for line in input.lines() {
        if line.contains('|') {
            flush_list(&mut out, &mut list_items);
            row_buffer.push(line.to_string());
            continue;
        }

        flush_rows(&mut out, &mut row_buffer);

        let trimmed = line.trim_start();
        if let Some(item) = list_item(trimmed) {
            list_items.push(inline(item));
            continue;
        }
        flush_list(&mut out, &mut list_items);

        if let Some((level, rest)) = heading_level(trimmed) {
            out.push(Block::Heading {
                level,
                text: inline(rest),
            });
        } else {
            // Blank lines become empty paragraphs, preserving spacing.
            out.push(Block::paragraph(inline(line)));
        }
    }

    flush_rows(&mut out, &mut row_buffer);
    flush_list(&mut out, &mut list_items);
    out
}

fn flush_list(out: &mut Vec<Block>, items: &mut Vec<String>) {
    if !items.is_empty() {
        out.push(Block::List {
            items: std::mem::take(items),
        });
    }
}

/// A buffered run is a table only when its second line is a pure delimiter
/// row; anything else falls back to one paragraph per line.
fn flush_rows(out: &mut Vec<Block>, buffer: &mut Vec<String>) {
    if buffer.is_empty() {
        return;
    }
    let lines = std::mem::take(buffer);

    let alignments = if lines.len() >= 2 {
        delimiter_row_alignments(&lines[1])
    } else {
        None
    };

    let Some(mut alignments) = alignments else {
        for line in lines {
            out.push(Block::paragraph(inline(&line)));
        }
        return;
    };

    let header: Vec<String> = split_row(&lines[0]).iter().map(|c| inline(c)).collect();
    let cols = header.len();
    alignments.resize(cols, CellAlign::Left);
    alignments.truncate(cols);

    let rows: Vec<Vec<String>> = lines[2..]
        .iter()
        .map(|line| {
            let mut cells: Vec<String> = split_row(line).iter().map(|c| inline(c)).collect();
            // Keep the table rectangular.
            cells.resize(cols, String::new());
            cells.truncate(cols);
            cells
        })
        .collect();

    out.push(Block::Table(Table {
        alignments,
        header,
        rows,
    }));
}

/// Pull list items back out of a contenteditable `<ul>`'s inner HTML.
pub(crate) fn list_items_from_html(html: &str) -> Vec<String> {
    let mut items = vec![];
    let mut rest = html;
    while let Some(start) = rest.find("<li") {
        let Some(gt) = rest[start..].find('>') else {
            break;
        };
        let body_start = start + gt + 1;
        match rest[body_start..].find("</li>") {
            Some(end) => {
                items.push(rest[body_start..body_start + end].trim().to_string());
                rest = &rest[body_start + end + "</li>".len()..];
            }
            None => {
                items.push(rest[body_start..].trim().to_string());
                break;
            }
        }
    }
    items
}

#[cfg(test)]
mod tests {
    use super::*;

    // ====== detection ======

    #[test]
    fn test_plain_text_is_not_markup() {
        assert!(!looks_like_markup("plain text"));
        assert!(!looks_like_markup("a | b without delimiter row"));
    }

    #[test]
    fn test_markup_detection() {
        assert!(looks_like_markup("# title"));
        assert!(looks_like_markup("- item"));
        assert!(looks_like_markup("some **bold** text"));
        assert!(looks_like_markup("| A |\n|---|"));
    }

    // ====== tables ======

    #[test]
    fn test_table_with_alignments() {
        let doc = import_markup("| A | B |\n|---|---:|\n| 1 | 2 |");
        assert_eq!(doc.len(), 1);
        let Block::Table(t) = &doc[0] else {
            panic!("expected table, got {:?}", doc[0]);
        };
        assert_eq!(t.header, vec!["A", "B"]);
        assert_eq!(t.alignments, vec![CellAlign::Left, CellAlign::Right]);
        assert_eq!(t.rows, vec![vec!["1".to_string(), "2".to_string()]]);
    }

    #[test]
    fn test_table_center_alignment() {
        let doc = import_markup("| A |\n|:---:|\n| x |");
        let Block::Table(t) = &doc[0] else {
            panic!("expected table");
        };
        assert_eq!(t.alignments, vec![CellAlign::Center]);
    }

    #[test]
    fn test_table_pads_short_rows() {
        let doc = import_markup("| A | B | C |\n|---|---|---|\n| 1 |");
        let Block::Table(t) = &doc[0] else {
            panic!("expected table");
        };
        assert_eq!(t.rows, vec![vec!["1".to_string(), String::new(), String::new()]]);
    }

    #[test]
    fn test_table_truncates_long_rows() {
        let doc = import_markup("| A |\n|---|\n| 1 | extra |");
        let Block::Table(t) = &doc[0] else {
            panic!("expected table");
        };
        assert_eq!(t.rows, vec![vec!["1".to_string()]]);
    }

    #[test]
    fn test_row_run_without_delimiter_is_paragraphs() {
        let doc = import_markup("| A | B |\n| 1 | 2 |");
        assert_eq!(doc.len(), 2);
        assert!(matches!(&doc[0], Block::Paragraph { .. }));
        assert!(matches!(&doc[1], Block::Paragraph { .. }));
    }

    #[test]
    fn test_single_row_line_is_paragraph() {
        let doc = import_markup("| lonely |");
        assert_eq!(doc, vec![Block::paragraph("| lonely |")]);
    }

    #[test]
    fn test_table_followed_by_text() {
        let doc = import_markup("| A |\n|---|\n| 1 |\nafter");
        assert_eq!(doc.len(), 2);
        assert!(matches!(&doc[0], Block::Table(_)));
        assert_eq!(doc[1], Block::paragraph("after"));
    }

    // ====== headings / lists / paragraphs ======

    #[test]
    fn test_plain_text_import_is_single_paragraph() {
        let doc = import_markup("plain text");
        assert_eq!(doc, vec![Block::paragraph("plain text")]);
    }

    #[test]
    fn test_heading_levels() {
        let doc = import_markup("# one\n###### six\n####### seven");
        assert_eq!(
            doc[0],
            Block::Heading {
                level: 1,
                text: "one".to_string()
            }
        );
        assert_eq!(
            doc[1],
            Block::Heading {
                level: 6,
                text: "six".to_string()
            }
        );
        // Seven markers is not a heading.
        assert_eq!(doc[2], Block::paragraph("####### seven"));
    }

    #[test]
    fn test_hash_without_space_is_paragraph() {
        let doc = import_markup("#nospace");
        assert_eq!(doc, vec![Block::paragraph("#nospace")]);
    }

    #[test]
    fn test_consecutive_list_items_group() {
        let doc = import_markup("- a\n- b\n* c\ntail");
        assert_eq!(
            doc[0],
            Block::List {
                items: vec!["a".to_string(), "b".to_string(), "c".to_string()]
            }
        );
        assert_eq!(doc[1], Block::paragraph("tail"));
    }

    #[test]
    fn test_blank_line_preserved_as_spacing() {
        let doc = import_markup("a\n\nb");
        assert_eq!(
            doc,
            vec![
                Block::paragraph("a"),
                Block::paragraph(""),
                Block::paragraph("b"),
            ]
        );
    }

    // ====== inline handling ======

    #[test]
    fn test_escape_before_bold_substitution() {
        let doc = import_markup("<b>x</b> **y**");
        assert_eq!(
            doc,
            vec![Block::paragraph("&lt;b&gt;x&lt;/b&gt; <strong>y</strong>")]
        );
    }

    #[test]
    fn test_unpaired_bold_marker_stays_literal() {
        assert_eq!(bold_substitute("a**b"), "a**b");
        assert_eq!(bold_substitute("a**b**c**d"), "a<strong>b</strong>c**d");
    }

    #[test]
    fn test_bold_in_table_cells() {
        let doc = import_markup("| **A** |\n|---|\n| x |");
        let Block::Table(t) = &doc[0] else {
            panic!("expected table");
        };
        assert_eq!(t.header, vec!["<strong>A</strong>"]);
    }

    // ====== document round-trip ======

    #[test]
    fn test_doc_roundtrip_through_content_string() {
        let doc = import_markup("# h\n- a\n| A |\n|---|\n| 1 |");
        let content = content_from_doc(&doc);
        assert_eq!(doc_from_content(&content), doc);
    }

    #[test]
    fn test_legacy_plain_content_becomes_paragraphs() {
        let doc = doc_from_content("hello <world>\nsecond");
        assert_eq!(
            doc,
            vec![
                Block::paragraph("hello &lt;world&gt;"),
                Block::paragraph("second"),
            ]
        );
    }

    #[test]
    fn test_empty_content_is_empty_doc() {
        assert!(doc_from_content("").is_empty());
        assert_eq!(content_from_doc(&[]), "");
    }

    #[test]
    fn test_doc_is_empty() {
        assert!(doc_is_empty(&[]));
        assert!(doc_is_empty(&[Block::paragraph("  ")]));
        assert!(!doc_is_empty(&[Block::paragraph("x")]));
        assert!(!doc_is_empty(&[Block::Table(Table::single_cell())]));
    }

    // ====== editor html helpers ======

    #[test]
    fn test_list_items_from_html() {
        assert_eq!(
            list_items_from_html("<li>a</li><li>b</li>"),
            vec!["a".to_string(), "b".to_string()]
        );
        assert_eq!(
            list_items_from_html("<li class=\"x\">a</li>"),
            vec!["a".to_string()]
        );
        assert_eq!(list_items_from_html("no items"), Vec::<String>::new());
    }
}
