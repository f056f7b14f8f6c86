use docx_rs::{
    DocumentChild, Paragraph, ParagraphChild, RunChild, Table, TableCellContent, TableChild,
    TableRowChild,
};
use tracing::warn;

/// Reads every body paragraph (and table row) of a Word document, one per line.
///
/// Parse failures degrade to an empty string: a legacy `.doc` or a damaged
/// archive is logged and treated as a document without paragraphs.
pub fn extract_word_text(bytes: &[u8]) -> String {
    word_text_from_bytes(bytes).unwrap_or_else(|e| {
        warn!(error = %e, "could not parse Word document");
        String::new()
    })
}

pub(crate) fn word_text_from_bytes(bytes: &[u8]) -> Result<String, docx_rs::ReaderError> {
    let docx = docx_rs::read_docx(bytes)?;

    let mut lines = Vec::new();
    for child in &docx.document.children {
        match child {
            DocumentChild::Paragraph(p) => lines.push(paragraph_text(p)),
            DocumentChild::Table(t) => collect_table_rows(t, &mut lines),
            _ => {}
        }
    }
    Ok(lines.join("\n").trim().to_string())
}

fn paragraph_text(paragraph: &Paragraph) -> String {
    let mut out = String::new();
    push_paragraph_children(&paragraph.children, &mut out);
    out
}

fn push_paragraph_children(children: &[ParagraphChild], out: &mut String) {
    for child in children {
        match child {
            ParagraphChild::Run(run) => {
                for rc in &run.children {
                    match rc {
                        RunChild::Text(t) => out.push_str(&t.text),
                        RunChild::Tab(_) => out.push('\t'),
                        RunChild::Break(_) => out.push('\n'),
                        _ => {}
                    }
                }
            }
            ParagraphChild::Hyperlink(link) => push_paragraph_children(&link.children, out),
            _ => {}
        }
    }
}

/// Lab results are commonly laid out as tables; each row becomes one
/// tab-separated line.
fn collect_table_rows(table: &Table, lines: &mut Vec<String>) {
    for child in &table.rows {
        #[allow(irrefutable_let_patterns)]
        let TableChild::TableRow(row) = child else {
            continue;
        };
        let cells: Vec<String> = row.cells.iter().map(cell_text).collect();
        if cells.iter().any(|c| !c.trim().is_empty()) {
            lines.push(cells.join("\t"));
        }
    }
}

fn cell_text(child: &TableRowChild) -> String {
    #[allow(irrefutable_let_patterns)]
    let TableRowChild::TableCell(cell) = child else {
        return String::new();
    };
    cell.children
        .iter()
        .filter_map(|content| match content {
            TableCellContent::Paragraph(p) => Some(paragraph_text(p)),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::fixtures::{docx_bytes, write_docx};
    use docx_rs::{Docx, Run, TableCell, TableRow};
    use tempfile::TempDir;

    #[test]
    fn joins_paragraphs_with_newlines() {
        let bytes = docx_bytes(&["Discharge summary", "BP 128/82 mmHg", "Follow up in 3 months"]);
        let text = word_text_from_bytes(&bytes).unwrap();
        assert_eq!(text, "Discharge summary\nBP 128/82 mmHg\nFollow up in 3 months");
    }

    #[test]
    fn trims_surrounding_blank_paragraphs() {
        let bytes = docx_bytes(&["", "  HbA1c 6.8%  ", ""]);
        assert_eq!(word_text_from_bytes(&bytes).unwrap(), "HbA1c 6.8%");
    }

    #[test]
    fn preserves_chinese_text() {
        let bytes = docx_bytes(&["空腹血糖 6.1 mmol/L"]);
        assert_eq!(word_text_from_bytes(&bytes).unwrap(), "空腹血糖 6.1 mmol/L");
    }

    #[test]
    fn reads_table_rows() {
        let cell = |s: &str| {
            TableCell::new().add_paragraph(Paragraph::new().add_run(Run::new().add_text(s)))
        };
        let table = docx_rs::Table::new(vec![
            TableRow::new(vec![cell("LDL-C"), cell("3.9 mmol/L")]),
            TableRow::new(vec![cell("HDL-C"), cell("1.1 mmol/L")]),
        ]);

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("table.docx");
        let file = std::fs::File::create(&path).unwrap();
        Docx::new()
            .add_paragraph(Paragraph::new().add_run(Run::new().add_text("Lipid panel")))
            .add_table(table)
            .build()
            .pack(file)
            .unwrap();

        let text = extract_word_text(&std::fs::read(&path).unwrap());
        assert!(text.starts_with("Lipid panel"), "got: {text}");
        assert!(text.contains("LDL-C\t3.9 mmol/L"), "got: {text}");
        assert!(text.contains("HDL-C\t1.1 mmol/L"), "got: {text}");
    }

    #[test]
    fn legacy_doc_degrades_to_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("old.doc");
        std::fs::write(&path, b"\xD0\xCF\x11\xE0 binary word 97").unwrap();
        assert_eq!(extract_word_text(&std::fs::read(&path).unwrap()), "");
    }

    #[test]
    fn written_file_matches_bytes() {
        let dir = TempDir::new().unwrap();
        let path = write_docx(dir.path(), "n.docx", &["Creatinine 88 umol/L"]);
        assert_eq!(
            extract_word_text(&std::fs::read(&path).unwrap()),
            "Creatinine 88 umol/L"
        );
    }
}
