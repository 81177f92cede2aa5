pub mod document;

pub use document::{project, DocumentModel};

use std::fmt::Write;

/// Byte-stream producer for the export endpoint. The format is opaque to the
/// rest of the service; a PDF back end would implement this same trait and
/// be handed to `AppState` in place of the text one.
pub trait DocumentRenderer: Send + Sync {
    fn render(&self, doc: &DocumentModel) -> Vec<u8>;
    fn content_type(&self) -> &'static str;
    fn file_extension(&self) -> &'static str;
}

/// Paginated plain-text rendering: centered title on every page, underlined
/// section headings, right-aligned page footers.
pub struct TextRenderer {
    lines_per_page: usize,
    width: usize,
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self {
            lines_per_page: 48,
            width: 72,
        }
    }
}

impl TextRenderer {
    fn body_lines(&self, doc: &DocumentModel) -> Vec<String> {
        let mut lines = Vec::new();
        for l in &doc.lead {
            lines.push(format!("{}: {}", l.label, l.value));
        }
        for section in &doc.sections {
            lines.push(String::new());
            lines.push(section.heading.clone());
            lines.push("-".repeat(section.heading.len()));
            for l in &section.lines {
                lines.push(format!("{}: {}", l.label, l.value));
            }
        }
        lines
    }
}

impl DocumentRenderer for TextRenderer {
    fn render(&self, doc: &DocumentModel) -> Vec<u8> {
        let body = self.body_lines(doc);
        let pages: Vec<&[String]> = body.chunks(self.lines_per_page).collect();
        let total = pages.len();

        let mut out = String::new();
        for (idx, page) in pages.iter().enumerate() {
            if idx > 0 {
                out.push('\x0c');
            }
            let pad = self.width.saturating_sub(doc.title.len()) / 2;
            let _ = writeln!(out, "{:pad$}{}", "", doc.title, pad = pad);
            out.push('\n');
            for line in page.iter() {
                let _ = writeln!(out, "{line}");
            }
            out.push('\n');
            let footer = format!("Page {} of {}", idx + 1, total);
            let _ = writeln!(out, "{footer:>width$}", width = self.width);
        }
        out.into_bytes()
    }

    fn content_type(&self) -> &'static str {
        "text/plain; charset=utf-8"
    }

    fn file_extension(&self) -> &'static str {
        "txt"
    }
}

#[cfg(test)]
mod tests {
    use super::document::{Line, Section};
    use super::*;

    fn sample_doc(extra_lines: usize) -> DocumentModel {
        let lines = (0..extra_lines)
            .map(|i| Line {
                label: format!("Field {i}"),
                value: format!("value {i}"),
            })
            .collect();
        DocumentModel {
            title: "User Data Requisition Form".to_string(),
            lead: vec![Line {
                label: "Basin".to_string(),
                value: "NorthSea".to_string(),
            }],
            sections: vec![Section {
                heading: "Requested By".to_string(),
                lines,
            }],
        }
    }

    #[test]
    fn single_page_document_has_one_footer() {
        let renderer = TextRenderer::default();
        let text = String::from_utf8(renderer.render(&sample_doc(3))).unwrap();
        assert!(text.contains("User Data Requisition Form"));
        assert!(text.contains("Basin: NorthSea"));
        assert!(text.contains("Requested By"));
        assert!(text.contains("Page 1 of 1"));
        assert!(!text.contains('\x0c'));
    }

    #[test]
    fn long_documents_break_into_pages() {
        let renderer = TextRenderer {
            lines_per_page: 5,
            width: 40,
        };
        let text = String::from_utf8(renderer.render(&sample_doc(12))).unwrap();
        let page_breaks = text.matches('\x0c').count();
        assert!(page_breaks >= 2, "expected multiple pages, got {text}");
        assert!(text.contains(&format!("Page 1 of {}", page_breaks + 1)));
        // Title repeats on every page.
        assert_eq!(
            text.matches("User Data Requisition Form").count(),
            page_breaks + 1
        );
    }

    #[test]
    fn rendering_is_deterministic() {
        let renderer = TextRenderer::default();
        let doc = sample_doc(4);
        assert_eq!(renderer.render(&doc), renderer.render(&doc));
    }
}
