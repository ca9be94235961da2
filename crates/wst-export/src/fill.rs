//! Placeholder filling for docx templates.
//!
//! A template marks each value with a `{key}` tag in ordinary document
//! text: body paragraphs, table cells at any depth, hyperlinks, tracked
//! insertions, and the section's headers and footers. Word often splits a
//! tag across several runs; when that happens the paragraph's text is
//! merged into its first run before substitution. Only identifier-like
//! tags (`[A-Za-z0-9_]`, surrounding spaces allowed) are recognised; any
//! other braces are left untouched.
//!
//! `read_docx` hands back run text unescaped while the writer emits it
//! verbatim, so all text is worked on in plain form and escaped once, in
//! [`fill_template`], right before the document is packed.

use std::collections::BTreeSet;
use std::io::Cursor;

use docx_rs::{
    Break, BreakType, DocumentChild, Docx, FooterChild, HeaderChild, InsertChild, Paragraph,
    ParagraphChild, Run, RunChild, Table, TableCellContent, TableChild, TableRowChild, Text,
    read_docx,
};

use wst_instruments::payload::ReportPayload;

use crate::error::ExportError;

/// Fill every tag in `template` from `payload` and return the new docx.
///
/// Tags without a payload entry render as empty text. Newlines in values
/// become line breaks.
pub fn fill_template(template: &[u8], payload: &ReportPayload) -> Result<Vec<u8>, ExportError> {
    let mut docx = read_template(template)?;

    for_each_paragraph(&mut docx, &mut |paragraph| fill_paragraph(paragraph, payload));
    for_each_paragraph(&mut docx, &mut |paragraph| {
        for text in texts_mut(paragraph) {
            text.text = escape_xml(&text.text);
            text.preserve_space = true;
        }
    });

    let mut buf = Cursor::new(Vec::new());
    docx.build()
        .pack(&mut buf)
        .map_err(|e| ExportError::Docx(e.to_string()))?;
    Ok(buf.into_inner())
}

/// Tags used anywhere in the template, sorted and deduplicated.
pub fn template_tags(template: &[u8]) -> Result<Vec<String>, ExportError> {
    let mut tags = BTreeSet::new();
    for line in document_text(template)?.lines() {
        for tag in find_tags(line) {
            tags.insert(tag.name.to_string());
        }
    }
    Ok(tags.into_iter().collect())
}

/// How a template's tags line up with the payload it will be filled from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateCheck {
    /// Payload keys the template never uses.
    pub missing: Vec<String>,
    /// Template tags no payload key fills.
    pub unknown: Vec<String>,
}

impl TemplateCheck {
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty() && self.unknown.is_empty()
    }
}

pub fn check_template(template: &[u8], payload_keys: &[String]) -> Result<TemplateCheck, ExportError> {
    let tags = template_tags(template)?;
    Ok(TemplateCheck {
        missing: payload_keys
            .iter()
            .filter(|key| !tags.contains(key))
            .cloned()
            .collect(),
        unknown: tags
            .iter()
            .filter(|tag| !payload_keys.contains(tag))
            .cloned()
            .collect(),
    })
}

/// Plain text of the document, one paragraph per line: headers first, then
/// the body (table cells in reading order), then footers.
pub fn document_text(docx: &[u8]) -> Result<String, ExportError> {
    let mut docx = read_template(docx)?;
    let mut lines = Vec::new();
    for_each_paragraph(&mut docx, &mut |paragraph| lines.push(paragraph_text(paragraph)));
    Ok(lines.join("\n"))
}

/// Replace every recognised tag in `text`. Values are inserted as-is.
pub fn substitute_tags(text: &str, payload: &ReportPayload) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for tag in find_tags(text) {
        out.push_str(&text[last..tag.start]);
        if let Some(value) = payload.get(tag.name) {
            out.push_str(value);
        }
        last = tag.end;
    }
    out.push_str(&text[last..]);
    out
}

fn read_template(bytes: &[u8]) -> Result<Docx, ExportError> {
    read_docx(bytes).map_err(|e| ExportError::TemplateParse(e.to_string()))
}

struct Tag<'a> {
    name: &'a str,
    start: usize,
    end: usize,
}

fn find_tags(text: &str) -> Vec<Tag<'_>> {
    let mut tags = Vec::new();
    let mut offset = 0;
    while let Some(open) = text[offset..].find('{').map(|i| i + offset) {
        let Some(close) = text[open..].find('}').map(|i| i + open) else {
            break;
        };
        let inner = &text[open + 1..close];
        // A second '{' before the close means this one was literal.
        if let Some(nested) = inner.rfind('{') {
            offset = open + 1 + nested;
            continue;
        }
        let name = inner.trim();
        if !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            tags.push(Tag {
                name,
                start: open,
                end: close + 1,
            });
        }
        offset = close + 1;
    }
    tags
}

fn escape_xml(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

/// Visit every paragraph in headers, body and footers, descending into
/// tables nested at any depth.
fn for_each_paragraph(docx: &mut Docx, f: &mut impl FnMut(&mut Paragraph)) {
    let section = &mut docx.document.section_property;

    let headers = [
        &mut section.header,
        &mut section.first_header,
        &mut section.even_header,
    ];
    for (_, header) in headers.into_iter().flatten() {
        for child in header.children.iter_mut() {
            match child {
                HeaderChild::Paragraph(paragraph) => f(paragraph),
                HeaderChild::Table(table) => table_paragraphs(table, &mut *f),
                _ => {}
            }
        }
    }

    for child in docx.document.children.iter_mut() {
        match child {
            DocumentChild::Paragraph(paragraph) => f(paragraph),
            DocumentChild::Table(table) => table_paragraphs(table, &mut *f),
            _ => {}
        }
    }

    let section = &mut docx.document.section_property;
    let footers = [
        &mut section.footer,
        &mut section.first_footer,
        &mut section.even_footer,
    ];
    for (_, footer) in footers.into_iter().flatten() {
        for child in footer.children.iter_mut() {
            match child {
                FooterChild::Paragraph(paragraph) => f(paragraph),
                FooterChild::Table(table) => table_paragraphs(table, &mut *f),
                _ => {}
            }
        }
    }
}

fn table_paragraphs(table: &mut Table, f: &mut impl FnMut(&mut Paragraph)) {
    for TableChild::TableRow(row) in table.rows.iter_mut() {
        for TableRowChild::TableCell(cell) in row.cells.iter_mut() {
            for content in cell.children.iter_mut() {
                match content {
                    TableCellContent::Paragraph(paragraph) => f(paragraph),
                    TableCellContent::Table(nested) => table_paragraphs(nested, &mut *f),
                    _ => {}
                }
            }
        }
    }
}

fn collect_runs<'a>(children: &'a [ParagraphChild], out: &mut Vec<&'a Run>) {
    for child in children {
        match child {
            ParagraphChild::Run(run) => out.push(run),
            ParagraphChild::Hyperlink(link) => collect_runs(&link.children, out),
            ParagraphChild::Insert(insert) => {
                for child in &insert.children {
                    if let InsertChild::Run(run) = child {
                        out.push(run);
                    }
                }
            }
            _ => {}
        }
    }
}

fn collect_runs_mut<'a>(children: &'a mut [ParagraphChild], out: &mut Vec<&'a mut Run>) {
    for child in children {
        match child {
            ParagraphChild::Run(run) => out.push(run),
            ParagraphChild::Hyperlink(link) => collect_runs_mut(&mut link.children, out),
            ParagraphChild::Insert(insert) => {
                for child in insert.children.iter_mut() {
                    if let InsertChild::Run(run) = child {
                        out.push(run);
                    }
                }
            }
            _ => {}
        }
    }
}

fn runs_mut(paragraph: &mut Paragraph) -> Vec<&mut Run> {
    let mut runs = Vec::new();
    collect_runs_mut(&mut paragraph.children, &mut runs);
    runs
}

fn texts_mut(paragraph: &mut Paragraph) -> Vec<&mut Text> {
    runs_mut(paragraph)
        .into_iter()
        .flat_map(|run| {
            run.children.iter_mut().filter_map(|child| match child {
                RunChild::Text(text) => Some(text),
                _ => None,
            })
        })
        .collect()
}

fn paragraph_text(paragraph: &Paragraph) -> String {
    let mut runs = Vec::new();
    collect_runs(&paragraph.children, &mut runs);
    runs.iter()
        .flat_map(|run| run.children.iter())
        .filter_map(|child| match child {
            RunChild::Text(text) => Some(text.text.as_str()),
            _ => None,
        })
        .collect()
}

fn fill_paragraph(paragraph: &mut Paragraph, payload: &ReportPayload) {
    let joined = paragraph_text(paragraph);
    let tags = find_tags(&joined);
    if tags.is_empty() {
        return;
    }
    for tag in tags.iter().filter(|tag| payload.get(tag.name).is_none()) {
        tracing::warn!(tag = tag.name, "template tag has no value, leaving it empty");
    }

    let whole = substitute_tags(&joined, payload);
    let mut texts = texts_mut(paragraph);
    let piecewise: Vec<String> = texts
        .iter()
        .map(|text| substitute_tags(&text.text, payload))
        .collect();

    if piecewise.concat() == whole {
        // Every tag sat inside a single run; keep each run's formatting.
        for (text, filled) in texts.iter_mut().zip(piecewise) {
            text.text = filled;
        }
    } else {
        let mut merged = Some(whole);
        for text in texts.iter_mut() {
            text.text = merged.take().unwrap_or_default();
        }
    }

    for run in runs_mut(paragraph) {
        expand_line_breaks(run);
    }
}

fn expand_line_breaks(run: &mut Run) {
    let has_newline = run
        .children
        .iter()
        .any(|child| matches!(child, RunChild::Text(t) if t.text.contains('\n')));
    if !has_newline {
        return;
    }

    let mut children = Vec::with_capacity(run.children.len() + 2);
    for child in run.children.drain(..) {
        match child {
            RunChild::Text(text) if text.text.contains('\n') => {
                for (i, line) in text.text.split('\n').enumerate() {
                    if i > 0 {
                        children.push(RunChild::Break(Break::new(BreakType::TextWrapping)));
                    }
                    let mut piece = text.clone();
                    piece.text = line.to_string();
                    children.push(RunChild::Text(piece));
                }
            }
            other => children.push(other),
        }
    }
    run.children = children;
}
