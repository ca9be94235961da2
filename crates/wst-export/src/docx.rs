use std::io::Cursor;

use docx_rs::{AlignmentType, BreakType, Docx, Paragraph, Run, RunFonts, Style, StyleType};

use crate::error::ExportError;
use crate::styles::DocumentStyles;

/// Build a DOCX document from the line-oriented text the scoresheet
/// template renders.
///
/// Recognised lines:
/// - `# Heading` / `## Heading` → DOCX Heading 1 / Heading 2
/// - `- item` → bullet item
/// - `**bold**` anywhere → bold run
/// - `---` → page break
/// - blank → empty paragraph
/// - anything else → body paragraph
pub fn generate_docx(rendered: &str, styles: &DocumentStyles) -> Result<Vec<u8>, ExportError> {
    let mut docx = Docx::new()
        .add_style(heading_style("Heading1", "heading 1", styles.heading1_size))
        .add_style(heading_style("Heading2", "heading 2", styles.heading2_size));

    for line in rendered.lines() {
        let trimmed = line.trim();
        let paragraph = if trimmed.is_empty() {
            Paragraph::new()
        } else if let Some(text) = trimmed.strip_prefix("## ") {
            heading_paragraph(text, "Heading2", styles)
        } else if let Some(text) = trimmed.strip_prefix("# ") {
            heading_paragraph(text, "Heading1", styles)
        } else if let Some(text) = trimmed.strip_prefix("- ") {
            bullet_paragraph(text, styles)
        } else if trimmed == "---" {
            Paragraph::new().add_run(Run::new().add_break(BreakType::Page))
        } else {
            body_paragraph(trimmed, styles)
        };
        docx = docx.add_paragraph(paragraph);
    }

    let mut buf = Cursor::new(Vec::new());
    docx.build()
        .pack(&mut buf)
        .map_err(|e| ExportError::Docx(e.to_string()))?;

    Ok(buf.into_inner())
}

fn heading_style(style_id: &str, name: &str, size_pt: usize) -> Style {
    Style::new(style_id, StyleType::Paragraph)
        .name(name)
        .size(size_pt * 2) // OOXML uses half-points
}

fn heading_paragraph(text: &str, style_id: &str, styles: &DocumentStyles) -> Paragraph {
    Paragraph::new().style(style_id).add_run(
        Run::new()
            .add_text(text)
            .bold()
            .fonts(RunFonts::new().ascii(&styles.heading_font)),
    )
}

fn bullet_paragraph(text: &str, styles: &DocumentStyles) -> Paragraph {
    let bullet = body_run("\u{2022} ", styles);
    parse_inline(text, styles)
        .into_iter()
        .fold(Paragraph::new().align(AlignmentType::Left).add_run(bullet), |p, run| {
            p.add_run(run)
        })
}

fn body_paragraph(text: &str, styles: &DocumentStyles) -> Paragraph {
    parse_inline(text, styles)
        .into_iter()
        .fold(Paragraph::new().align(AlignmentType::Left), |p, run| p.add_run(run))
}

fn body_run(text: &str, styles: &DocumentStyles) -> Run {
    Run::new()
        .add_text(text)
        .size(styles.body_size * 2)
        .fonts(RunFonts::new().ascii(&styles.body_font))
}

/// Split on `**` markers; odd segments are bold. An unmatched marker is
/// kept as literal text.
fn parse_inline(text: &str, styles: &DocumentStyles) -> Vec<Run> {
    let mut runs = Vec::new();
    let mut remaining = text;

    while let Some(start) = remaining.find("**") {
        let after = &remaining[start + 2..];
        let Some(end) = after.find("**") else {
            break;
        };
        if start > 0 {
            runs.push(body_run(&remaining[..start], styles));
        }
        runs.push(body_run(&after[..end], styles).bold());
        remaining = &after[end + 2..];
    }

    if !remaining.is_empty() {
        runs.push(body_run(remaining, styles));
    }
    runs
}
