//! Self-contained HTML rendering of an assembled report.
//!
//! The document is a flat list of [`Block`]s. Images are read from disk at
//! render time and embedded as base64 data URIs, so the output references no
//! external file once written. Pagination uses CSS page breaks and a US-letter
//! `@page` rule.

use crate::config::ReportTheme;
use crate::error::Result;
use crate::sections::appendix::mime_type;
use adpost_common::DataTable;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::{DateTime, Utc};
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

/// One element of the document body.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Block {
    Title(String),
    Paragraph(String),
    Heading { level: u8, text: String },
    Table(DataTable),
    Image { path: PathBuf, alt: String },
    PageBreak,
}

/// Output of [`render_document`].
#[derive(Debug)]
pub(crate) struct RenderedDocument {
    pub html: String,
    pub images: usize,
}

pub(crate) fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

fn render_table(out: &mut String, table: &DataTable) {
    out.push_str("<table class=\"summary\">\n<thead><tr>");
    for column in table.columns() {
        let _ = write!(out, "<th>{}</th>", html_escape(column));
    }
    out.push_str("</tr></thead>\n<tbody>\n");
    for row in table.display_rows() {
        out.push_str("<tr>");
        for cell in row {
            let _ = write!(out, "<td>{}</td>", html_escape(&cell));
        }
        out.push_str("</tr>\n");
    }
    out.push_str("</tbody>\n</table>\n");
}

fn render_image(out: &mut String, path: &Path, alt: &str) -> Result<()> {
    let bytes = fs::read(path)?;
    let _ = writeln!(
        out,
        r#"<figure><img class="plot" alt="{alt}" src="data:{mime};base64,{data}"></figure>"#,
        alt = html_escape(alt),
        mime = mime_type(path),
        data = STANDARD.encode(bytes),
    );
    Ok(())
}

/// Render the full document. Fails if any referenced image cannot be read.
pub(crate) fn render_document(
    title: &str,
    theme: ReportTheme,
    generated_at: DateTime<Utc>,
    blocks: &[Block],
) -> Result<RenderedDocument> {
    let mut body = String::new();
    let mut images = 0;

    for block in blocks {
        match block {
            Block::Title(text) => {
                let _ = writeln!(body, "<h1 class=\"title\">{}</h1>", html_escape(text));
            }
            Block::Paragraph(text) => {
                let _ = writeln!(body, "<p>{}</p>", html_escape(text));
            }
            Block::Heading { level, text } => {
                let level = (*level).clamp(1, 6);
                let _ = writeln!(body, "<h{level}>{}</h{level}>", html_escape(text));
            }
            Block::Table(table) => render_table(&mut body, table),
            Block::Image { path, alt } => {
                render_image(&mut body, path, alt)?;
                images += 1;
            }
            Block::PageBreak => body.push_str("<div class=\"page-break\"></div>\n"),
        }
    }

    let html = format!(
        r##"<!DOCTYPE html>
<html lang="en" class="{theme_class}">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <meta name="generator" content="adpost-report {version}">
    <meta name="generated-at" content="{generated_at}">
    <meta name="robots" content="noindex, nofollow">
    <style>
        :root {{
            --bg-primary: #ffffff;
            --bg-secondary: #f9fafb;
            --text-primary: #111827;
            --text-secondary: #6b7280;
            --border-color: #d1d5db;
        }}
        .dark {{
            --bg-primary: #111827;
            --bg-secondary: #1f2937;
            --text-primary: #f9fafb;
            --text-secondary: #9ca3af;
            --border-color: #374151;
        }}
        @media (prefers-color-scheme: dark) {{
            :root:not(.light) {{
                --bg-primary: #111827;
                --bg-secondary: #1f2937;
                --text-primary: #f9fafb;
                --text-secondary: #9ca3af;
                --border-color: #374151;
            }}
        }}
        @page {{
            size: letter;
            margin: 0.75in;
        }}
        body {{
            background-color: var(--bg-primary);
            color: var(--text-primary);
            font-family: ui-sans-serif, system-ui, sans-serif;
            line-height: 1.5;
            max-width: 7in;
            margin: 0 auto;
        }}
        table.summary {{
            border-collapse: collapse;
            margin: 0.5rem 0 1.25rem;
        }}
        table.summary th {{
            background-color: var(--bg-secondary);
            color: var(--text-secondary);
        }}
        table.summary th, table.summary td {{
            border: 0.3px solid var(--border-color);
            padding: 0.25rem 0.75rem;
            text-align: center;
        }}
        figure {{
            margin: 0 0 0.75rem;
            break-inside: avoid;
        }}
        img.plot {{
            width: 100%;
            height: auto;
        }}
        .page-break {{
            break-after: page;
            page-break-after: always;
        }}
        @media print {{
            body {{ font-size: 10pt; }}
        }}
    </style>
</head>
<body>
{body}</body>
</html>
"##,
        theme_class = theme.css_class(),
        title = html_escape(title),
        version = env!("CARGO_PKG_VERSION"),
        generated_at = generated_at.to_rfc3339(),
        body = body,
    );

    Ok(RenderedDocument { html, images })
}
