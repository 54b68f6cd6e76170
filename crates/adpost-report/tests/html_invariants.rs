//! HTML report invariant tests.
//!
//! These tests validate the written document without a browser:
//! - Title and narrative come first, sections follow in call order
//! - One embedded image per item, one page break per section
//! - No external http/https references
//! - Markup in user text is escaped

use adpost_common::{Cell, DataTable, Metric};
use adpost_math::PosteriorParams;
use adpost_report::{
    DiagnosticEntry, ReportBuilder, ReportConfig, ReportSection, ReportTheme, APPENDIX_TITLE,
};
use regex::Regex;
use std::fs;
use tempfile::TempDir;

fn ctr_table() -> DataTable {
    DataTable::new(["ad_name", "CTR Mean"])
        .with_row(vec![Cell::from("Ad A"), Cell::from(0.0928)])
        .unwrap()
        .with_row(vec![Cell::from("Ad B"), Cell::from(0.0751)])
        .unwrap()
}

fn ctr_section() -> ReportSection {
    ReportSection::for_metric(Metric::Ctr, ctr_table())
        .with_item("Ad A", PosteriorParams::beta(93.0, 909.0).unwrap())
        .with_item("Ad B", PosteriorParams::beta(79.0, 973.0).unwrap())
}

fn cpa_section() -> ReportSection {
    let table = DataTable::new(["ad_name", "CPA Mean"])
        .with_row(vec![Cell::from("Ad A"), Cell::from(100.0)])
        .unwrap();
    ReportSection::for_metric(Metric::Cpa, table)
        .with_item("Ad A", PosteriorParams::inverse_gamma(14.0, 1300.0).unwrap())
}

/// Build a two-section report and return its HTML.
fn render(config: ReportConfig, narrative: &str) -> (TempDir, String) {
    let dir = tempfile::tempdir().unwrap();
    let dest = dir.path().join("report.html");
    let mut builder = ReportBuilder::new(config).unwrap();
    builder.start(narrative).unwrap();
    builder.add_section(&ctr_section()).unwrap();
    builder.add_section(&cpa_section()).unwrap();
    builder.finalize(&dest).unwrap();
    let html = fs::read_to_string(&dest).unwrap();
    (dir, html)
}

// ============================================================================
// HTML Structure Tests
// ============================================================================

mod structure {
    use super::*;

    #[test]
    fn test_html_doctype_present() {
        let (_dir, html) = render(ReportConfig::default(), "Intro.");
        assert!(
            html.starts_with("<!DOCTYPE html>"),
            "HTML must start with DOCTYPE declaration"
        );
    }

    #[test]
    fn test_html_has_required_meta_tags() {
        let (_dir, html) = render(ReportConfig::default(), "Intro.");
        assert!(html.contains(r#"charset="UTF-8""#), "HTML must specify UTF-8 charset");
        assert!(html.contains(r#"name="generator""#), "HTML must have generator meta tag");
    }

    #[test]
    fn test_html_has_default_title() {
        let (_dir, html) = render(ReportConfig::default(), "Intro.");
        assert!(html.contains("<title>Client Marketing Report</title>"));
        assert!(html.contains(r#"<h1 class="title">Client Marketing Report</h1>"#));
    }

    #[test]
    fn test_html_has_custom_title_and_theme() {
        let config = ReportConfig::new()
            .with_title("Spring Campaign")
            .with_theme(ReportTheme::Dark);
        let (_dir, html) = render(config, "Intro.");
        assert!(html.contains("<title>Spring Campaign</title>"));
        assert!(html.contains(r#"<html lang="en" class="dark">"#));
    }

    #[test]
    fn test_letter_page_size() {
        let (_dir, html) = render(ReportConfig::default(), "Intro.");
        assert!(html.contains("size: letter;"));
    }
}

// ============================================================================
// Ordering Tests
// ============================================================================

mod ordering {
    use super::*;

    #[test]
    fn test_narrative_paragraphs_precede_sections() {
        let (_dir, html) = render(
            ReportConfig::default(),
            "First paragraph\ncontinues here.\n\nSecond paragraph.",
        );
        let first = html.find("<p>First paragraph continues here.</p>").unwrap();
        let second = html.find("<p>Second paragraph.</p>").unwrap();
        let ctr = html.find("<h2>CTR</h2>").unwrap();
        assert!(first < second && second < ctr);
    }

    #[test]
    fn test_sections_in_call_order() {
        let (_dir, html) = render(ReportConfig::default(), "Intro.");
        let ctr = html.find("<h2>CTR</h2>").unwrap();
        let cpa = html.find("<h2>CPA</h2>").unwrap();
        assert!(ctr < cpa);
    }

    #[test]
    fn test_item_headings_follow_table() {
        let (_dir, html) = render(ReportConfig::default(), "Intro.");
        let table = html.find(r#"<table class="summary">"#).unwrap();
        let a = html.find("<h3>CTR Posterior – Ad A</h3>").unwrap();
        let b = html.find("<h3>CTR Posterior – Ad B</h3>").unwrap();
        assert!(table < a && a < b);
    }

    #[test]
    fn test_table_rows_not_resorted() {
        let table = DataTable::new(["ad_name", "CTR Mean"])
            .with_row(vec![Cell::from("Zulu"), Cell::from(0.01)])
            .unwrap()
            .with_row(vec![Cell::from("Alpha"), Cell::from(0.2)])
            .unwrap();
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("r.html");
        let mut builder = ReportBuilder::with_defaults().unwrap();
        builder.start("").unwrap();
        builder
            .add_section(&ReportSection::for_metric(Metric::Ctr, table))
            .unwrap();
        builder.finalize(&dest).unwrap();
        let html = fs::read_to_string(&dest).unwrap();
        assert!(html.find("<td>Zulu</td>").unwrap() < html.find("<td>Alpha</td>").unwrap());
    }
}

// ============================================================================
// Embedding Tests
// ============================================================================

mod embedding {
    use super::*;

    #[test]
    fn test_one_image_per_item() {
        let (_dir, html) = render(ReportConfig::default(), "Intro.");
        let img = Regex::new(r#"<img class="plot" [^>]*src="data:image/svg\+xml;base64,[A-Za-z0-9+/=]+""#)
            .unwrap();
        assert_eq!(img.find_iter(&html).count(), 3);
    }

    #[test]
    fn test_one_page_break_per_section() {
        let (_dir, html) = render(ReportConfig::default(), "Intro.");
        assert_eq!(html.matches(r#"<div class="page-break"></div>"#).count(), 2);
    }

    #[test]
    fn test_no_external_urls() {
        let (_dir, html) = render(ReportConfig::default(), "See https://example.com for details.");
        let external = Regex::new(r#"(src|href)\s*=\s*"https?://"#).unwrap();
        assert!(
            !external.is_match(&html),
            "document must not load external resources"
        );
    }

    #[test]
    fn test_no_local_file_references() {
        let (_dir, html) = render(ReportConfig::default(), "Intro.");
        assert!(!html.contains("file://"));
        assert!(!html.contains(".svg\""));
    }
}

// ============================================================================
// Escaping and Appendix Tests
// ============================================================================

mod escaping {
    use super::*;

    #[test]
    fn test_narrative_markup_escaped() {
        let (_dir, html) = render(ReportConfig::default(), "<script>alert('x')</script>");
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_appendix_after_sections() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("r.html");
        let mut builder = ReportBuilder::with_defaults().unwrap();
        builder.start("Intro.").unwrap();
        builder.add_section(&ctr_section()).unwrap();
        builder
            .add_diagnostics_appendix(&[
                DiagnosticEntry::inline("Trace – Ad A", "trace_a.svg", b"<svg/>".to_vec())
                    .with_explanation("Chains mix well."),
                DiagnosticEntry::inline("Trace – Ad B", "trace_b.svg", b"<svg/>".to_vec()),
            ])
            .unwrap();
        let report = builder.finalize(&dest).unwrap();
        assert_eq!(report.images, 4);

        let html = fs::read_to_string(&dest).unwrap();
        let section = html.find("<h2>CTR</h2>").unwrap();
        let appendix = html.find(&format!("<h1>{APPENDIX_TITLE}</h1>")).unwrap();
        let a = html.find("<h2>Trace – Ad A</h2>").unwrap();
        let b = html.find("<h2>Trace – Ad B</h2>").unwrap();
        assert!(section < appendix && appendix < a && a < b);
        assert!(html.contains("<p>Chains mix well.</p>"));
    }
}
