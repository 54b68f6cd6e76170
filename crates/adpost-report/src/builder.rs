//! Stateful report assembly.
//!
//! ```text
//! Empty ──start──▶ HeaderWritten ──add_section──▶ SectionWritten ◀─┐
//!                        │                              │    └──────┘
//!                        └──add_diagnostics_appendix──▶ AppendixWritten
//!        HeaderWritten | SectionWritten | AppendixWritten ──finalize──▶ Finalized
//! ```
//!
//! Each builder owns a uniquely named temporary directory for plot images.
//! The directory lives until the document is written, the build is aborted,
//! or the builder is dropped, whichever comes first.
//!
//! A content failure inside `add_section`, `add_diagnostics_appendix` or
//! `finalize` aborts the build: accumulated blocks are discarded, the
//! temporary directory is removed and no document is written. Calls made in
//! the wrong state are rejected without changing the state.

use crate::config::ReportConfig;
use crate::density::render_curve;
use crate::error::{ReportError, Result};
use crate::html::{render_document, Block};
use crate::narrative::paragraphs;
use crate::plot::rasterize;
use crate::sections::{DiagnosticEntry, DiagnosticImage, ReportSection};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::io::Write as _;
use std::path::{Path, PathBuf};
use tempfile::{NamedTempFile, TempDir};
use tracing::{debug, info, warn};

/// Prefix of every builder's transient plot directory.
pub const SCRATCH_PREFIX: &str = "adpost-plots-";

/// Heading of the optional diagnostics appendix.
pub const APPENDIX_TITLE: &str = "Appendix – Model Diagnostics";

/// Lifecycle state of a [`ReportBuilder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildState {
    Empty,
    HeaderWritten,
    SectionWritten,
    AppendixWritten,
    Finalized,
    Aborted,
}

impl fmt::Display for BuildState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BuildState::Empty => "empty",
            BuildState::HeaderWritten => "header_written",
            BuildState::SectionWritten => "section_written",
            BuildState::AppendixWritten => "appendix_written",
            BuildState::Finalized => "finalized",
            BuildState::Aborted => "aborted",
        };
        f.write_str(s)
    }
}

/// What a successful [`ReportBuilder::finalize`] produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinalizedReport {
    pub path: PathBuf,
    pub sections: usize,
    pub images: usize,
    pub bytes: usize,
    pub generated_at: DateTime<Utc>,
}

/// Incremental builder for one report document.
#[derive(Debug)]
pub struct ReportBuilder {
    config: ReportConfig,
    state: BuildState,
    blocks: Vec<Block>,
    scratch: Option<TempDir>,
    sections: usize,
    staged: usize,
}

impl ReportBuilder {
    /// Validate `config` and create the transient plot directory.
    pub fn new(config: ReportConfig) -> Result<Self> {
        config.validate()?;
        let scratch = tempfile::Builder::new().prefix(SCRATCH_PREFIX).tempdir()?;
        debug!(dir = %scratch.path().display(), "Report build started");
        Ok(Self {
            config,
            state: BuildState::Empty,
            blocks: Vec::new(),
            scratch: Some(scratch),
            sections: 0,
            staged: 0,
        })
    }

    pub fn with_defaults() -> Result<Self> {
        Self::new(ReportConfig::default())
    }

    pub fn config(&self) -> &ReportConfig {
        &self.config
    }

    pub fn state(&self) -> BuildState {
        self.state
    }

    /// Transient plot directory; `None` once finalized or aborted.
    pub fn scratch_dir(&self) -> Option<&Path> {
        self.scratch.as_ref().map(TempDir::path)
    }

    /// Sections added so far.
    pub fn section_count(&self) -> usize {
        self.sections
    }

    fn guard(&self, operation: &'static str, allowed: &[BuildState]) -> Result<()> {
        match self.state {
            BuildState::Finalized => Err(ReportError::AlreadyFinalized),
            BuildState::Aborted => Err(ReportError::BuildAborted),
            state if allowed.contains(&state) => Ok(()),
            state => Err(ReportError::OutOfOrder { operation, state }),
        }
    }

    /// Discard everything and release the transient directory.
    ///
    /// Aborting twice is a no-op; aborting a finalized build is an error.
    pub fn abort(&mut self) -> Result<()> {
        match self.state {
            BuildState::Finalized => Err(ReportError::AlreadyFinalized),
            BuildState::Aborted => Ok(()),
            _ => {
                self.discard();
                Ok(())
            }
        }
    }

    fn discard(&mut self) {
        self.blocks.clear();
        if let Some(dir) = self.scratch.take() {
            let path = dir.path().to_path_buf();
            if let Err(err) = dir.close() {
                warn!(dir = %path.display(), error = %err, "Failed to remove plot directory");
            }
        }
        self.state = BuildState::Aborted;
        debug!(sections = self.sections, "Report build aborted");
    }

    fn fail<T>(&mut self, err: ReportError) -> Result<T> {
        warn!(error = %err, state = %self.state, "Report build failed");
        self.discard();
        Err(err)
    }

    fn scratch_path(&mut self, stem: &str, extension: &str) -> Result<PathBuf> {
        let dir = self.scratch.as_ref().ok_or(ReportError::BuildAborted)?;
        self.staged += 1;
        Ok(dir
            .path()
            .join(format!("{:03}-{}.{}", self.staged, file_stem(stem), extension)))
    }

    /// Write the title and narrative paragraphs.
    pub fn start(&mut self, narrative: &str) -> Result<()> {
        self.guard("start", &[BuildState::Empty])?;
        self.blocks.push(Block::Title(self.config.title.clone()));
        let paras = paragraphs(narrative);
        let count = paras.len();
        self.blocks.extend(paras.into_iter().map(Block::Paragraph));
        self.state = BuildState::HeaderWritten;
        debug!(paragraphs = count, "Report header written");
        Ok(())
    }

    /// Append a metric heading, its table, one plot per item and a page break.
    pub fn add_section(&mut self, section: &ReportSection) -> Result<()> {
        self.guard("add_section", &[BuildState::HeaderWritten, BuildState::SectionWritten])?;
        match self.section_blocks(section) {
            Ok(blocks) => {
                self.blocks.extend(blocks);
                self.sections += 1;
                self.state = BuildState::SectionWritten;
                debug!(metric = %section.metric, items = section.items.len(), "Section added");
                Ok(())
            }
            Err(err) => self.fail(err),
        }
    }

    fn section_blocks(&mut self, section: &ReportSection) -> Result<Vec<Block>> {
        let mut blocks = vec![
            Block::Heading {
                level: 2,
                text: section.metric.clone(),
            },
            Block::Table(section.table.clone()),
        ];
        let labels = section.axis_labels();
        for item in &section.items {
            let curve = render_curve(&item.params, self.config.curve_points)?;
            let heading = section.item_heading(&item.label);
            let svg = rasterize(&curve, &item.label, &labels, &self.config.plot);
            let path = self.scratch_path(&format!("{}_{}", section.metric, item.label), "svg")?;
            fs::write(&path, svg)?;
            blocks.push(Block::Heading {
                level: 3,
                text: heading.clone(),
            });
            blocks.push(Block::Image { path, alt: heading });
        }
        blocks.push(Block::PageBreak);
        Ok(blocks)
    }

    /// Append the diagnostics appendix. Allowed at most once.
    pub fn add_diagnostics_appendix(&mut self, entries: &[DiagnosticEntry]) -> Result<()> {
        self.guard(
            "add_diagnostics_appendix",
            &[BuildState::HeaderWritten, BuildState::SectionWritten],
        )?;
        match self.appendix_blocks(entries) {
            Ok(blocks) => {
                self.blocks.extend(blocks);
                self.state = BuildState::AppendixWritten;
                debug!(entries = entries.len(), "Diagnostics appendix added");
                Ok(())
            }
            Err(err) => self.fail(err),
        }
    }

    fn appendix_blocks(&mut self, entries: &[DiagnosticEntry]) -> Result<Vec<Block>> {
        let mut blocks = vec![Block::Heading {
            level: 1,
            text: APPENDIX_TITLE.to_string(),
        }];
        for entry in entries {
            let path = match &entry.image {
                DiagnosticImage::Path(path) => {
                    if !path.is_file() {
                        return Err(ReportError::Io(std::io::Error::new(
                            std::io::ErrorKind::NotFound,
                            format!("diagnostic image not found: {}", path.display()),
                        )));
                    }
                    path.clone()
                }
                DiagnosticImage::Inline { file_name, bytes } => {
                    let name = Path::new(file_name);
                    let stem = name.file_stem().and_then(|s| s.to_str()).unwrap_or("diagnostic");
                    let extension = name.extension().and_then(|s| s.to_str()).unwrap_or("bin");
                    let path = self.scratch_path(stem, extension)?;
                    fs::write(&path, bytes)?;
                    path
                }
            };
            blocks.push(Block::Heading {
                level: 2,
                text: entry.title.clone(),
            });
            blocks.push(Block::Image {
                path,
                alt: entry.title.clone(),
            });
            if let Some(text) = entry.explanation.as_deref().filter(|t| !t.trim().is_empty()) {
                blocks.push(Block::Paragraph(text.to_string()));
            }
        }
        Ok(blocks)
    }

    /// Embed every image, write the document atomically to `destination`
    /// and release the transient directory.
    pub fn finalize(&mut self, destination: &Path) -> Result<FinalizedReport> {
        self.guard(
            "finalize",
            &[
                BuildState::HeaderWritten,
                BuildState::SectionWritten,
                BuildState::AppendixWritten,
            ],
        )?;
        match self.write_document(destination) {
            Ok(report) => {
                self.blocks.clear();
                if let Some(dir) = self.scratch.take() {
                    if let Err(err) = dir.close() {
                        warn!(error = %err, "Failed to remove plot directory");
                    }
                }
                self.state = BuildState::Finalized;
                info!(
                    path = %report.path.display(),
                    sections = report.sections,
                    images = report.images,
                    bytes = report.bytes,
                    "Report written"
                );
                Ok(report)
            }
            Err(err) => self.fail(err),
        }
    }

    fn write_document(&self, destination: &Path) -> Result<FinalizedReport> {
        let generated_at = Utc::now();
        let doc = render_document(&self.config.title, self.config.theme, generated_at, &self.blocks)?;

        let parent = match destination.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&parent)?;

        let mut tmp = NamedTempFile::new_in(&parent)?;
        tmp.write_all(doc.html.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(destination)?;

        Ok(FinalizedReport {
            path: destination.to_path_buf(),
            sections: self.sections,
            images: doc.images,
            bytes: doc.html.len(),
            generated_at,
        })
    }
}

/// File-system-safe stem for a staged image.
fn file_stem(label: &str) -> String {
    let stem: String = label
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
        .take(48)
        .collect();
    if stem.is_empty() {
        "plot".to_string()
    } else {
        stem
    }
}
