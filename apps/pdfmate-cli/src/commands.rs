//! Command implementations
//!
//! Every command returns the text to print so it can be checked in tests
//! without capturing stdout.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use pdfmate_core::{
    extract_range, merge_documents, parse_page_range, split_all_archive, total_page_count,
    validate_pdf, PageSelection, PdfSource, EXTRACTED_FILENAME, FREE_LIMITS, MERGED_FILENAME,
    SPLIT_ARCHIVE_FILENAME,
};
use pdfmate_license::codes::{generate_batch, insert_statement};
use pdfmate_license::{KeyValueStore, LicenseStorage, RedemptionClient};
use tracing::{debug, info};

/// Local license state plus the clock used for expiry checks
pub struct Session<S> {
    pub storage: LicenseStorage<S>,
    pub now: DateTime<Utc>,
}

impl<S: KeyValueStore> Session<S> {
    pub fn new(store: S) -> Self {
        Self::at(store, Utc::now())
    }

    pub fn at(store: S, now: DateTime<Utc>) -> Self {
        Self {
            storage: LicenseStorage::new(store),
            now,
        }
    }

    fn is_pro(&self) -> bool {
        self.storage.is_pro(self.now)
    }

    fn record_processed(&self, files: u64) {
        // Usage stats never fail a finished job
        match self.storage.increment_processed_count(files) {
            Ok(total) => debug!("processed count is now {}", total),
            Err(e) => tracing::warn!("failed to update processed count: {}", e),
        }
    }

    pub fn merge(&self, files: &[PathBuf], output: Option<&Path>) -> Result<String> {
        let mut sources = Vec::with_capacity(files.len());
        let mut total_bytes = 0u64;
        for path in files {
            let bytes = read_file(path)?;
            total_bytes += bytes.len() as u64;
            sources.push(PdfSource::new(display_name(path), bytes));
        }

        FREE_LIMITS.check_merge(sources.len(), total_bytes, self.is_pro())?;

        let page_count = total_page_count(&sources)?;
        info!(
            "Merging {} files ({} pages, {} bytes)",
            sources.len(),
            page_count,
            total_bytes
        );
        let merged = merge_documents(&sources)?;
        let output = output.unwrap_or(Path::new(MERGED_FILENAME));
        write_file(output, &merged)?;
        self.record_processed(sources.len() as u64);

        Ok(format!(
            "Merged {} files ({} pages) into {}",
            sources.len(),
            page_count,
            output.display()
        ))
    }

    /// Extract the pages named by `range`, in the order written
    pub fn split_range(&self, file: &Path, range: &str, output: Option<&Path>) -> Result<String> {
        let bytes = read_file(file)?;
        let info = validate_pdf(&bytes)?;
        FREE_LIMITS.check_split(bytes.len() as u64, info.page_count, self.is_pro())?;

        let selected = parse_page_range(range, info.page_count).len();
        let extracted = extract_range(&bytes, range)?;
        let output = output.unwrap_or(Path::new(EXTRACTED_FILENAME));
        write_file(output, &extracted)?;
        self.record_processed(1);

        Ok(format!(
            "Extracted {} of {} pages into {}",
            selected,
            info.page_count,
            output.display()
        ))
    }

    /// Write every page to its own PDF inside a zip archive
    pub fn split_all(&self, file: &Path, output: Option<&Path>) -> Result<String> {
        let bytes = read_file(file)?;
        let info = validate_pdf(&bytes)?;
        FREE_LIMITS.check_split(bytes.len() as u64, info.page_count, self.is_pro())?;

        let archive = split_all_archive(&bytes)?;
        let output = output.unwrap_or(Path::new(SPLIT_ARCHIVE_FILENAME));
        write_file(output, &archive)?;
        self.record_processed(1);

        Ok(format!(
            "Split {} pages into {}",
            info.page_count,
            output.display()
        ))
    }

    pub async fn activate(&self, client: &RedemptionClient, code: &str) -> Result<String> {
        info!("Redeeming code at {}", client.url());
        let license = client.activate(&self.storage, code, self.now).await?;
        Ok(format!(
            "Activation successful! License valid until {}",
            license.expires_at.format("%Y-%m-%d")
        ))
    }

    pub fn status(&self) -> String {
        let mut out = String::new();
        match self.storage.license() {
            Some(license) if license.is_valid_at(self.now) => {
                let _ = writeln!(
                    out,
                    "License: active until {} ({})",
                    license.expires_at.format("%Y-%m-%d"),
                    license.key
                );
            }
            Some(license) => {
                let _ = writeln!(
                    out,
                    "License: expired on {} ({})",
                    license.expires_at.format("%Y-%m-%d"),
                    license.key
                );
            }
            None => {
                let _ = writeln!(out, "License: none");
            }
        }
        if !self.is_pro() {
            let _ = writeln!(
                out,
                "Free plan: merge up to {} files / {}MB, split up to {} pages / {}MB",
                FREE_LIMITS.max_merge_files,
                FREE_LIMITS.max_merge_size_mb,
                FREE_LIMITS.max_split_pages,
                FREE_LIMITS.max_split_size_mb
            );
        }
        let _ = write!(out, "Files processed: {}", self.storage.processed_count());
        out
    }

    pub fn deactivate(&self) -> Result<String> {
        if self.storage.license().is_none() {
            return Ok("No license stored".to_string());
        }
        self.storage
            .remove_license()
            .context("removing stored license")?;
        Ok("License removed".to_string())
    }
}

/// Page count and metadata of one file
pub fn pages(file: &Path) -> Result<String> {
    let bytes = read_file(file)?;
    let info = validate_pdf(&bytes)?;

    let mut out = format!(
        "{}: {} pages, PDF {}, {} bytes",
        display_name(file),
        info.page_count,
        info.version,
        info.size_bytes
    );
    if let Some(title) = &info.title {
        let _ = write!(out, "\nTitle: {}", title);
    }
    if let Some(author) = &info.author {
        let _ = write!(out, "\nAuthor: {}", author);
    }
    Ok(out)
}

/// Apply `toggles` (1-based page numbers) to a selection and show the
/// resulting range text.
pub fn select(total: u32, range: Option<&str>, toggles: &[u32]) -> Result<String> {
    let mut selection = match range {
        Some(range) => PageSelection::with_range(total, range),
        None => PageSelection::new(total),
    };

    for &page in toggles {
        if page == 0 || page > total {
            bail!("Page {} is outside 1-{}", page, total);
        }
        selection.toggle(page - 1);
    }

    if selection.is_empty() {
        return Ok(format!("{}\nNo valid pages selected", selection.text()));
    }
    Ok(format!(
        "{}\nSelected {} of {} pages",
        selection.text(),
        selection.indices().len(),
        selection.total_pages()
    ))
}

pub fn generate_codes(count: usize, sql: Option<&Path>, list: Option<&Path>) -> Result<String> {
    if count == 0 {
        bail!("Count must be at least 1");
    }
    let codes = generate_batch(count);

    if sql.is_none() && list.is_none() {
        return Ok(codes.join("\n"));
    }

    let mut out = Vec::new();
    if let Some(path) = sql {
        write_file(path, insert_statement(&codes).as_bytes())?;
        out.push(format!("Wrote {} codes as SQL to {}", count, path.display()));
    }
    if let Some(path) = list {
        let mut text = codes.join("\n");
        text.push('\n');
        write_file(path, text.as_bytes())?;
        out.push(format!("Wrote {} codes to {}", count, path.display()));
    }
    Ok(out.join("\n"))
}

fn read_file(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("reading {}", path.display()))
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<()> {
    std::fs::write(path, bytes).with_context(|| format!("writing {}", path.display()))
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
