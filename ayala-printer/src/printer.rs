//! Printer adapters for receipt documents
//!
//! Supports:
//! - File spool (one `.html` per job, picked up by the preview/print surface)

use std::path::{Path, PathBuf};

use tokio::io::AsyncWriteExt;
use tracing::{info, instrument, warn};

use crate::error::{PrintError, PrintResult};
use crate::html::HtmlDocument;

/// Trait for printer adapters
#[allow(async_fn_in_trait)]
pub trait Printer {
    /// Hand a document to the print surface
    async fn print(&self, document: &HtmlDocument) -> PrintResult<()>;

    /// Check if the print surface is available
    async fn is_online(&self) -> bool;
}

/// Spool printer: writes each document to `{dir}/{name}.html`
///
/// An existing file with the same name is replaced, so re-printing the
/// same job is harmless.
#[derive(Debug, Clone)]
pub struct FilePrinter {
    dir: PathBuf,
}

impl FilePrinter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Spool directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Where `document` lands
    pub fn path_for(&self, document: &HtmlDocument) -> PathBuf {
        self.dir.join(format!("{}.html", document.name))
    }
}

impl Printer for FilePrinter {
    #[instrument(skip(document), fields(dir = %self.dir.display(), name = %document.name, len = document.html.len()))]
    async fn print(&self, document: &HtmlDocument) -> PrintResult<()> {
        // The spool directory is the print surface; failing to open it is a
        // blocked print, not a crash
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| PrintError::Blocked(format!("{}: {}", self.dir.display(), e)))?;

        let path = self.path_for(document);
        let mut file = tokio::fs::File::create(&path).await?;
        file.write_all(document.as_bytes()).await?;
        file.flush().await?;

        info!(path = %path.display(), "Print job spooled");
        Ok(())
    }

    #[instrument(fields(dir = %self.dir.display()))]
    async fn is_online(&self) -> bool {
        match tokio::fs::create_dir_all(&self.dir).await {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "Spool directory unavailable");
                false
            }
        }
    }
}
