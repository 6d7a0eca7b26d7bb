//! Uploaded PDF handling: temporary storage, text extraction and cleanup

use crate::error::{Result, ScreenerError};
use log::{error, info, warn};
use lopdf::Document;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

pub struct PdfService {
    temp_dir: PathBuf,
}

impl PdfService {
    /// Fails if the temporary directory cannot be created.
    pub fn new(temp_dir: impl Into<PathBuf>) -> Result<Self> {
        let service = Self {
            temp_dir: temp_dir.into(),
        };
        service.ensure_temp_dir()?;
        Ok(service)
    }

    pub fn temp_dir(&self) -> &Path {
        &self.temp_dir
    }

    /// Extract the text of an uploaded PDF.
    ///
    /// The bytes are written to a uniquely named file inside the temp
    /// directory, which is removed before this returns on every path.
    /// Unparseable content comes back as [`ScreenerError::PdfExtraction`].
    pub fn extract(&self, file_bytes: &[u8], original_name: &str) -> Result<String> {
        // Recreate the directory if a cleanup removed it.
        self.ensure_temp_dir()?;

        let mut temp_file = tempfile::Builder::new()
            .prefix("upload-")
            .suffix(".pdf")
            .tempfile_in(&self.temp_dir)?;
        temp_file.write_all(file_bytes)?;
        temp_file.flush()?;
        info!(
            "Uploaded file '{}' saved temporarily to '{}'",
            original_name,
            temp_file.path().display()
        );

        let result = extract_pages(temp_file.path());
        Self::cleanup_temp_file(temp_file);

        match result {
            Ok(text) => {
                info!("Successfully extracted text from {}.", original_name);
                Ok(text)
            }
            Err(e) => {
                warn!("Failed to extract text from {}: {}", original_name, e);
                Err(e)
            }
        }
    }

    fn cleanup_temp_file(temp_file: NamedTempFile) {
        let path = temp_file.path().to_path_buf();
        match temp_file.close() {
            Ok(()) => info!("Successfully removed temporary file: {}", path.display()),
            Err(e) => error!("Failed to remove temporary file {}: {}", path.display(), e),
        }
    }

    fn ensure_temp_dir(&self) -> Result<()> {
        if self.temp_dir.is_dir() {
            return Ok(());
        }

        std::fs::create_dir_all(&self.temp_dir).map_err(|source| {
            error!(
                "Failed to create temporary directory {}: {}",
                self.temp_dir.display(),
                source
            );
            ScreenerError::TempDir {
                path: self.temp_dir.clone(),
                source,
            }
        })?;
        info!("Created temporary directory: {}", self.temp_dir.display());
        Ok(())
    }

    /// Remove the temp directory if nothing is left in it. Best effort.
    pub fn cleanup_temp_directory(&self) {
        let is_empty = match std::fs::read_dir(&self.temp_dir) {
            Ok(mut entries) => entries.next().is_none(),
            Err(_) => return,
        };
        if !is_empty {
            return;
        }

        match std::fs::remove_dir(&self.temp_dir) {
            Ok(()) => info!(
                "Successfully removed empty temporary directory: {}",
                self.temp_dir.display()
            ),
            Err(e) => warn!(
                "Could not remove temporary directory {}: {}",
                self.temp_dir.display(),
                e
            ),
        }
    }
}

/// Concatenate each page's text in page order.
fn extract_pages(path: &Path) -> Result<String> {
    let mut document = Document::load(path).map_err(|e| {
        error!("Error processing PDF {}: {}", path.display(), e);
        ScreenerError::PdfExtraction(e.to_string())
    })?;

    // Owner-password-only files open with the empty user password.
    if document.is_encrypted() {
        if let Err(e) = document.decrypt("") {
            warn!("Cannot decrypt PDF {}: {}", path.display(), e);
            return Err(ScreenerError::PdfExtraction(
                "PDF is password protected".to_string(),
            ));
        }
        info!("Decrypted PDF {} with an empty user password", path.display());
    }

    let mut text = String::new();
    // get_pages is keyed by 1-based page number, so iteration is in page order.
    for page_number in document.get_pages().keys() {
        let page_text = document.extract_text(&[*page_number]).map_err(|e| {
            error!(
                "Error processing page {} of PDF {}: {}",
                page_number,
                path.display(),
                e
            );
            ScreenerError::PdfExtraction(format!("page {}: {}", page_number, e))
        })?;
        text.push_str(&page_text);
    }

    Ok(text)
}
