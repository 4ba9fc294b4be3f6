//! Upload validation and temporary staging.

use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::ValidationError;

/// An uploaded document.
#[derive(Debug, Clone, Default)]
pub struct Upload {
    /// Client-side file name; `None` when nothing was uploaded.
    pub filename: Option<String>,

    /// Document contents.
    pub bytes: Vec<u8>,
}

impl Upload {
    pub fn new(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            filename: Some(filename.into()),
            bytes,
        }
    }

    /// Read a document from disk, keeping only its file name.
    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let bytes = std::fs::read(path)?;
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self {
            filename: Some(filename),
            bytes,
        })
    }
}

/// Check the upload before any remote call is made.
pub fn validate_upload(upload: &Upload, allowed_extensions: &[String]) -> Result<(), ValidationError> {
    let filename = upload.filename.as_deref().ok_or(ValidationError::NoFile)?;

    if filename.is_empty() {
        return Err(ValidationError::EmptyFilename);
    }

    let extension = Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    if !allowed_extensions.iter().any(|allowed| allowed.eq_ignore_ascii_case(&extension)) {
        return Err(ValidationError::UnsupportedFileType(
            filename.to_string(),
            allowed_extensions
                .iter()
                .map(|e| e.to_uppercase())
                .collect::<Vec<_>>()
                .join(", "),
        ));
    }

    Ok(())
}

/// An upload written to a temporary file.
///
/// The file is removed when the value is dropped.
#[derive(Debug)]
pub struct StagedDocument {
    file: NamedTempFile,
}

impl StagedDocument {
    /// Write the bytes to a fresh temporary file with the given suffix.
    pub fn stage(bytes: &[u8], suffix: &str) -> std::io::Result<Self> {
        let mut file = tempfile::Builder::new()
            .prefix("erpscan-")
            .suffix(suffix)
            .tempfile()?;
        file.write_all(bytes)?;
        file.flush()?;

        debug!("Staged {} bytes at {}", bytes.len(), file.path().display());

        Ok(Self { file })
    }

    /// Location of the staged file.
    pub fn path(&self) -> &Path {
        self.file.path()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn pdf_only() -> Vec<String> {
        vec!["pdf".to_string()]
    }

    #[test]
    fn test_validate_accepts_pdf_any_case() {
        assert!(validate_upload(&Upload::new("scan.pdf", vec![1]), &pdf_only()).is_ok());
        assert!(validate_upload(&Upload::new("SCAN.PDF", vec![1]), &pdf_only()).is_ok());
    }

    #[test]
    fn test_validate_rejects_missing_file() {
        assert_eq!(
            validate_upload(&Upload::default(), &pdf_only()),
            Err(ValidationError::NoFile)
        );
    }

    #[test]
    fn test_validate_rejects_empty_filename() {
        assert_eq!(
            validate_upload(&Upload::new("", vec![]), &pdf_only()),
            Err(ValidationError::EmptyFilename)
        );
    }

    #[test]
    fn test_validate_rejects_other_types() {
        let err = validate_upload(&Upload::new("scan.png", vec![]), &pdf_only()).unwrap_err();
        assert!(matches!(err, ValidationError::UnsupportedFileType(ref name, _) if name == "scan.png"));

        let err = validate_upload(&Upload::new("pdf", vec![]), &pdf_only()).unwrap_err();
        assert!(matches!(err, ValidationError::UnsupportedFileType(..)));
    }

    #[test]
    fn test_unsupported_type_message() {
        let err = validate_upload(&Upload::new("scan.png", vec![]), &pdf_only()).unwrap_err();
        assert_eq!(err.to_string(), "Only PDF files are supported");

        let allowed = vec!["pdf".to_string(), "tiff".to_string()];
        let err = validate_upload(&Upload::new("scan.png", vec![]), &allowed).unwrap_err();
        assert_eq!(err.to_string(), "Only PDF, TIFF files are supported");
    }

    #[test]
    fn test_staged_document_is_removed_on_drop() {
        let staged = StagedDocument::stage(b"%PDF-1.4", ".pdf").unwrap();
        let path = staged.path().to_path_buf();

        assert!(path.exists());
        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("pdf"));
        assert_eq!(std::fs::read(&path).unwrap(), b"%PDF-1.4");

        drop(staged);
        assert!(!path.exists());
    }
}
