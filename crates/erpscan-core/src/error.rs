//! Error types for the erpscan-core library.
//!
//! The structured-text parser itself never fails; these types belong to the
//! extraction pipeline that surrounds it.

use thiserror::Error;

/// Main error type for the erpscan library.
#[derive(Error, Debug)]
pub enum ErpScanError {
    /// The uploaded document was rejected before any remote call.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// OCR provider error.
    #[error("OCR error: {0}")]
    Ocr(#[from] OcrError),

    /// Text-generation provider error.
    #[error("structuring error: {0}")]
    Structuring(#[from] StructuringError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

impl ErpScanError {
    /// Whether the failure was caused by the caller's input rather than processing.
    ///
    /// Maps onto the 400/500 split of an HTTP front end.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            ErpScanError::Validation(_) | ErpScanError::Ocr(OcrError::EmptyResult)
        )
    }
}

/// Errors raised while validating an uploaded document.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// No document was supplied.
    #[error("No file uploaded")]
    NoFile,

    /// A document was supplied without a file name.
    #[error("No file selected")]
    EmptyFilename,

    /// The file extension is not accepted; holds the file name and the
    /// accepted types in display form (e.g. `PDF`).
    #[error("Only {1} files are supported")]
    UnsupportedFileType(String, String),
}

/// Errors related to the OCR provider.
#[derive(Error, Debug)]
pub enum OcrError {
    /// The request to the provider failed.
    #[error("OCR request failed: {0}")]
    Request(String),

    /// The provider reported that analysis failed.
    #[error("analysis failed: {0}")]
    AnalysisFailed(String),

    /// Polling gave up before the analysis completed.
    #[error("analysis did not complete after {0} polls")]
    Timeout(u32),

    /// The provider returned no text.
    #[error("OCR returned no text")]
    EmptyResult,
}

/// Errors related to the text-generation provider.
#[derive(Error, Debug)]
pub enum StructuringError {
    /// The request to the provider failed.
    #[error("completion request failed: {0}")]
    Request(String),

    /// The provider answered without any message content.
    #[error("completion returned no content")]
    EmptyResponse,
}

/// Result type for the erpscan library.
pub type Result<T> = std::result::Result<T, ErpScanError>;
