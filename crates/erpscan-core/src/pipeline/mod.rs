//! Extraction pipeline: document upload to parsed record.
//!
//! The remote OCR and text-generation services sit behind the
//! [`OcrProvider`] and [`TextStructurer`] traits so that the pipeline can be
//! driven by real HTTP clients or by in-memory fakes.

mod extract;
mod prompt;
mod upload;

pub use extract::InvoicePipeline;
pub use prompt::build_prompt;
pub use upload::{StagedDocument, Upload, validate_upload};

use std::future::Future;
use std::path::Path;

use crate::error::{OcrError, StructuringError};

/// A remote service that extracts plain text from a document.
pub trait OcrProvider {
    /// Analyze the document at `path` and return its text content.
    ///
    /// An empty string means no text was found.
    fn analyze(&self, path: &Path) -> impl Future<Output = Result<String, OcrError>> + Send;
}

/// A remote text-generation service that reformats OCR text.
pub trait TextStructurer {
    /// Send the prompt and return the generated text.
    fn structure(&self, prompt: &str) -> impl Future<Output = Result<String, StructuringError>> + Send;
}
