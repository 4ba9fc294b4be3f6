//! End-to-end extraction: validate, stage, OCR, structure, parse.

use std::time::Instant;

use tracing::{debug, info};

use super::prompt::build_prompt;
use super::upload::{StagedDocument, Upload, validate_upload};
use super::{OcrProvider, TextStructurer};
use crate::error::{OcrError, Result};
use crate::invoice::{ErpTextParser, StructuredTextParser};
use crate::models::config::ErpScanConfig;
use crate::models::invoice::{ExtractionResponse, ProcessingTime};

/// Suffix given to staged documents.
const STAGED_SUFFIX: &str = ".pdf";

/// Extraction pipeline over an OCR provider and a text structurer.
pub struct InvoicePipeline<O, S, P = StructuredTextParser> {
    ocr: O,
    structurer: S,
    parser: P,
    allowed_extensions: Vec<String>,
}

impl<O, S> InvoicePipeline<O, S>
where
    O: OcrProvider,
    S: TextStructurer,
{
    /// Create a pipeline with the default parser.
    pub fn new(ocr: O, structurer: S, config: &ErpScanConfig) -> Self {
        Self {
            ocr,
            structurer,
            parser: StructuredTextParser::new(),
            allowed_extensions: config.upload.allowed_extensions.clone(),
        }
    }
}

impl<O, S, P> InvoicePipeline<O, S, P>
where
    O: OcrProvider,
    S: TextStructurer,
    P: ErpTextParser,
{
    /// Replace the text parser.
    pub fn with_parser<Q: ErpTextParser>(self, parser: Q) -> InvoicePipeline<O, S, Q> {
        InvoicePipeline {
            ocr: self.ocr,
            structurer: self.structurer,
            parser,
            allowed_extensions: self.allowed_extensions,
        }
    }

    /// Run the full extraction for one upload.
    ///
    /// The staged temporary file is removed on every return path.
    pub async fn run(&self, upload: &Upload) -> Result<ExtractionResponse> {
        validate_upload(upload, &self.allowed_extensions)?;

        let staged = StagedDocument::stage(&upload.bytes, STAGED_SUFFIX)?;
        info!(
            "Processing {} ({} bytes)",
            upload.filename.as_deref().unwrap_or_default(),
            upload.bytes.len()
        );

        // Step 1: OCR
        let ocr_start = Instant::now();
        let ocr_text = self.ocr.analyze(staged.path()).await?;
        let ocr_secs = ocr_start.elapsed().as_secs_f64();

        let ocr_text = ocr_text.trim();
        if ocr_text.is_empty() {
            return Err(OcrError::EmptyResult.into());
        }
        debug!("OCR returned {} chars in {:.2}s", ocr_text.len(), ocr_secs);

        // Step 2: structure into ERP layout
        let structure_start = Instant::now();
        let structured = self.structurer.structure(&build_prompt(ocr_text)).await?;
        let structure_secs = structure_start.elapsed().as_secs_f64();

        let structured = structured.trim();
        debug!("Structured text is {} chars ({:.2}s)", structured.len(), structure_secs);

        // Step 3: parse
        let data = self.parser.parse(structured);

        drop(staged);

        Ok(ExtractionResponse::new(
            data,
            ProcessingTime::from_secs(ocr_secs, structure_secs),
        ))
    }
}
