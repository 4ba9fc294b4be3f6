//! Parsed invoice records produced from ERP-formatted text.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Label to value mapping that keeps first-appearance order.
///
/// Re-inserting a label replaces its value without moving it.
pub type FieldMap = IndexMap<String, String>;

/// A structured invoice record ready for ERP display.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedInvoice {
    /// Fields that appear before the `Items:` marker.
    pub header_fields: FieldMap,

    /// Line items in source order.
    pub items: Vec<Item>,

    /// Fields that appear after the `Additional Fields:` marker.
    pub additional_fields: FieldMap,

    /// The input text, unmodified.
    pub raw_text: String,
}

impl ParsedInvoice {
    /// Create an empty record wrapping the given raw text.
    pub fn new(raw_text: impl Into<String>) -> Self {
        Self {
            raw_text: raw_text.into(),
            ..Default::default()
        }
    }

    /// True when no field or item was recognized.
    pub fn is_empty(&self) -> bool {
        self.header_fields.is_empty() && self.items.is_empty() && self.additional_fields.is_empty()
    }

    /// Total number of stored label/value pairs, item fields included.
    pub fn field_count(&self) -> usize {
        self.header_fields.len()
            + self.additional_fields.len()
            + self.items.iter().map(|item| item.fields.len()).sum::<usize>()
    }
}

/// One line item of an invoice.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// The full line that opened the item, e.g. `Item 1: Widget`.
    pub title: String,

    /// Fields belonging to this item only.
    pub fields: FieldMap,
}

impl Item {
    /// Create an item with no fields.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            fields: FieldMap::new(),
        }
    }

    /// Look up a field value by label.
    pub fn get(&self, label: &str) -> Option<&str> {
        self.fields.get(label).map(String::as_str)
    }
}

/// Stage durations of one extraction, in seconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcessingTime {
    /// Time spent in the OCR provider.
    pub ocr_time: f64,
    /// Time spent in the text-generation provider.
    pub structure_time: f64,
    /// Sum of both stages.
    pub total_time: f64,
}

impl ProcessingTime {
    /// Build from raw stage durations, rounding each figure to two decimals.
    pub fn from_secs(ocr_secs: f64, structure_secs: f64) -> Self {
        Self {
            ocr_time: round2(ocr_secs),
            structure_time: round2(structure_secs),
            total_time: round2(ocr_secs + structure_secs),
        }
    }
}

/// Two-decimal rounding with ties to even.
fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

/// Successful extraction result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionResponse {
    /// Always `true`; failures use [`ErrorResponse`].
    pub success: bool,

    /// The parsed record.
    pub data: ParsedInvoice,

    /// Stage timings.
    pub processing_time: ProcessingTime,
}

impl ExtractionResponse {
    pub fn new(data: ParsedInvoice, processing_time: ProcessingTime) -> Self {
        Self {
            success: true,
            data,
            processing_time,
        }
    }
}

/// Error object returned to callers when extraction fails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    /// Error for a failure during processing, carrying the underlying message.
    pub fn processing_failed(message: impl std::fmt::Display) -> Self {
        Self {
            error: format!("Processing failed: {}", message),
        }
    }
}

impl From<&crate::error::ErpScanError> for ErrorResponse {
    fn from(err: &crate::error::ErpScanError) -> Self {
        use crate::error::ErpScanError;

        match err {
            ErpScanError::Validation(e) => Self { error: e.to_string() },
            ErpScanError::Ocr(e @ crate::error::OcrError::EmptyResult) => Self { error: e.to_string() },
            other => Self::processing_failed(other),
        }
    }
}
