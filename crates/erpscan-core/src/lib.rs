//! Core library for invoice ERP extraction.
//!
//! This crate provides:
//! - A deterministic parser turning ERP-formatted text into a structured record
//! - Data models for parsed invoices and extraction responses
//! - Configuration for the remote OCR and text-generation providers
//! - The extraction pipeline (upload validation, temp staging, timing)

pub mod error;
pub mod invoice;
pub mod models;
#[cfg(feature = "native")]
pub mod pipeline;

pub use error::{ErpScanError, OcrError, Result, StructuringError, ValidationError};
pub use invoice::{
    ErpRecordAssembler, ErpTextParser, Section, StructuredTextParser, parse_erp_text,
};
pub use models::invoice::{ErrorResponse, ExtractionResponse, FieldMap, Item, ParsedInvoice, ProcessingTime};
pub use models::config::ErpScanConfig;
#[cfg(feature = "native")]
pub use pipeline::{InvoicePipeline, OcrProvider, TextStructurer, Upload};
