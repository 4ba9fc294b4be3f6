//! Structured ERP text parsing.

mod parser;

pub use parser::{
    ErpRecordAssembler, Section, classify_marker, is_item_start, parse_erp_text,
    split_field_line,
};

use crate::models::invoice::ParsedInvoice;

/// Trait for turning ERP-formatted text into a record.
///
/// Implementations must be total: any input yields a record.
pub trait ErpTextParser {
    /// Parse the text into a record.
    fn parse(&self, text: &str) -> ParsedInvoice;
}

/// The line-oriented section/item/field parser.
#[derive(Debug, Clone, Copy, Default)]
pub struct StructuredTextParser;

impl StructuredTextParser {
    pub fn new() -> Self {
        Self
    }
}

impl ErpTextParser for StructuredTextParser {
    fn parse(&self, text: &str) -> ParsedInvoice {
        parse_erp_text(text)
    }
}
