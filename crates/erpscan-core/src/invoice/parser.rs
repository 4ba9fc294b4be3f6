//! Line-by-line state machine for ERP-formatted invoice text.
//!
//! The expected input looks like:
//!
//! ```text
//! Company Name     : ACME Ltd
//! Invoice Number   : INV-42
//!
//! Items:
//! Item 1: Steel rod
//!   Quantity    : 10
//!   Amount      : 1500
//!
//! Additional Fields:
//!   Transporter : XYZ Logistics
//! ```
//!
//! Parsing never fails. Lines that do not fit are dropped.

use tracing::{debug, trace};

use crate::models::invoice::{FieldMap, Item, ParsedInvoice};

const ITEMS_MARKER: &str = "Items:";
const ADDITIONAL_MARKER: &str = "Additional Fields:";
const ITEM_PREFIX: &str = "Item ";

/// Logical region of the structured text.
///
/// Well-formed text moves forward only: header, then items, then additional.
/// Out-of-order markers still switch the section rather than failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Section {
    /// Before any marker.
    #[default]
    Header,
    /// After `Items:`.
    Items,
    /// After `Additional Fields:`.
    Additional,
}

/// Recognize a section marker line.
///
/// Matching is a case-sensitive prefix test on the trimmed line.
pub fn classify_marker(line: &str) -> Option<Section> {
    if line.starts_with(ITEMS_MARKER) {
        Some(Section::Items)
    } else if line.starts_with(ADDITIONAL_MARKER) {
        Some(Section::Additional)
    } else {
        None
    }
}

/// Whether the line opens a new item (`Item ` prefix and a colon somewhere).
pub fn is_item_start(line: &str) -> bool {
    line.starts_with(ITEM_PREFIX) && line.contains(':')
}

/// Split a field line on its first colon, trimming both halves.
pub fn split_field_line(line: &str) -> Option<(&str, &str)> {
    line.split_once(':')
        .map(|(label, value)| (label.trim(), value.trim()))
}

/// Accumulation state for a single parse.
#[derive(Debug, Default)]
pub struct ErpRecordAssembler {
    section: Section,
    open_item: Option<Item>,
    header_fields: FieldMap,
    items: Vec<Item>,
    additional_fields: FieldMap,
    dropped: usize,
}

impl ErpRecordAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current section.
    pub fn section(&self) -> Section {
        self.section
    }

    /// The item currently accumulating fields, if any.
    pub fn open_item(&self) -> Option<&Item> {
        self.open_item.as_ref()
    }

    /// Process one raw line.
    pub fn feed_line(&mut self, raw: &str) {
        let line = raw.trim();
        if line.is_empty() {
            return;
        }

        // An open item stays open across a marker.
        if let Some(section) = classify_marker(line) {
            trace!("Section marker {:?} -> {:?}", line, section);
            self.section = section;
            return;
        }

        if is_item_start(line) {
            self.flush_item();
            self.open_item = Some(Item::new(line));
            return;
        }

        let Some((label, value)) = split_field_line(line) else {
            return;
        };

        let target = match (self.section, self.open_item.as_mut()) {
            (Section::Items, Some(item)) => Some(&mut item.fields),
            (Section::Items, None) => None,
            (Section::Header, _) => Some(&mut self.header_fields),
            (Section::Additional, _) => Some(&mut self.additional_fields),
        };

        match target {
            Some(fields) => {
                fields.insert(label.to_string(), value.to_string());
            }
            None => {
                // Field before any item header; kept out of the record.
                trace!("Dropping field {:?} outside of an item", label);
                self.dropped += 1;
            }
        }
    }

    fn flush_item(&mut self) {
        if let Some(item) = self.open_item.take() {
            self.items.push(item);
        }
    }

    /// Close any open item and build the record.
    pub fn finish(mut self, raw_text: &str) -> ParsedInvoice {
        self.flush_item();

        debug!(
            "Parsed ERP text: {} header fields, {} items, {} additional fields, {} dropped",
            self.header_fields.len(),
            self.items.len(),
            self.additional_fields.len(),
            self.dropped
        );

        ParsedInvoice {
            header_fields: self.header_fields,
            items: self.items,
            additional_fields: self.additional_fields,
            raw_text: raw_text.to_string(),
        }
    }
}

/// Parse ERP-formatted text into a [`ParsedInvoice`].
pub fn parse_erp_text(text: &str) -> ParsedInvoice {
    let mut assembler = ErpRecordAssembler::new();
    for line in text.split('\n') {
        assembler.feed_line(line);
    }
    assembler.finish(text)
}
