//! WASM bindings for the invoice ERP text parser.
//!
//! Lets a browser front end parse structured ERP text locally, either in one
//! call or line by line as a completion streams in.

use serde::Serialize;
use wasm_bindgen::prelude::*;

use erpscan_core::models::invoice::ParsedInvoice;
use erpscan_core::{ErpRecordAssembler, parse_erp_text};

/// Initialize panic hook for better error messages in console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Version information.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Parse ERP-formatted text and return the record as a plain JS object.
///
/// Field maps become ordinary objects whose key order follows the text.
#[wasm_bindgen(js_name = parseErpText)]
pub fn parse_erp_text_js(text: &str) -> Result<JsValue, JsValue> {
    to_js(&parse_erp_text(text))
}

/// Parse ERP-formatted text and return the record as a JSON string.
#[wasm_bindgen(js_name = parseErpTextJson)]
pub fn parse_erp_text_json(text: &str) -> Result<String, JsValue> {
    serde_json::to_string(&parse_erp_text(text)).map_err(|e| JsValue::from_str(&e.to_string()))
}

fn to_js(record: &ParsedInvoice) -> Result<JsValue, JsValue> {
    record
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Incremental parser for text that arrives in chunks.
#[wasm_bindgen]
pub struct StreamingParser {
    assembler: ErpRecordAssembler,
    raw_text: String,
    pending: String,
}

#[wasm_bindgen]
impl StreamingParser {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            assembler: ErpRecordAssembler::new(),
            raw_text: String::new(),
            pending: String::new(),
        }
    }

    /// Append a chunk of text; complete lines are parsed immediately.
    #[wasm_bindgen]
    pub fn push(&mut self, chunk: &str) {
        self.raw_text.push_str(chunk);
        self.pending.push_str(chunk);

        while let Some(pos) = self.pending.find('\n') {
            let line: String = self.pending.drain(..=pos).collect();
            self.assembler.feed_line(&line);
        }
    }

    /// Title of the item currently being filled, if any.
    #[wasm_bindgen(js_name = currentItem)]
    pub fn current_item(&self) -> Option<String> {
        self.assembler.open_item().map(|item| item.title.clone())
    }

    /// Parse any trailing partial line and return the finished record.
    #[wasm_bindgen]
    pub fn finish(self) -> Result<JsValue, JsValue> {
        to_js(&self.into_record())
    }
}

impl StreamingParser {
    fn into_record(mut self) -> ParsedInvoice {
        if !self.pending.is_empty() {
            self.assembler.feed_line(&self.pending);
        }
        self.assembler.finish(&self.raw_text)
    }
}

impl Default for StreamingParser {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEXT: &str = "Invoice Number : 12\nItems:\nItem 1: Rod\nQty : 3\nItem 2: Pl";

    #[test]
    fn test_streaming_matches_one_shot() {
        let mut parser = StreamingParser::new();
        for chunk in ["Invoice Num", "ber : 12\nIt", "ems:\nItem 1: Rod\nQty : 3\n", "Item 2: Pl"] {
            parser.push(chunk);
        }
        assert_eq!(parser.current_item().as_deref(), Some("Item 1: Rod"));

        assert_eq!(parser.into_record(), parse_erp_text(TEXT));
    }

    #[test]
    fn test_json_output() {
        let json = parse_erp_text_json("A: 1").unwrap();
        assert!(json.starts_with(r#"{"header_fields":{"A":"1"}"#));
    }
}
