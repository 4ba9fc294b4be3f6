//! Prompt sent to the text-generation provider.

const INSTRUCTIONS: &str = r#"You are an ERP data formatter for invoice processing.

Your job is to extract relevant information from the raw OCR invoice text and organize it in a visually aligned, human-readable ERP format.

Strict Rules:
- Only use the data exactly as it appears in the OCR text below. Do not invent, infer, or guess anything.
- If any standard field is missing, leave it out entirely.
- Ensure clean spacing and alignment for professional ERP display.
- Ignore noisy OCR symbols, special characters, scanner tags, or repeated junk.
- Keep section order natural, based on how fields appear in the original text.
- Group and align item lines under "Items:" with consistent indentation and spacing.

---

Output Format (Text Only, No JSON, No Markdown):

Company Name     : [if found]
GSTIN            : [if found]
Invoice Number   : [if found]
Invoice Date     : [if found]
Delivery Address : [if found]
Billing Address  : [if found]
Vehicle Number   : [if found]
Total Weight     : [if found]

Items:
Item 1:
  Description : ...
  Quantity    : ...
  Unit        : ...
  Weight      : ...
  Rate        : ...
  Amount      : ...
  HSN Code    : ...

Item 2:
  Description : ...
  Quantity    : ...
  Unit        : ...
  Weight      : ...
  Rate        : ...
  Amount      : ...
  HSN Code    : ...

Additional Fields:
  Field Label : Value
  Field Label : Value

---

OCR Raw Text:
"#;

/// Build the formatting instruction for the given OCR text.
pub fn build_prompt(ocr_text: &str) -> String {
    let mut prompt = String::with_capacity(INSTRUCTIONS.len() + ocr_text.len() + 1);
    prompt.push_str(INSTRUCTIONS);
    prompt.push_str(ocr_text);
    prompt.push('\n');
    prompt
}
