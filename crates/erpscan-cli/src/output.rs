//! Rendering of parsed records.

use erpscan_core::models::invoice::{ExtractionResponse, FieldMap, ParsedInvoice};

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output (one row per field)
    Csv,
    /// Aligned ERP text layout
    Text,
}

impl OutputFormat {
    /// File extension used when writing to a directory.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

/// Render a bare record.
pub fn format_record(record: &ParsedInvoice, format: OutputFormat, pretty: bool) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json if pretty => Ok(serde_json::to_string_pretty(record)?),
        OutputFormat::Json => Ok(serde_json::to_string(record)?),
        OutputFormat::Csv => format_csv(record),
        OutputFormat::Text => Ok(format_text(record)),
    }
}

/// Render an extraction response; JSON keeps the timing envelope.
pub fn format_response(response: &ExtractionResponse, format: OutputFormat, pretty: bool) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json if pretty => Ok(serde_json::to_string_pretty(response)?),
        OutputFormat::Json => Ok(serde_json::to_string(response)?),
        _ => format_record(&response.data, format, pretty),
    }
}

fn format_csv(record: &ParsedInvoice) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(["section", "item", "label", "value"])?;

    for (label, value) in &record.header_fields {
        wtr.write_record(["header", "", label.as_str(), value.as_str()])?;
    }
    for item in &record.items {
        for (label, value) in &item.fields {
            wtr.write_record(["item", item.title.as_str(), label.as_str(), value.as_str()])?;
        }
    }
    for (label, value) in &record.additional_fields {
        wtr.write_record(["additional", "", label.as_str(), value.as_str()])?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(record: &ParsedInvoice) -> String {
    let mut output = String::new();

    push_fields(&mut output, &record.header_fields, "");

    if !record.items.is_empty() {
        if !output.is_empty() {
            output.push('\n');
        }
        output.push_str("Items:\n");
        for item in &record.items {
            output.push_str(&item.title);
            output.push('\n');
            push_fields(&mut output, &item.fields, "  ");
        }
    }

    if !record.additional_fields.is_empty() {
        if !output.is_empty() {
            output.push('\n');
        }
        output.push_str("Additional Fields:\n");
        push_fields(&mut output, &record.additional_fields, "  ");
    }

    output
}

fn push_fields(output: &mut String, fields: &FieldMap, indent: &str) {
    let width = fields.keys().map(|k| k.chars().count()).max().unwrap_or(0);
    for (label, value) in fields {
        output.push_str(&format!("{}{:<width$} : {}\n", indent, label, value, width = width));
    }
}
