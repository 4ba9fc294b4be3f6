//! HTTP clients for the remote OCR and text-generation services.

mod azure;
mod openrouter;

pub use azure::AzureDocumentClient;
pub use openrouter::OpenRouterClient;

use erpscan_core::models::config::{Credentials, ErpScanConfig};
use erpscan_core::InvoicePipeline;

/// Pipeline wired to the hosted providers.
pub type RemotePipeline = InvoicePipeline<AzureDocumentClient, OpenRouterClient>;

/// Build the pipeline from config plus environment credentials.
pub fn build_pipeline(config: &ErpScanConfig) -> anyhow::Result<RemotePipeline> {
    let credentials = Credentials::from_env(config)?;

    let ocr = AzureDocumentClient::new(&config.ocr, &credentials.azure_endpoint, &credentials.azure_key)?;
    let structurer = OpenRouterClient::new(&config.structuring, &credentials.openrouter_key)?;

    Ok(InvoicePipeline::new(ocr, structurer, config))
}

fn user_agent() -> String {
    format!("erpscan-cli/{}", env!("CARGO_PKG_VERSION"))
}
