//! Azure Document Intelligence client (REST, layout model, text output).

use std::path::Path;
use std::time::Duration;

use reqwest::header::{CONTENT_TYPE, HeaderValue};
use serde::Deserialize;
use tracing::{debug, trace};

use erpscan_core::models::config::OcrConfig;
use erpscan_core::{OcrError, OcrProvider};

const KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";
const OPERATION_LOCATION: &str = "Operation-Location";

/// Client for the asynchronous analyze operation.
pub struct AzureDocumentClient {
    client: reqwest::Client,
    analyze_url: String,
    key: String,
    poll_interval: Duration,
    max_polls: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnalyzeOperation {
    status: String,
    #[serde(default)]
    analyze_result: Option<AnalyzeResult>,
    #[serde(default)]
    error: Option<ServiceError>,
}

#[derive(Debug, Deserialize)]
struct AnalyzeResult {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ServiceError {
    #[serde(default)]
    code: String,
    #[serde(default)]
    message: String,
}

impl AzureDocumentClient {
    pub fn new(config: &OcrConfig, endpoint: &str, key: &str) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(super::user_agent())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            analyze_url: analyze_url(endpoint, &config.model_id, &config.api_version),
            key: key.to_string(),
            poll_interval: Duration::from_millis(config.poll_interval_ms),
            max_polls: config.max_polls,
        })
    }

    async fn submit(&self, document: Vec<u8>) -> Result<String, OcrError> {
        let response = self
            .client
            .post(&self.analyze_url)
            .header(KEY_HEADER, &self.key)
            .header(CONTENT_TYPE, HeaderValue::from_static("application/pdf"))
            .body(document)
            .send()
            .await
            .map_err(request_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(OcrError::Request(format!("HTTP {}: {}", status, body)));
        }

        response
            .headers()
            .get(OPERATION_LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .ok_or_else(|| OcrError::Request("missing Operation-Location header".to_string()))
    }

    async fn poll(&self, operation_url: &str) -> Result<String, OcrError> {
        for attempt in 1..=self.max_polls {
            let response = self
                .client
                .get(operation_url)
                .header(KEY_HEADER, &self.key)
                .send()
                .await
                .map_err(request_error)?;

            let status = response.status();
            if !status.is_success() {
                return Err(OcrError::Request(format!("HTTP {} while polling", status)));
            }

            let operation: AnalyzeOperation = response.json().await.map_err(request_error)?;
            trace!("Poll {}: status {}", attempt, operation.status);

            match operation.status.as_str() {
                "succeeded" => {
                    return Ok(operation
                        .analyze_result
                        .and_then(|r| r.content)
                        .unwrap_or_default());
                }
                "failed" | "canceled" => {
                    let detail = operation
                        .error
                        .map(|e| format!("{}: {}", e.code, e.message))
                        .unwrap_or_else(|| operation.status.clone());
                    return Err(OcrError::AnalysisFailed(detail));
                }
                _ => tokio::time::sleep(self.poll_interval).await,
            }
        }

        Err(OcrError::Timeout(self.max_polls))
    }
}

impl OcrProvider for AzureDocumentClient {
    async fn analyze(&self, path: &Path) -> Result<String, OcrError> {
        let document = tokio::fs::read(path)
            .await
            .map_err(|e| OcrError::Request(format!("failed to read {}: {}", path.display(), e)))?;

        debug!("Submitting {} bytes for layout analysis", document.len());
        let operation_url = self.submit(document).await?;
        self.poll(&operation_url).await
    }
}

fn analyze_url(endpoint: &str, model_id: &str, api_version: &str) -> String {
    format!(
        "{}/documentintelligence/documentModels/{}:analyze?api-version={}&outputContentFormat=text",
        endpoint.trim_end_matches('/'),
        model_id,
        api_version
    )
}

fn request_error(err: reqwest::Error) -> OcrError {
    OcrError::Request(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_analyze_url() {
        assert_eq!(
            analyze_url("https://demo.cognitiveservices.azure.com/", "prebuilt-layout", "2024-11-30"),
            "https://demo.cognitiveservices.azure.com/documentintelligence/documentModels/prebuilt-layout:analyze?api-version=2024-11-30&outputContentFormat=text"
        );
    }

    #[test]
    fn test_operation_deserialization() {
        let json = r#"{
            "status": "succeeded",
            "createdDateTime": "2024-01-01T00:00:00Z",
            "analyzeResult": { "apiVersion": "2024-11-30", "content": "TAX INVOICE" }
        }"#;
        let operation: AnalyzeOperation = serde_json::from_str(json).unwrap();
        assert_eq!(operation.status, "succeeded");
        assert_eq!(
            operation.analyze_result.and_then(|r| r.content).as_deref(),
            Some("TAX INVOICE")
        );

        let json = r#"{"status": "failed", "error": {"code": "InvalidContent", "message": "corrupt"}}"#;
        let operation: AnalyzeOperation = serde_json::from_str(json).unwrap();
        assert_eq!(operation.error.map(|e| e.code).as_deref(), Some("InvalidContent"));
    }
}
