//! Malware scanning against a remote HTTP scan service.

use async_trait::async_trait;
use serde::Deserialize;

use super::pipeline::FileValidator;
use super::types::{RejectionCategory, ValidationOutcome, ValidatorFault};

const NAME: &str = "virus_scan";

/// One entry of the scan service's JSON response.
#[derive(Debug, Clone, Deserialize)]
pub struct ScanReport {
    /// Scan verdict; `"OK"` means clean.
    #[serde(alias = "Result")]
    pub result: String,
    /// Signature name when malware was found.
    #[serde(default, alias = "Signature")]
    pub signature: Option<String>,
}

/// Posts the payload to a scan service and rejects on any non-clean
/// verdict.
///
/// Transport errors, non-success status codes and unparseable responses are
/// validator faults: the file is neither accepted nor rejected when the
/// scanner cannot be reached.
pub struct VirusScanValidator {
    client: reqwest::Client,
    url: String,
}

impl VirusScanValidator {
    /// Create a validator posting to the given scan endpoint.
    #[must_use]
    pub fn new(url: String) -> Self {
        Self::with_client(reqwest::Client::new(), url)
    }

    /// Create a validator with a preconfigured HTTP client.
    #[must_use]
    pub fn with_client(client: reqwest::Client, url: String) -> Self {
        Self { client, url }
    }

    fn verdict(
        filename: &str,
        reports: &[ScanReport],
    ) -> Result<ValidationOutcome, ValidatorFault> {
        if reports.is_empty() {
            return Err(ValidatorFault::new(
                NAME,
                "scan service returned an empty report",
            ));
        }

        let hit = reports
            .iter()
            .find(|report| !report.result.eq_ignore_ascii_case("ok"));
        match hit {
            None => Ok(ValidationOutcome::valid(filename)),
            Some(report) => {
                let reason = report.signature.as_ref().map_or_else(
                    || "malware detected by scan service".to_string(),
                    |signature| format!("malware detected: {signature}"),
                );
                Ok(ValidationOutcome::invalid(
                    filename,
                    reason,
                    RejectionCategory::VirusDetected,
                ))
            }
        }
    }
}

#[async_trait]
impl FileValidator for VirusScanValidator {
    fn name(&self) -> &'static str {
        NAME
    }

    async fn validate(
        &self,
        filename: &str,
        content: &[u8],
    ) -> Result<ValidationOutcome, ValidatorFault> {
        let response = self
            .client
            .post(&self.url)
            .body(content.to_vec())
            .send()
            .await
            .map_err(|e| ValidatorFault::new(NAME, e.to_string()))?
            .error_for_status()
            .map_err(|e| ValidatorFault::new(NAME, e.to_string()))?;

        let reports: Vec<ScanReport> = response
            .json()
            .await
            .map_err(|e| ValidatorFault::new(NAME, e.to_string()))?;

        Self::verdict(filename, &reports)
    }
}
