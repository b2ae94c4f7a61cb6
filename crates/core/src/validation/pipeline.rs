//! Fan-out/fan-in validation pipeline.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use futures::future;

use crate::config::ValidationConfig;

use super::content_type::FileTypeValidator;
use super::error::ValidationError;
use super::pdf::PdfStructureValidator;
use super::size::FileSizeValidator;
use super::types::{RejectionCategory, ValidationOutcome, ValidatorFault};
use super::virus::VirusScanValidator;

/// A single content validator.
///
/// Validators are independent and side-effect-free on the stored object;
/// they may call out to external services but must not persist anything.
#[async_trait]
pub trait FileValidator: Send + Sync {
    /// Validator name, used in fault reports.
    fn name(&self) -> &'static str;

    /// Check `(filename, content)` and return a verdict. An `Err` means the
    /// validator itself could not run, which is not the same as an
    /// `Invalid` verdict.
    async fn validate(
        &self,
        filename: &str,
        content: &[u8],
    ) -> Result<ValidationOutcome, ValidatorFault>;
}

/// Runs every configured validator concurrently against an incoming file.
///
/// All validators are started at once and all are awaited; rejections are
/// aggregated across the whole set. Validators run as detached tasks, so a
/// caller that gives up on the surrounding operation does not cut a remote
/// scan call short.
pub struct ValidationPipeline {
    validators: Vec<Arc<dyn FileValidator>>,
}

impl ValidationPipeline {
    /// Create a pipeline over the given validators.
    #[must_use]
    pub fn new(validators: Vec<Arc<dyn FileValidator>>) -> Self {
        Self { validators }
    }

    /// Build the standard validator set from configuration.
    #[must_use]
    pub fn from_config(config: &ValidationConfig) -> Self {
        let mut validators: Vec<Arc<dyn FileValidator>> = vec![
            Arc::new(FileTypeValidator::new(config.allowed_types.clone())),
            Arc::new(FileSizeValidator::new(config.max_file_size)),
            Arc::new(PdfStructureValidator::new()),
        ];
        if let Some(url) = &config.scan_url {
            validators.push(Arc::new(VirusScanValidator::new(url.clone())));
        }
        Self::new(validators)
    }

    /// Number of configured validators.
    pub fn len(&self) -> usize {
        self.validators.len()
    }

    /// Whether the pipeline has no validators.
    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }

    /// Validate a file against every validator.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::Rejected`] when one or more validators
    /// reject the content, with every rejection included, or
    /// [`ValidationError::Execution`] when any validator fails to run.
    pub async fn run(&self, filename: &str, content: &Bytes) -> Result<(), ValidationError> {
        let handles: Vec<_> = self
            .validators
            .iter()
            .map(|validator| {
                let validator = Arc::clone(validator);
                let filename = filename.to_owned();
                let content = content.clone();
                tokio::spawn(async move { validator.validate(&filename, &content).await })
            })
            .collect();

        let joined = future::join_all(handles).await;

        let mut reasons: BTreeMap<RejectionCategory, String> = BTreeMap::new();
        for result in joined {
            let outcome = result.map_err(|e| ValidationError::Execution(e.to_string()))??;
            if let ValidationOutcome::Invalid {
                reason, category, ..
            } = outcome
            {
                reasons
                    .entry(category)
                    .and_modify(|existing| {
                        existing.push_str("; ");
                        existing.push_str(&reason);
                    })
                    .or_insert(reason);
            }
        }

        if reasons.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::Rejected {
                filename: filename.to_owned(),
                reasons,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StaticValidator {
        name: &'static str,
        outcome: Result<ValidationOutcome, ValidatorFault>,
        delay_ms: u64,
    }

    impl StaticValidator {
        fn valid(name: &'static str) -> Arc<dyn FileValidator> {
            Arc::new(Self {
                name,
                outcome: Ok(ValidationOutcome::valid("f")),
                delay_ms: 0,
            })
        }

        fn invalid(
            name: &'static str,
            reason: &str,
            category: RejectionCategory,
            delay_ms: u64,
        ) -> Arc<dyn FileValidator> {
            Arc::new(Self {
                name,
                outcome: Ok(ValidationOutcome::invalid("f", reason, category)),
                delay_ms,
            })
        }

        fn faulty(name: &'static str) -> Arc<dyn FileValidator> {
            Arc::new(Self {
                name,
                outcome: Err(ValidatorFault::new(name, "scan service unreachable")),
                delay_ms: 0,
            })
        }
    }

    #[async_trait]
    impl FileValidator for StaticValidator {
        fn name(&self) -> &'static str {
            self.name
        }

        async fn validate(
            &self,
            _filename: &str,
            _content: &[u8],
        ) -> Result<ValidationOutcome, ValidatorFault> {
            if self.delay_ms > 0 {
                tokio::time::sleep(std::time::Duration::from_millis(self.delay_ms)).await;
            }
            match &self.outcome {
                Ok(outcome) => Ok(outcome.clone()),
                Err(fault) => Err(ValidatorFault::new(fault.validator, fault.message.clone())),
            }
        }
    }

    #[tokio::test]
    async fn test_empty_pipeline_passes() {
        let pipeline = ValidationPipeline::new(Vec::new());
        assert!(pipeline.is_empty());
        pipeline
            .run("f", &Bytes::from_static(b"x"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_all_valid_passes() {
        let pipeline =
            ValidationPipeline::new(vec![StaticValidator::valid("a"), StaticValidator::valid("b")]);
        pipeline
            .run("f", &Bytes::from_static(b"x"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_aggregates_all_rejections() {
        // The slower validator finishes last; its category must still be
        // present alongside the fast one's.
        let pipeline = ValidationPipeline::new(vec![
            StaticValidator::invalid("virus", "has malware", RejectionCategory::VirusDetected, 20),
            StaticValidator::invalid("type", "bad type", RejectionCategory::UnsupportedType, 0),
            StaticValidator::valid("ok"),
        ]);

        let err = pipeline
            .run("f", &Bytes::from_static(b"x"))
            .await
            .unwrap_err();
        let ValidationError::Rejected { filename, reasons } = err else {
            panic!("expected rejection");
        };
        assert_eq!(filename, "f");
        assert_eq!(
            reasons.get(&RejectionCategory::VirusDetected).map(String::as_str),
            Some("has malware")
        );
        assert_eq!(
            reasons.get(&RejectionCategory::UnsupportedType).map(String::as_str),
            Some("bad type")
        );
    }

    #[tokio::test]
    async fn test_duplicate_categories_merge_reasons() {
        let pipeline = ValidationPipeline::new(vec![
            StaticValidator::invalid("a", "first", RejectionCategory::MalformedDocument, 0),
            StaticValidator::invalid("b", "second", RejectionCategory::MalformedDocument, 10),
        ]);

        let err = pipeline
            .run("f", &Bytes::from_static(b"x"))
            .await
            .unwrap_err();
        let ValidationError::Rejected { reasons, .. } = err else {
            panic!("expected rejection");
        };
        let merged = reasons
            .get(&RejectionCategory::MalformedDocument)
            .unwrap();
        assert!(merged.contains("first"));
        assert!(merged.contains("second"));
    }

    #[tokio::test]
    async fn test_fault_is_fatal_and_distinct_from_rejection() {
        let pipeline = ValidationPipeline::new(vec![
            StaticValidator::invalid("type", "bad type", RejectionCategory::UnsupportedType, 0),
            StaticValidator::faulty("virus"),
        ]);

        let err = pipeline
            .run("f", &Bytes::from_static(b"x"))
            .await
            .unwrap_err();
        assert!(matches!(err, ValidationError::Execution(_)));
    }

    #[tokio::test]
    async fn test_from_config_without_scan_url() {
        let pipeline = ValidationPipeline::from_config(&ValidationConfig::default());
        // type + size + pdf, no virus scan
        assert_eq!(pipeline.len(), 3);
    }

    #[tokio::test]
    async fn test_from_config_with_scan_url() {
        let config = ValidationConfig {
            scan_url: Some("http://localhost:8090/scan".to_string()),
            ..ValidationConfig::default()
        };
        let pipeline = ValidationPipeline::from_config(&config);
        assert_eq!(pipeline.len(), 4);
    }
}
