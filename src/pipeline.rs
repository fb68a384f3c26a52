use crate::archive::extract_structured_json;
use crate::input::load_pdf;
use crate::output::{json_output_path, zip_output_path};
use crate::service::ExtractionService;
use crate::{ExtractError, ExtractorConfig, Result};
use chrono::{DateTime, Local};
use std::path::PathBuf;

/// Where a successful run left its files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractOutcome {
    /// The raw result archive as downloaded.
    pub zip_path: PathBuf,
    /// The standalone copy of `structuredData.json`.
    pub json_path: PathBuf,
    /// Size of the JSON file in bytes.
    pub json_bytes: u64,
}

/// Runs one PDF through the extraction service and unpacks the result.
///
/// Steps, in order: load the input, authenticate, upload and submit the job,
/// wait for and download the archive, write it to disk, copy out
/// `structuredData.json`. The first failing step ends the run with its error.
pub struct ExtractPipeline<S> {
    service: S,
    config: ExtractorConfig,
}

impl<S: ExtractionService> ExtractPipeline<S> {
    pub fn new(service: S, config: ExtractorConfig) -> Self {
        Self { service, config }
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    /// Run the pipeline, stamping output files with the current local time.
    pub fn run(&self) -> Result<ExtractOutcome> {
        self.run_at(&Local::now())
    }

    /// Run the pipeline, stamping output files with `now`.
    pub fn run_at(&self, now: &DateTime<Local>) -> Result<ExtractOutcome> {
        let input_path = self.config.input_path.as_ref().ok_or_else(|| {
            ExtractError::Config("no input PDF given (set EXTRACT_INPUT_PDF)".into())
        })?;
        let credentials = self.config.credentials.as_ref().ok_or_else(|| {
            ExtractError::Config(
                "no credentials (set PDF_SERVICES_CLIENT_ID and PDF_SERVICES_CLIENT_SECRET)".into(),
            )
        })?;
        if self.config.elements.is_empty() {
            return Err(ExtractError::Config("no elements to extract".into()));
        }

        let pdf = load_pdf(input_path, self.config.strict_pdf_validation)?;

        let token = self.service.authenticate(credentials)?;
        let job = self
            .service
            .submit_extraction_job(&token, &pdf, &self.config.elements)?;
        drop(pdf);

        let archive = self.service.fetch_result(&token, &job)?;

        let zip_path = zip_output_path(&self.config.output_root, now)?;
        std::fs::write(&zip_path, &archive)?;
        drop(archive);
        log::info!("Extract output ZIP saved to: {}", zip_path.display());

        let json_path = json_output_path(&self.config.output_root, now)?;
        let json_bytes = extract_structured_json(&zip_path, &json_path)?;
        log::info!("structuredData.json extracted to: {}", json_path.display());

        Ok(ExtractOutcome {
            zip_path,
            json_path,
            json_bytes,
        })
    }
}
