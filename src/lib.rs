//! # extractpdfjson
//!
//! Send a local PDF through the PDF Services Extract API and keep the
//! `structuredData.json` it produces.
//!
//! ## What this crate does
//!
//! 1. **Load the input** — reads the PDF into memory and checks it starts
//!    with a PDF header (optionally a full structural parse).
//! 2. **Run the extraction job** — authenticates with service-principal
//!    credentials, uploads the bytes, submits an Extract job for text and/or
//!    tables and waits for it to finish.
//! 3. **Save the result archive** — writes the downloaded ZIP to
//!    `output/ExtractPDF/extract_<timestamp>.zip`.
//! 4. **Unpack the JSON** — copies the `structuredData.json` member to
//!    `output/ExtractPDF/json/structuredData_<timestamp>.json`.
//!
//! ## Quick example
//!
//! ```no_run
//! use extractpdfjson::{ExtractPipeline, ExtractorConfig, PdfServicesClient};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ExtractorConfig::from_env()?;
//! let client = PdfServicesClient::new(&config)?;
//!
//! let outcome = ExtractPipeline::new(client, config).run()?;
//! println!("archive : {}", outcome.zip_path.display());
//! println!("json    : {} ({} bytes)", outcome.json_path.display(), outcome.json_bytes);
//! # Ok(())
//! # }
//! ```

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

mod archive;
mod config;
mod input;
mod output;
mod pdf_services;
mod pipeline;
mod service;
mod validator;

pub use archive::{extract_structured_json, find_structured_json, STRUCTURED_DATA_SUFFIX};
pub use config::parse_elements;
pub use input::load_pdf;
pub use output::{json_output_path, timestamp, zip_output_path};
pub use pdf_services::PdfServicesClient;
pub use pipeline::{ExtractOutcome, ExtractPipeline};
pub use service::{
    AccessToken, ExtractElement, ExtractionService, JobHandle, ServicePrincipalCredentials,
};

// ── Configuration ────────────────────────────────────────────────────────────

/// Default PDF Services endpoint.
pub const DEFAULT_BASE_URL: &str = "https://pdf-services.adobe.io";

/// Default directory that receives the result archive (and `json/` below it).
pub const DEFAULT_OUTPUT_ROOT: &str = "output/ExtractPDF";

/// Runtime configuration for [`ExtractPipeline`] and [`PdfServicesClient`].
///
/// Usually built with [`ExtractorConfig::from_env`]; see that function for the
/// variables it reads.
#[derive(Debug, Clone)]
pub struct ExtractorConfig {
    /// The PDF to send. Required by [`ExtractPipeline::run`].
    pub input_path: Option<PathBuf>,

    /// Service-principal credentials. Required by [`ExtractPipeline::run`].
    pub credentials: Option<ServicePrincipalCredentials>,

    /// Base URL of the PDF Services REST API, without a trailing slash.
    pub base_url: String,

    /// Directory for the result archive; the JSON lands in `<output_root>/json`.
    pub output_root: PathBuf,

    /// Which element kinds the Extract job should return.
    pub elements: Vec<ExtractElement>,

    /// Wait between job status polls when the service sends no `Retry-After`.
    pub poll_interval: Duration,

    /// Give up on a job that has not finished after this long.
    pub poll_timeout: Duration,

    /// Per-request HTTP timeout.
    pub request_timeout: Duration,

    /// When `true`, the input must parse as a complete PDF document, not just
    /// carry a `%PDF` header.
    pub strict_pdf_validation: bool,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            input_path: None,
            credentials: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            output_root: PathBuf::from(DEFAULT_OUTPUT_ROOT),
            elements: vec![ExtractElement::Text, ExtractElement::Tables],
            poll_interval: Duration::from_millis(2000),
            poll_timeout: Duration::from_secs(600),
            request_timeout: Duration::from_secs(60),
            strict_pdf_validation: false,
        }
    }
}

// ── Error type ───────────────────────────────────────────────────────────────

/// Every error that this crate can produce.
#[derive(Error, Debug)]
pub enum ExtractError {
    /// The input PDF does not exist.
    #[error("Input file not found: {}", .0.display())]
    InputNotFound(PathBuf),

    /// The input bytes are not a PDF.
    #[error("Invalid PDF: {0}")]
    InvalidPdf(String),

    /// The service rejected the credentials or the access token (HTTP 401/403).
    #[error("Authentication failed: {0}")]
    AuthFailed(String),

    /// The account's usage quota or rate limit was hit (HTTP 429).
    #[error("Usage quota exceeded: {0}")]
    QuotaExceeded(String),

    /// The service answered with an error, a failed job, or a malformed reply.
    #[error("{}", fault_message(.status, .message))]
    RemoteServiceFault {
        status: Option<u16>,
        message: String,
    },

    /// The result archive has no entry ending in `structuredData.json`.
    #[error("structuredData.json not found in Extract output ZIP: {0}")]
    ArchiveMemberMissing(String),

    /// Configuration is missing or malformed.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A filesystem I/O error occurred.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// The result archive could not be read as a ZIP.
    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// The HTTP transport failed (connect, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The lopdf parser rejected the input during strict validation.
    #[error("PDF parse error: {0}")]
    ParseError(#[from] lopdf::Error),

    /// A service response body was not the JSON we expected.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

fn fault_message(status: &Option<u16>, message: &str) -> String {
    match status {
        Some(code) => format!("PDF Services fault (HTTP {code}): {message}"),
        None => format!("PDF Services fault: {message}"),
    }
}

impl ExtractError {
    /// Returns `true` for failures reported by, or on the way to, the remote
    /// service: authentication, quota, service faults and HTTP transport.
    ///
    /// Everything else (missing input, bad archive, local I/O, config) is a
    /// local failure.
    pub fn is_service_error(&self) -> bool {
        matches!(
            self,
            ExtractError::AuthFailed(_)
                | ExtractError::QuotaExceeded(_)
                | ExtractError::RemoteServiceFault { .. }
                | ExtractError::Http(_)
        )
    }

    pub(crate) fn fault(status: Option<u16>, message: impl Into<String>) -> Self {
        ExtractError::RemoteServiceFault {
            status,
            message: message.into(),
        }
    }
}

/// Convenience alias used throughout this crate.
pub type Result<T> = std::result::Result<T, ExtractError>;
