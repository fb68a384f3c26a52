use crate::Result;
use std::fmt;

// ── ExtractElement ───────────────────────────────────────────────────────────

/// An element kind the Extract job can return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExtractElement {
    Text,
    Tables,
}

impl ExtractElement {
    /// The name the REST API uses in `elementsToExtract`.
    pub fn as_str(&self) -> &'static str {
        match self {
            ExtractElement::Text => "text",
            ExtractElement::Tables => "tables",
        }
    }

    /// Parse a wire name, ignoring case and surrounding whitespace.
    pub fn parse(name: &str) -> Option<Self> {
        let name = name.trim();
        if name.eq_ignore_ascii_case("text") {
            Some(ExtractElement::Text)
        } else if name.eq_ignore_ascii_case("tables") {
            Some(ExtractElement::Tables)
        } else {
            None
        }
    }
}

impl fmt::Display for ExtractElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Credentials and handles ──────────────────────────────────────────────────

/// OAuth server-to-server credentials issued for a PDF Services project.
#[derive(Clone, PartialEq, Eq)]
pub struct ServicePrincipalCredentials {
    pub client_id: String,
    pub client_secret: String,
}

impl ServicePrincipalCredentials {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }
}

// Keep the secret out of logs and panic messages.
impl fmt::Debug for ServicePrincipalCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServicePrincipalCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

/// A bearer token plus the API key that must accompany it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessToken {
    pub token: String,
    /// Sent as `x-api-key`; this is the client id.
    pub api_key: String,
}

/// Opaque reference to a submitted job (the status URL the service returned).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobHandle(pub String);

impl JobHandle {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ── ExtractionService ────────────────────────────────────────────────────────

/// The remote document-extraction service, as seen by [`crate::ExtractPipeline`].
///
/// [`crate::PdfServicesClient`] talks to the real REST API; tests substitute
/// their own implementation.
pub trait ExtractionService {
    /// Exchange credentials for an access token.
    fn authenticate(&self, credentials: &ServicePrincipalCredentials) -> Result<AccessToken>;

    /// Upload `pdf` and start an Extract job for `elements`.
    fn submit_extraction_job(
        &self,
        token: &AccessToken,
        pdf: &[u8],
        elements: &[ExtractElement],
    ) -> Result<JobHandle>;

    /// Block until the job finishes, then download its result archive.
    fn fetch_result(&self, token: &AccessToken, job: &JobHandle) -> Result<Vec<u8>>;
}
