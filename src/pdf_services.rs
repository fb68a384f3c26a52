//! PDF Services REST client.
//!
//! Flow for one Extract job:
//!
//! 1. `POST /token` exchanges client id + secret for a bearer token.
//! 2. `POST /assets` reserves an asset and returns a pre-signed upload URI.
//! 3. `PUT <uploadUri>` sends the PDF bytes.
//! 4. `POST /operation/extractpdf` starts the job; the `Location` header is
//!    the job status URL.
//! 5. `GET <location>` is polled until `status` is `done` or `failed`.
//! 6. `GET <resource.downloadUri>` returns the result ZIP.

use crate::service::{AccessToken, ExtractElement, ExtractionService, JobHandle};
use crate::{ExtractError, ExtractorConfig, Result, ServicePrincipalCredentials};
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::{HeaderMap, CONTENT_TYPE, LOCATION, RETRY_AFTER};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

const PDF_MEDIA_TYPE: &str = "application/pdf";
const USER_AGENT: &str = concat!("extractpdfjson/", env!("CARGO_PKG_VERSION"));

// ── Wire types ───────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AssetRequest<'a> {
    media_type: &'a str,
}

#[derive(Debug, Deserialize)]
struct AssetResponse {
    #[serde(rename = "uploadUri")]
    upload_uri: String,
    #[serde(rename = "assetID")]
    asset_id: String,
}

#[derive(Debug, Serialize)]
struct ExtractJobRequest<'a> {
    #[serde(rename = "assetID")]
    asset_id: &'a str,
    #[serde(rename = "elementsToExtract")]
    elements_to_extract: Vec<&'static str>,
}

#[derive(Debug, Deserialize)]
struct JobStatusResponse {
    status: String,
    resource: Option<ResultAsset>,
    error: Option<ServiceError>,
}

#[derive(Debug, Deserialize)]
struct ResultAsset {
    #[serde(rename = "downloadUri")]
    download_uri: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ServiceError {
    code: Option<String>,
    message: Option<String>,
}

/// Error bodies come in two shapes: `{"error": {"code", "message"}}` from the
/// API and `{"error_code", "message"}` from the token endpoint.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<ServiceError>,
    error_code: Option<String>,
    message: Option<String>,
}

impl ServiceError {
    fn describe(&self) -> String {
        match (&self.code, &self.message) {
            (Some(code), Some(msg)) => format!("{code}: {msg}"),
            (None, Some(msg)) => msg.clone(),
            (Some(code), None) => code.clone(),
            (None, None) => "no details".to_string(),
        }
    }
}

// ── PdfServicesClient ────────────────────────────────────────────────────────

/// Blocking client for the PDF Services Extract API.
///
/// ```no_run
/// use extractpdfjson::{ExtractElement, ExtractionService, ExtractorConfig,
///                      PdfServicesClient, ServicePrincipalCredentials};
///
/// let client = PdfServicesClient::new(&ExtractorConfig::default()).unwrap();
/// let creds = ServicePrincipalCredentials::new("id", "secret");
/// let token = client.authenticate(&creds).unwrap();
/// let pdf = std::fs::read("zoning.pdf").unwrap();
/// let job = client
///     .submit_extraction_job(&token, &pdf, &[ExtractElement::Text])
///     .unwrap();
/// let zip = client.fetch_result(&token, &job).unwrap();
/// ```
pub struct PdfServicesClient {
    http: Client,
    base_url: String,
    poll_interval: Duration,
    poll_timeout: Duration,
}

impl PdfServicesClient {
    /// Build a client from the endpoint and timing settings in `config`.
    pub fn new(config: &ExtractorConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.request_timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            poll_interval: config.poll_interval,
            poll_timeout: config.poll_timeout,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn authorized(&self, request: RequestBuilder, token: &AccessToken) -> RequestBuilder {
        request
            .bearer_auth(&token.token)
            .header("x-api-key", &token.api_key)
    }

    fn upload_asset(&self, token: &AccessToken, pdf: &[u8]) -> Result<String> {
        let response = self
            .authorized(self.http.post(self.endpoint("assets")), token)
            .json(&AssetRequest {
                media_type: PDF_MEDIA_TYPE,
            })
            .send()?;
        let asset: AssetResponse = parse_json(check_status(response)?)?;

        log::debug!("Uploading {} bytes as asset {}", pdf.len(), asset.asset_id);
        let response = self
            .http
            .put(&asset.upload_uri)
            .header(CONTENT_TYPE, PDF_MEDIA_TYPE)
            .body(pdf.to_vec())
            .send()?;
        check_status(response)?;

        Ok(asset.asset_id)
    }

    /// Poll the job until it leaves the in-progress state, returning the
    /// result archive's download URI.
    fn wait_for_job(&self, token: &AccessToken, job: &JobHandle) -> Result<String> {
        let started = Instant::now();

        loop {
            let response = self
                .authorized(self.http.get(job.as_str()), token)
                .send()?;
            let response = check_status(response)?;
            let asked = retry_after(response.headers());
            let status: JobStatusResponse = parse_json(response)?;

            log::debug!("Job {} status: {}", job, status.status);

            match status.status.as_str() {
                "done" => {
                    return status
                        .resource
                        .and_then(|r| r.download_uri)
                        .ok_or_else(|| {
                            ExtractError::fault(None, "job finished without a result asset")
                        });
                }
                "failed" => {
                    let detail = status
                        .error
                        .map(|e| e.describe())
                        .unwrap_or_else(|| "no details".to_string());
                    return Err(ExtractError::fault(None, format!("Extract job failed: {detail}")));
                }
                _ => {}
            }

            let elapsed = started.elapsed();
            if elapsed >= self.poll_timeout {
                return Err(ExtractError::fault(
                    None,
                    format!(
                        "Extract job timed out after {:.1}s",
                        elapsed.as_secs_f64()
                    ),
                ));
            }

            let remaining = self.poll_timeout - elapsed;
            let wait = match asked {
                Some(asked) if asked > remaining => {
                    return Err(ExtractError::fault(
                        None,
                        format!(
                            "service asked to retry in {}s, past the {}s poll deadline",
                            asked.as_secs(),
                            self.poll_timeout.as_secs()
                        ),
                    ));
                }
                Some(asked) => asked,
                None => self.poll_interval.min(remaining),
            };
            std::thread::sleep(wait);
        }
    }
}

impl ExtractionService for PdfServicesClient {
    fn authenticate(&self, credentials: &ServicePrincipalCredentials) -> Result<AccessToken> {
        let response = self
            .http
            .post(self.endpoint("token"))
            .form(&[
                ("client_id", credentials.client_id.as_str()),
                ("client_secret", credentials.client_secret.as_str()),
            ])
            .send()?;
        let body: TokenResponse = parse_json(check_status(response)?)?;

        log::debug!("Authenticated client {}", credentials.client_id);
        Ok(AccessToken {
            token: body.access_token,
            api_key: credentials.client_id.clone(),
        })
    }

    fn submit_extraction_job(
        &self,
        token: &AccessToken,
        pdf: &[u8],
        elements: &[ExtractElement],
    ) -> Result<JobHandle> {
        if elements.is_empty() {
            return Err(ExtractError::Config("no elements to extract".into()));
        }

        let asset_id = self.upload_asset(token, pdf)?;

        let request = ExtractJobRequest {
            asset_id: &asset_id,
            elements_to_extract: elements.iter().map(ExtractElement::as_str).collect(),
        };
        let response = self
            .authorized(self.http.post(self.endpoint("operation/extractpdf")), token)
            .json(&request)
            .send()?;
        let response = check_status(response)?;

        let location = response
            .headers()
            .get(LOCATION)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
            .ok_or_else(|| {
                ExtractError::fault(
                    Some(response.status().as_u16()),
                    "job accepted without a Location header",
                )
            })?;

        log::info!("Extract job submitted: {location}");
        Ok(JobHandle(location.to_string()))
    }

    fn fetch_result(&self, token: &AccessToken, job: &JobHandle) -> Result<Vec<u8>> {
        let download_uri = self.wait_for_job(token, job)?;

        let response = self.http.get(&download_uri).send()?;
        let bytes = check_status(response)?.bytes()?;

        log::debug!("Downloaded result archive ({} bytes)", bytes.len());
        Ok(bytes.to_vec())
    }
}

// ── Response helpers ─────────────────────────────────────────────────────────

/// Pass 2xx responses through; map everything else to a typed error.
fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().unwrap_or_default();
    let message = error_message(&body).unwrap_or_else(|| {
        if body.trim().is_empty() {
            status.to_string()
        } else {
            body.trim().to_string()
        }
    });

    Err(match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ExtractError::AuthFailed(message),
        StatusCode::TOO_MANY_REQUESTS => ExtractError::QuotaExceeded(message),
        _ => ExtractError::fault(Some(status.as_u16()), message),
    })
}

fn error_message(body: &str) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_str(body).ok()?;
    if let Some(error) = parsed.error {
        return Some(error.describe());
    }
    match (parsed.error_code, parsed.message) {
        (Some(code), Some(msg)) => Some(format!("{code}: {msg}")),
        (None, Some(msg)) => Some(msg),
        (Some(code), None) => Some(code),
        (None, None) => None,
    }
}

fn parse_json<T: serde::de::DeserializeOwned>(response: Response) -> Result<T> {
    let bytes = response.bytes()?;
    Ok(serde_json::from_slice(&bytes)?)
}

fn retry_after(headers: &HeaderMap) -> Option<Duration> {
    headers
        .get(RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
        .map(Duration::from_secs)
}
