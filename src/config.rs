use crate::{ExtractElement, ExtractError, ExtractorConfig, Result, ServicePrincipalCredentials};
use std::path::PathBuf;
use std::time::Duration;

pub const ENV_INPUT_PDF: &str = "EXTRACT_INPUT_PDF";
pub const ENV_CLIENT_ID: &str = "PDF_SERVICES_CLIENT_ID";
pub const ENV_CLIENT_SECRET: &str = "PDF_SERVICES_CLIENT_SECRET";
pub const ENV_BASE_URL: &str = "PDF_SERVICES_BASE_URL";
pub const ENV_OUTPUT_DIR: &str = "EXTRACT_OUTPUT_DIR";
pub const ENV_ELEMENTS: &str = "EXTRACT_ELEMENTS";
pub const ENV_POLL_INTERVAL_MS: &str = "EXTRACT_POLL_INTERVAL_MS";
pub const ENV_POLL_TIMEOUT_SECS: &str = "EXTRACT_POLL_TIMEOUT_SECS";
pub const ENV_STRICT_PDF: &str = "EXTRACT_STRICT_PDF";

/// Environment-driven construction for [`ExtractorConfig`].
impl ExtractorConfig {
    /// Build a configuration from the process environment.
    ///
    /// | variable | field |
    /// |---|---|
    /// | `EXTRACT_INPUT_PDF` | `input_path` |
    /// | `PDF_SERVICES_CLIENT_ID` + `PDF_SERVICES_CLIENT_SECRET` | `credentials` |
    /// | `PDF_SERVICES_BASE_URL` | `base_url` |
    /// | `EXTRACT_OUTPUT_DIR` | `output_root` |
    /// | `EXTRACT_ELEMENTS` (e.g. `text,tables`) | `elements` |
    /// | `EXTRACT_POLL_INTERVAL_MS` | `poll_interval` |
    /// | `EXTRACT_POLL_TIMEOUT_SECS` | `poll_timeout` |
    /// | `EXTRACT_STRICT_PDF` (`1` / `true`) | `strict_pdf_validation` |
    ///
    /// Unset or empty variables keep the [`Default`] value.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same rules as [`from_env`](Self::from_env), reading values through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = ExtractorConfig::default();

        if let Some(path) = get(ENV_INPUT_PDF) {
            config.input_path = Some(PathBuf::from(path));
        }

        config.credentials = match (get(ENV_CLIENT_ID), get(ENV_CLIENT_SECRET)) {
            (Some(id), Some(secret)) => Some(ServicePrincipalCredentials::new(id, secret)),
            (None, None) => None,
            (Some(_), None) => {
                return Err(ExtractError::Config(format!(
                    "{ENV_CLIENT_ID} is set but {ENV_CLIENT_SECRET} is not"
                )))
            }
            (None, Some(_)) => {
                return Err(ExtractError::Config(format!(
                    "{ENV_CLIENT_SECRET} is set but {ENV_CLIENT_ID} is not"
                )))
            }
        };

        if let Some(url) = get(ENV_BASE_URL) {
            config.base_url = url.trim().trim_end_matches('/').to_string();
        }

        if let Some(dir) = get(ENV_OUTPUT_DIR) {
            config.output_root = PathBuf::from(dir);
        }

        if let Some(list) = get(ENV_ELEMENTS) {
            config.elements = parse_elements(&list)?;
        }

        if let Some(ms) = get(ENV_POLL_INTERVAL_MS) {
            config.poll_interval = Duration::from_millis(parse_number(ENV_POLL_INTERVAL_MS, &ms)?);
        }

        if let Some(secs) = get(ENV_POLL_TIMEOUT_SECS) {
            config.poll_timeout = Duration::from_secs(parse_number(ENV_POLL_TIMEOUT_SECS, &secs)?);
        }

        if let Some(flag) = get(ENV_STRICT_PDF) {
            config.strict_pdf_validation = matches!(
                flag.trim().to_ascii_lowercase().as_str(),
                "1" | "true" | "yes" | "on"
            );
        }

        Ok(config)
    }
}

/// Parse a comma-separated element list such as `"text, TABLES"`.
///
/// Duplicates are dropped, first occurrence wins. An empty list or an unknown
/// name is an error.
pub fn parse_elements(list: &str) -> Result<Vec<ExtractElement>> {
    let mut elements = Vec::new();

    for name in list.split(',').filter(|n| !n.trim().is_empty()) {
        let element = ExtractElement::parse(name).ok_or_else(|| {
            ExtractError::Config(format!(
                "unknown element '{}' (expected 'text' or 'tables')",
                name.trim()
            ))
        })?;
        if !elements.contains(&element) {
            elements.push(element);
        }
    }

    if elements.is_empty() {
        return Err(ExtractError::Config("no elements to extract".into()));
    }

    Ok(elements)
}

fn parse_number(key: &str, value: &str) -> Result<u64> {
    value
        .trim()
        .parse()
        .map_err(|_| ExtractError::Config(format!("{key} must be a whole number, got '{value}'")))
}
