use crate::{ExtractError, Result};
use lopdf::Document;

// ── PdfValidator ──────────────────────────────────────────────────────────────
//
// Internal type. The input loader runs the header check on every load and the
// structural check only when strict validation is enabled.

pub(crate) const PDF_MAGIC: &[u8] = b"%PDF";

/// Readers accept the header anywhere in the first 1024 bytes.
const HEADER_SEARCH_WINDOW: usize = 1024;

pub(crate) struct PdfValidator<'a> {
    bytes: &'a [u8],
}

impl<'a> PdfValidator<'a> {
    pub(crate) fn new(bytes: &'a [u8]) -> Self {
        Self { bytes }
    }

    /// Cheap check: the `%PDF` marker appears within the first 1024 bytes,
    /// so a BOM or other leading junk is tolerated.
    pub(crate) fn validate_header(&self) -> Result<()> {
        if self.bytes.is_empty() {
            return Err(ExtractError::InvalidPdf("file is empty".into()));
        }
        let window = &self.bytes[..self.bytes.len().min(HEADER_SEARCH_WINDOW)];
        if !window.windows(PDF_MAGIC.len()).any(|w| w == PDF_MAGIC) {
            return Err(ExtractError::InvalidPdf("missing %PDF header".into()));
        }
        Ok(())
    }

    /// Full check: lopdf must parse the cross-reference table and object
    /// graph, and the catalog, a page and the trailer must be present.
    pub(crate) fn validate_structure(&self) -> Result<()> {
        self.validate_header()?;

        let document = Document::load_mem(self.bytes)?;

        document
            .catalog()
            .map_err(|e| ExtractError::InvalidPdf(format!("missing or invalid catalog: {e}")))?;

        if document.get_pages().is_empty() {
            return Err(ExtractError::InvalidPdf("document has no pages".into()));
        }

        if document.trailer.is_empty() {
            return Err(ExtractError::InvalidPdf("missing trailer dictionary".into()));
        }

        Ok(())
    }
}
