use crate::validator::PdfValidator;
use crate::{ExtractError, Result};
use std::io::ErrorKind;
use std::path::Path;

/// Read the input PDF into memory.
///
/// A missing file is reported as [`ExtractError::InputNotFound`]. The bytes
/// must start with `%PDF`; with `strict` they must also parse as a complete
/// document with at least one page.
///
/// ```no_run
/// let bytes = extractpdfjson::load_pdf("zoning.pdf", false).unwrap();
/// assert!(bytes.starts_with(b"%PDF"));
/// ```
pub fn load_pdf<P: AsRef<Path>>(path: P, strict: bool) -> Result<Vec<u8>> {
    let path = path.as_ref();

    let bytes = std::fs::read(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => ExtractError::InputNotFound(path.to_path_buf()),
        _ => ExtractError::IoError(e),
    })?;

    let validator = PdfValidator::new(&bytes);
    if strict {
        validator.validate_structure()?;
    } else {
        validator.validate_header()?;
    }

    log::info!("Loaded input PDF {} ({} bytes)", path.display(), bytes.len());
    Ok(bytes)
}
