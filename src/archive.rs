use crate::{ExtractError, Result};
use std::fs::File;
use std::io::{Read, Seek};
use std::path::Path;
use zip::ZipArchive;

/// Name suffix of the member that holds the extracted structure.
pub const STRUCTURED_DATA_SUFFIX: &str = "structuredData.json";

/// Index of the first entry, in stored order, whose name ends with
/// `structuredData.json`. Directory entries are ignored; an unreadable entry
/// is an error.
pub fn find_structured_json<R>(archive: &mut ZipArchive<R>) -> Result<Option<usize>>
where
    R: Read + Seek,
{
    for i in 0..archive.len() {
        let entry = archive.by_index_raw(i)?;
        if entry.is_dir() {
            continue;
        }
        if entry.name().ends_with(STRUCTURED_DATA_SUFFIX) {
            return Ok(Some(i));
        }
    }
    Ok(None)
}

/// Copy the `structuredData.json` member of the ZIP at `zip_path` to `dest`.
///
/// The member's decompressed bytes are written verbatim, replacing `dest` if
/// it exists. Returns the number of bytes written. When the archive has no
/// matching member, [`ExtractError::ArchiveMemberMissing`] is returned and
/// `dest` is left untouched.
pub fn extract_structured_json<P, Q>(zip_path: P, dest: Q) -> Result<u64>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let zip_path = zip_path.as_ref();
    let mut archive = ZipArchive::new(File::open(zip_path)?)?;

    let index = find_structured_json(&mut archive)?
        .ok_or_else(|| ExtractError::ArchiveMemberMissing(zip_path.display().to_string()))?;

    let mut member = archive.by_index(index)?;
    log::debug!("Found {} in {}", member.name(), zip_path.display());

    let mut out = File::create(dest.as_ref())?;
    let written = std::io::copy(&mut member, &mut out)?;
    Ok(written)
}
