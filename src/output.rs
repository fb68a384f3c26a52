//! Timestamped output locations.
//!
//! Both files of a run carry the same second-resolution timestamp, so two runs
//! started within the same second write to the same paths and the later run
//! overwrites the earlier one.

use crate::Result;
use chrono::{DateTime, TimeZone};
use std::fmt::Display;
use std::path::{Path, PathBuf};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H-%M-%S";

/// Format `now` as `YYYY-MM-DDTHH-MM-SS`.
pub fn timestamp<Tz>(now: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    now.format(TIMESTAMP_FORMAT).to_string()
}

/// `<root>/extract_<timestamp>.zip`. Creates `root` if it is missing.
pub fn zip_output_path<Tz>(root: &Path, now: &DateTime<Tz>) -> Result<PathBuf>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    std::fs::create_dir_all(root)?;
    Ok(root.join(format!("extract_{}.zip", timestamp(now))))
}

/// `<root>/json/structuredData_<timestamp>.json`. Creates `root/json` if it
/// is missing.
pub fn json_output_path<Tz>(root: &Path, now: &DateTime<Tz>) -> Result<PathBuf>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let dir = root.join("json");
    std::fs::create_dir_all(&dir)?;
    Ok(dir.join(format!("structuredData_{}.json", timestamp(now))))
}
