use chrono::{Datelike, Local};
use std::path::{Path, PathBuf};

/// Generate default export filename with format: {stem}-{kind}-{YYMMDD}.csv
pub fn generate_default_export_filename(source: &Path, exceeded_only: bool) -> PathBuf {
    let now = Local::now();
    let year = now.year() % 100; // Get last 2 digits of year
    let month = now.month();
    let day = now.day();

    let stem = source
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("export");
    let kind = if exceeded_only { "exceeded" } else { "filtered" };

    let filename = format!("{}-{}-{:02}{:02}{:02}.csv", stem, kind, year, month, day);
    PathBuf::from("exports").join(filename)
}
