use std::fs;
use std::path::Path;

use crate::error::{AuditError, Result};
use crate::utils::constants::CSV_EXTENSION;

/// List the CSV files available in the data folder, sorted by name
pub fn list_csv_files(dir: &Path) -> Result<Vec<String>> {
    if !dir.is_dir() {
        return Err(AuditError::DataFolderMissing(dir.to_path_buf()));
    }

    let mut files: Vec<String> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .filter(|entry| {
            let path = entry.path();
            path.is_file()
                && path
                    .extension()
                    .map(|ext| ext.eq_ignore_ascii_case(CSV_EXTENSION))
                    .unwrap_or(false)
        })
        .filter_map(|entry| entry.file_name().into_string().ok())
        .collect();

    if files.is_empty() {
        return Err(AuditError::NoFilesFound(dir.to_path_buf()));
    }

    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_missing_folder() {
        let result = list_csv_files(Path::new("/no/such/folder"));
        assert!(matches!(result, Err(AuditError::DataFolderMissing(_))));
    }

    #[test]
    fn test_empty_folder() {
        let dir = TempDir::new().unwrap();
        let result = list_csv_files(dir.path());
        assert!(matches!(result, Err(AuditError::NoFilesFound(_))));
    }

    #[test]
    fn test_lists_only_csv_sorted() -> Result<()> {
        let dir = TempDir::new().unwrap();
        for name in ["beta.csv", "alpha.CSV", "notes.txt"] {
            let mut f = File::create(dir.path().join(name))?;
            writeln!(f, "SID_LONG,SID_LAT")?;
        }

        let files = list_csv_files(dir.path())?;
        assert_eq!(files, vec!["alpha.CSV".to_string(), "beta.csv".to_string()]);

        Ok(())
    }
}
