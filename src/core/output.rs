use crate::utils::error::Result;
use chrono::NaiveDate;
use std::fs;
use std::path::{Path, PathBuf};

pub const DATA_DIR: &str = "data";

pub fn default_file_name(date: NaiveDate) -> String {
    format!("cause_list_{}.pdf", date.format("%Y-%m-%d"))
}

/// Directory holding the running executable; `data/` is created beside it.
pub fn program_dir() -> Result<PathBuf> {
    let exe = std::env::current_exe()?;
    Ok(exe
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(".")))
}

/// Creates `<base_dir>/data` if needed and returns it.
pub fn ensure_data_dir(base_dir: &Path) -> Result<PathBuf> {
    let dir = base_dir.join(DATA_DIR);
    fs::create_dir_all(&dir)?;
    Ok(dir)
}

pub fn resolve_output_path(out: Option<&Path>, base_dir: &Path, today: NaiveDate) -> PathBuf {
    match out {
        Some(path) => path.to_path_buf(),
        None => base_dir.join(DATA_DIR).join(default_file_name(today)),
    }
}

pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_path_is_date_stamped() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        let path = resolve_output_path(None, Path::new("/opt/tool"), today);
        assert_eq!(
            path,
            Path::new("/opt/tool").join("data").join("cause_list_2024-03-07.pdf")
        );
    }

    #[test]
    fn test_explicit_out_wins() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        let path = resolve_output_path(Some(Path::new("reports/today.pdf")), Path::new("/opt/tool"), today);
        assert_eq!(path, PathBuf::from("reports/today.pdf"));
    }

    #[test]
    fn test_ensure_dirs() {
        let dir = TempDir::new().unwrap();
        let data = ensure_data_dir(dir.path()).unwrap();
        assert!(data.is_dir());
        assert!(data.ends_with("data"));

        let nested = dir.path().join("a").join("b").join("list.pdf");
        ensure_parent_dir(&nested).unwrap();
        assert!(dir.path().join("a").join("b").is_dir());

        // Bare file names have no parent to create.
        ensure_parent_dir(Path::new("list.pdf")).unwrap();
    }
}
