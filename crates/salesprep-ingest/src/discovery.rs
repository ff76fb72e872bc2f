//! Source file discovery under a lab-scoped raw folder.

use std::path::{Component, Path, PathBuf};

use crate::error::{IngestError, Result};

/// Workbook extensions, compared case-insensitively.
pub const WORKBOOK_EXTENSIONS: [&str; 5] = ["xls", "xlsx", "xlsm", "xlsb", "ods"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Csv,
    Workbook,
}

/// A discovered input file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: PathBuf,
    pub kind: SourceKind,
    /// First folder below the raw root, i.e. `<raw>/<lab_folder>/...`.
    pub lab_folder: Option<String>,
    /// Folders between the lab folder and the file; empty when the file sits
    /// directly in its lab folder.
    pub subfolder: PathBuf,
}

impl SourceFile {
    /// File stem used for output names.
    pub fn stem(&self) -> String {
        self.path
            .file_stem()
            .and_then(|v| v.to_str())
            .unwrap_or("table")
            .to_string()
    }
}

/// Classifies a path by extension.
pub fn source_kind(path: &Path) -> Option<SourceKind> {
    let ext = path.extension().and_then(|ext| ext.to_str())?;
    if ext.eq_ignore_ascii_case("csv") {
        Some(SourceKind::Csv)
    } else if WORKBOOK_EXTENSIONS
        .iter()
        .any(|candidate| ext.eq_ignore_ascii_case(candidate))
    {
        Some(SourceKind::Workbook)
    } else {
        None
    }
}

/// Lab folder of `path` relative to `root`, when the file sits in a subfolder.
pub fn lab_folder(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let mut components = relative.components();
    let first = components.next()?;
    // A file directly under the root has no lab folder.
    components.next()?;
    match first {
        Component::Normal(name) => name.to_str().map(str::to_string),
        _ => None,
    }
}

/// Folders between the lab folder and the file name.
pub fn lab_subfolder(root: &Path, path: &Path) -> PathBuf {
    let Ok(relative) = path.strip_prefix(root) else {
        return PathBuf::new();
    };
    let mut components: Vec<Component<'_>> = relative.components().collect();
    if components.len() < 3 {
        return PathBuf::new();
    }
    components.pop();
    components.into_iter().skip(1).collect()
}

/// Lists CSV and workbook files below `root`, recursively, sorted by path.
///
/// Office lock files (`~$name.xlsx`) are skipped.
pub fn discover_sources(root: &Path) -> Result<Vec<SourceFile>> {
    if !root.is_dir() {
        return Err(IngestError::DirectoryNotFound {
            path: root.to_path_buf(),
        });
    }
    let mut paths = Vec::new();
    walk(root, &mut paths)?;
    paths.sort();

    Ok(paths
        .into_iter()
        .filter_map(|path| {
            let kind = source_kind(&path)?;
            let lab_folder = lab_folder(root, &path);
            let subfolder = lab_subfolder(root, &path);
            Some(SourceFile {
                path,
                kind,
                lab_folder,
                subfolder,
            })
        })
        .collect())
}

/// Lists CSV files below `root`, recursively, sorted by path.
pub fn list_csv_files(root: &Path) -> Result<Vec<PathBuf>> {
    Ok(discover_sources(root)?
        .into_iter()
        .filter(|source| source.kind == SourceKind::Csv)
        .map(|source| source.path)
        .collect())
}

fn walk(dir: &Path, out: &mut Vec<PathBuf>) -> Result<()> {
    let entries = std::fs::read_dir(dir).map_err(|e| IngestError::DirectoryRead {
        path: dir.to_path_buf(),
        source: e,
    })?;
    for entry_result in entries {
        let entry = entry_result.map_err(|e| IngestError::DirectoryRead {
            path: dir.to_path_buf(),
            source: e,
        })?;
        let path = entry.path();
        if path.is_dir() {
            walk(&path, out)?;
            continue;
        }
        let is_lock_file = path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.starts_with("~$"));
        if path.is_file() && !is_lock_file {
            out.push(path);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lab_folder_is_first_component() {
        let root = Path::new("data/sales");
        assert_eq!(
            lab_folder(root, Path::new("data/sales/leca/2024/a.csv")),
            Some("leca".to_string())
        );
        assert_eq!(lab_folder(root, Path::new("data/sales/a.csv")), None);
        assert_eq!(lab_folder(root, Path::new("elsewhere/a.csv")), None);
    }

    #[test]
    fn subfolder_sits_between_lab_folder_and_file() {
        let root = Path::new("data/sales");
        assert_eq!(
            lab_subfolder(root, Path::new("data/sales/leca/2024/q1/a.csv")),
            PathBuf::from("2024/q1")
        );
        assert_eq!(
            lab_subfolder(root, Path::new("data/sales/leca/a.csv")),
            PathBuf::new()
        );
        assert_eq!(lab_subfolder(root, Path::new("data/sales/a.csv")), PathBuf::new());
    }

    #[test]
    fn discovered_files_carry_their_subfolder() {
        let dir = tempfile::tempdir().expect("tempdir");
        let nested = dir.path().join("leca").join("2023");
        std::fs::create_dir_all(&nested).expect("mkdir");
        std::fs::write(nested.join("report.csv"), "a\n1\n").expect("write");
        std::fs::write(dir.path().join("leca").join("jan.csv"), "a\n1\n").expect("write");

        let files = discover_sources(dir.path()).expect("discover");
        assert_eq!(files.len(), 2);
        assert_eq!(files[0].subfolder, PathBuf::from("2023"));
        assert_eq!(files[1].subfolder, PathBuf::new());
        assert!(files.iter().all(|file| file.lab_folder.as_deref() == Some("leca")));
    }

    #[test]
    fn source_kind_is_case_insensitive() {
        assert_eq!(source_kind(Path::new("A.CSV")), Some(SourceKind::Csv));
        assert_eq!(source_kind(Path::new("b.Xlsx")), Some(SourceKind::Workbook));
        assert_eq!(source_kind(Path::new("c.ods")), Some(SourceKind::Workbook));
        assert_eq!(source_kind(Path::new("notes.txt")), None);
        assert_eq!(source_kind(Path::new("README")), None);
    }

    #[test]
    fn missing_root_is_an_error() {
        assert!(matches!(
            discover_sources(Path::new("/definitely/not/here")),
            Err(IngestError::DirectoryNotFound { .. })
        ));
    }
}
