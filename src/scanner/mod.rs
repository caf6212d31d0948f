pub mod workbook;

pub use workbook::{load_workbook, DecodeOptions};

use crate::error::{Result, VigilanceError};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug, Clone)]
pub struct WorkbookInfo {
    pub path: PathBuf,
    pub file_name: String,
}

const WORKBOOK_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xls", "xlsb", "ods"];

/// Excelが開いている間に作る一時ロックファイル
const LOCK_FILE_PREFIX: &str = "~$";

fn is_workbook_extension(ext: &str) -> bool {
    let lower = ext.to_lowercase();
    WORKBOOK_EXTENSIONS.contains(&lower.as_str())
}

pub fn scan_folder(folder: &Path, recursive: bool) -> Result<Vec<WorkbookInfo>> {
    if !folder.is_dir() {
        return Err(VigilanceError::FolderNotFound(folder.display().to_string()));
    }

    let max_depth = if recursive { usize::MAX } else { 1 };
    let mut books = Vec::new();

    for entry in WalkDir::new(folder)
        .max_depth(max_depth)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();

        if !path.is_file() {
            continue;
        }

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        if file_name.starts_with(LOCK_FILE_PREFIX) {
            continue;
        }

        if let Some(ext) = path.extension() {
            if is_workbook_extension(&ext.to_string_lossy()) {
                books.push(WorkbookInfo {
                    path: path.to_path_buf(),
                    file_name,
                });
            }
        }
    }

    // ファイル名でソート（同名はパスで安定化）
    books.sort_by(|a, b| a.file_name.cmp(&b.file_name).then_with(|| a.path.cmp(&b.path)));

    Ok(books)
}
