//! Excel生成（CLI版）
//!
//! ブックの内容は共通ライブラリで生成し、ここではファイルへ書き出す。

use crate::error::{Result, VigilanceError};
use std::path::Path;
use vigilance_common::export::excel_core::generate_summary_buffer;
use vigilance_common::ForensicRecord;

pub fn generate_excel(records: &[ForensicRecord], output_path: &Path) -> Result<()> {
    let buffer = generate_summary_buffer(records)
        .map_err(|e| VigilanceError::ExcelGeneration(e.to_string()))?;

    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(output_path, buffer)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_excel_writes_zip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.xlsx");
        let records = vec![ForensicRecord {
            name: "ACME".into(),
            ..Default::default()
        }];

        generate_excel(&records, &path).unwrap();
        assert!(std::fs::read(&path).unwrap().starts_with(b"PK"));
    }
}
