//! フォルダ一括解析
//!
//! 各ワークブックは独立しているので rayon で並列に解析する。
//! 結果は入力順のまま返し、失敗したファイルもバッチを止めずに記録する。

use super::{analyze_file, AnalysisOptions};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::path::PathBuf;
use tracing::warn;
use vigilance_common::ForensicRecord;

/// 1ファイル分の結果
#[derive(Debug, Clone)]
pub struct BatchEntry {
    pub path: PathBuf,
    pub outcome: std::result::Result<ForensicRecord, String>,
}

impl BatchEntry {
    pub fn record(&self) -> Option<&ForensicRecord> {
        self.outcome.as_ref().ok()
    }
}

pub fn analyze_batch(paths: &[PathBuf], options: &AnalysisOptions, show_progress: bool) -> Vec<BatchEntry> {
    let progress = if show_progress {
        let bar = ProgressBar::new(paths.len() as u64);
        if let Ok(style) = ProgressStyle::with_template("  {bar:30} {pos}/{len} {wide_msg}") {
            bar.set_style(style);
        }
        bar
    } else {
        ProgressBar::hidden()
    };

    let entries: Vec<BatchEntry> = paths
        .par_iter()
        .map(|path| {
            let outcome = analyze_file(path, None, options).map_err(|e| {
                warn!(file = %path.display(), error = %e, "workbook skipped");
                e.to_string()
            });
            progress.inc(1);
            BatchEntry {
                path: path.clone(),
                outcome,
            }
        })
        .collect();

    progress.finish_and_clear();
    entries
}
