mod batch;

pub use batch::{analyze_batch, BatchEntry};

use crate::config::Config;
use crate::error::Result;
use crate::scanner::{load_workbook, DecodeOptions};
use std::path::Path;
use tracing::info;
use vigilance_common::{analyze_workbook, locate_all, ForensicRecord, KeywordProfile, LineItem, LineMatch};

/// 1回のCLI実行で共有する解析設定
#[derive(Debug, Clone)]
pub struct AnalysisOptions {
    pub primary_sheet: String,
    pub profile: KeywordProfile,
    pub decode: DecodeOptions,
}

impl AnalysisOptions {
    /// 設定ファイルとCLI引数から組み立てる（引数が優先）
    pub fn from_config(
        config: &Config,
        sheet_override: Option<&str>,
        keywords_override: Option<&Path>,
    ) -> Result<Self> {
        Ok(Self {
            primary_sheet: sheet_override
                .map(str::to_string)
                .unwrap_or_else(|| config.primary_sheet.clone()),
            profile: config.load_keyword_profile(keywords_override)?,
            decode: DecodeOptions {
                skip_header_row: config.skip_header_row,
            },
        })
    }
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            primary_sheet: vigilance_common::PRIMARY_SHEET_NAME.to_string(),
            profile: KeywordProfile::default(),
            decode: DecodeOptions::default(),
        }
    }
}

/// ファイル名から企業名を取り出す（最初の '.' まで）
pub fn entity_name_from_path(path: &Path) -> String {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    match file_name.split_once('.') {
        Some((stem, _)) => stem.to_string(),
        None => file_name,
    }
}

/// ワークブック1件を解析
pub fn analyze_file(
    path: &Path,
    name_override: Option<&str>,
    options: &AnalysisOptions,
) -> Result<ForensicRecord> {
    let workbook = load_workbook(path, options.decode)?;
    let entity_name = name_override
        .map(str::to_string)
        .unwrap_or_else(|| entity_name_from_path(path));

    info!(file = %path.display(), sheets = workbook.len(), "workbook loaded");

    Ok(analyze_workbook(
        &workbook,
        &options.primary_sheet,
        &entity_name,
        &options.profile,
    ))
}

/// 項目ごとのマッチ結果
#[derive(Debug, Clone)]
pub struct InspectEntry {
    pub item: LineItem,
    /// 主データシート名（シートが無い場合は None）
    pub sheet: Option<String>,
    pub matches: Vec<LineMatch>,
}

/// 各項目がどの行にマッチしたかを調べる
pub fn inspect_file(path: &Path, options: &AnalysisOptions) -> Result<Vec<InspectEntry>> {
    let workbook = load_workbook(path, options.decode)?;
    let primary = workbook.primary_sheet(&options.primary_sheet);

    Ok(LineItem::ALL
        .iter()
        .map(|&item| {
            let keywords = options.profile.keywords_for(item);
            InspectEntry {
                item,
                sheet: primary.map(|(name, _)| name.to_string()),
                matches: primary
                    .map(|(_, sheet)| locate_all(sheet, &keywords))
                    .unwrap_or_default(),
            }
        })
        .collect())
}
