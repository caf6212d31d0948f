use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "vigilance")]
#[command(about = "財務諸表ワークブックの利益品質フォレンジック分析ツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// ワークブックを解析してJSONを出力
    Analyze {
        /// ワークブックのパス
        #[arg(required = true)]
        workbook: PathBuf,

        /// 出力JSONファイル（デフォルト: Forensic_Report_<企業名>.json）
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// 主データシート名
        #[arg(long)]
        sheet: Option<String>,

        /// 企業名（デフォルト: ファイル名）
        #[arg(short, long)]
        name: Option<String>,

        /// 追加キーワードのJSONファイル
        #[arg(short, long)]
        keywords: Option<PathBuf>,
    },

    /// 解析結果JSONからPDF/Excelを生成
    Export {
        /// 入力JSONファイル（1件または配列）
        #[arg(required = true)]
        input: PathBuf,

        /// 出力形式 (pdf/excel/json/both)
        #[arg(short, long, default_value = "both")]
        format: ExportFormat,

        /// 出力ディレクトリ
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// レポートタイトル（デフォルト: 設定値）
        #[arg(short, long)]
        title: Option<String>,
    },

    /// 解析からPDF/Excel出力まで一括実行
    Run {
        /// ワークブックのパス
        #[arg(required = true)]
        workbook: PathBuf,

        /// 出力形式 (pdf/excel/json/both)
        #[arg(short, long, default_value = "pdf")]
        format: ExportFormat,

        /// 出力ディレクトリ
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// 主データシート名
        #[arg(long)]
        sheet: Option<String>,

        /// 企業名（デフォルト: ファイル名）
        #[arg(short, long)]
        name: Option<String>,

        /// 追加キーワードのJSONファイル
        #[arg(short, long)]
        keywords: Option<PathBuf>,
    },

    /// 各項目がどの行にマッチしたかを表示
    Inspect {
        /// ワークブックのパス
        #[arg(required = true)]
        workbook: PathBuf,

        /// 主データシート名
        #[arg(long)]
        sheet: Option<String>,

        /// 追加キーワードのJSONファイル
        #[arg(short, long)]
        keywords: Option<PathBuf>,
    },

    /// フォルダ内のワークブックを一括解析
    Batch {
        /// ワークブックフォルダのパス
        #[arg(required = true)]
        folder: PathBuf,

        /// サブフォルダも再帰的にスキャン
        #[arg(short = 'r', long)]
        recursive: bool,

        /// 出力ディレクトリ（デフォルト: 入力フォルダ）
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// 追加キーワードのJSONファイル
        #[arg(short, long)]
        keywords: Option<PathBuf>,
    },

    /// 設定を表示/編集
    Config {
        /// 設定を表示
        #[arg(long)]
        show: bool,

        /// 主データシート名を設定
        #[arg(long)]
        set_sheet: Option<String>,

        /// キーワードファイルを設定
        #[arg(long)]
        set_keywords: Option<PathBuf>,

        /// 1行目を見出しとして読み飛ばすか
        #[arg(long)]
        skip_header: Option<bool>,
    },
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ExportFormat {
    Pdf,
    Excel,
    Json,
    #[default]
    Both,
}

impl ExportFormat {
    pub fn includes_pdf(&self) -> bool {
        matches!(self, ExportFormat::Pdf | ExportFormat::Both)
    }

    pub fn includes_excel(&self) -> bool {
        matches!(self, ExportFormat::Excel | ExportFormat::Both)
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pdf" => Ok(ExportFormat::Pdf),
            "excel" | "xlsx" => Ok(ExportFormat::Excel),
            "json" => Ok(ExportFormat::Json),
            "both" => Ok(ExportFormat::Both),
            _ => Err(format!("Unknown format: {}. Use pdf, excel, json, or both", s)),
        }
    }
}
