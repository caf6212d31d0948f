use thiserror::Error;

#[derive(Error, Debug)]
pub enum VigilanceError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("フォルダが見つかりません: {0}")]
    FolderNotFound(String),

    #[error("ワークブックを読み込めません: {0}")]
    WorkbookOpen(String),

    #[error("ワークブックが見つかりません: {0}")]
    NoWorkbooksFound(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF生成エラー: {0}")]
    PdfGeneration(String),

    #[error("Excel生成エラー: {0}")]
    ExcelGeneration(String),

    #[error(transparent)]
    Common(#[from] vigilance_common::Error),
}

pub type Result<T> = std::result::Result<T, VigilanceError>;
