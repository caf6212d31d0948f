use crate::error::{Result, VigilanceError};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use vigilance_common::export::pdf_core::DEFAULT_REPORT_TITLE;
use vigilance_common::{KeywordProfile, PRIMARY_SHEET_NAME};

/// キーワードプロファイルのパスを上書きする環境変数
pub const KEYWORDS_ENV: &str = "VIGILANCE_KEYWORDS";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 主データシート名
    pub primary_sheet: String,
    /// 各シートの1行目を見出しとして読み飛ばす
    pub skip_header_row: bool,
    /// 追加キーワードのJSONファイル
    pub keyword_profile: Option<PathBuf>,
    /// PDFレポートのタイトル
    pub report_title: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            primary_sheet: PRIMARY_SHEET_NAME.into(),
            skip_header_row: true,
            keyword_profile: None,
            report_title: DEFAULT_REPORT_TITLE.into(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| VigilanceError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("vigilance").join("config.json"))
    }

    /// 有効なキーワードプロファイルのパス
    ///
    /// 優先順位: 引数 > 環境変数 > 設定ファイル
    pub fn keyword_profile_path(&self, cli_override: Option<&std::path::Path>) -> Option<PathBuf> {
        if let Some(path) = cli_override {
            return Some(path.to_path_buf());
        }
        if let Ok(path) = std::env::var(KEYWORDS_ENV) {
            if !path.trim().is_empty() {
                return Some(PathBuf::from(path));
            }
        }
        self.keyword_profile.clone()
    }

    /// キーワードプロファイルを読み込む（指定が無ければ組み込みのみ）
    pub fn load_keyword_profile(&self, cli_override: Option<&std::path::Path>) -> Result<KeywordProfile> {
        match self.keyword_profile_path(cli_override) {
            Some(path) => {
                if !path.exists() {
                    return Err(VigilanceError::FileNotFound(path.display().to_string()));
                }
                Ok(KeywordProfile::from_file(&path)?)
            }
            None => Ok(KeywordProfile::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.primary_sheet, "Data Sheet");
        assert!(config.skip_header_row);
        assert!(config.keyword_profile.is_none());
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: Config = serde_json::from_str(r#"{"primary_sheet": "Financials"}"#).unwrap();
        assert_eq!(config.primary_sheet, "Financials");
        assert!(config.skip_header_row);
        assert_eq!(config.report_title, DEFAULT_REPORT_TITLE);
    }

    #[test]
    fn test_cli_override_wins() {
        let config = Config {
            keyword_profile: Some(PathBuf::from("from-config.json")),
            ..Default::default()
        };
        let path = config.keyword_profile_path(Some(std::path::Path::new("cli.json")));
        assert_eq!(path, Some(PathBuf::from("cli.json")));
    }

    #[test]
    fn test_missing_profile_file() {
        let config = Config::default();
        let err = config
            .load_keyword_profile(Some(std::path::Path::new("/nonexistent/profile-12345.json")))
            .unwrap_err();
        assert!(matches!(err, VigilanceError::FileNotFound(_)));
    }
}
