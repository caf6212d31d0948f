//! ログ初期化
//!
//! 進捗表示は標準出力（println!）、診断ログは tracing で標準エラーへ。
//! `RUST_LOG` が設定されていればそちらを優先する。

use tracing_subscriber::EnvFilter;

/// 既定のフィルタ文字列
pub fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        "vigilance_rust=debug,vigilance_common=debug"
    } else {
        "warn"
    }
}

/// グローバルsubscriberを設定（2回目以降は無視）
pub fn init(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
