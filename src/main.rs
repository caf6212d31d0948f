use clap::Parser;
use std::path::{Path, PathBuf};
use vigilance_common::Severity;
use vigilance_rust::{analyzer, cli, config, error, export, logging, scanner};
use analyzer::AnalysisOptions;
use cli::{Cli, Commands};
use config::Config;
use error::Result;

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);
    let config = Config::load()?;

    match cli.command {
        Commands::Analyze { workbook, output, sheet, name, keywords } => {
            println!("🔍 vigilance - フォレンジック分析\n");

            println!("[1/2] ワークブックを解析中...");
            let options = AnalysisOptions::from_config(&config, sheet.as_deref(), keywords.as_deref())?;
            let record = analyzer::analyze_file(&workbook, name.as_deref(), &options)?;
            println!("✔ {}: {} (レッドフラグ {}件)\n", record.name, record.earnings_manipulation_signal, record.red_flags);

            println!("[2/2] 結果を保存中...");
            let output = output.unwrap_or_else(|| PathBuf::from(format!("{}.json", export::report_stem(&record.name))));
            export::write_json(&record, &output)?;
            println!("✔ 結果を保存: {}", output.display());

            println!("\n✅ 解析完了");
        }

        Commands::Export { input, format, output, title } => {
            println!("📄 vigilance - エクスポート\n");

            let records = read_records(&input)?;
            let output_dir = output.unwrap_or_else(|| PathBuf::from("."));
            let title = title.unwrap_or_else(|| config.report_title.clone());

            export::export_records(&records, &format, &output_dir, &title)?;

            println!("\n✅ エクスポート完了");
        }

        Commands::Run { workbook, format, output, sheet, name, keywords } => {
            println!("🚀 vigilance - 一括処理\n");

            println!("[1/2] ワークブックを解析中...");
            let options = AnalysisOptions::from_config(&config, sheet.as_deref(), keywords.as_deref())?;
            let record = analyzer::analyze_file(&workbook, name.as_deref(), &options)?;
            println!("✔ {}: {} (レッドフラグ {}件)\n", record.name, record.earnings_manipulation_signal, record.red_flags);

            println!("[2/2] エクスポート中...");
            let output_dir = output.unwrap_or_else(|| parent_dir(&workbook));
            export::export_record(&record, &format, &output_dir, &config.report_title)?;

            println!("\n✅ 完了");
        }

        Commands::Inspect { workbook, sheet, keywords } => {
            let options = AnalysisOptions::from_config(&config, sheet.as_deref(), keywords.as_deref())?;
            let entries = analyzer::inspect_file(&workbook, &options)?;

            match entries.first().and_then(|e| e.sheet.as_deref()) {
                Some(name) => println!("主データシート: {}\n", name),
                None => println!("シートがありません\n"),
            }

            for entry in &entries {
                let mode = match entry.item.aggregation() {
                    vigilance_common::Aggregation::Sum => "合計",
                    vigilance_common::Aggregation::Single => "最初の行",
                };
                println!("{} ({}) [{}]", entry.item.label(), entry.item, mode);
                if entry.matches.is_empty() {
                    println!("  (該当行なし → 0)");
                }
                for m in &entry.matches {
                    println!("  行{} 列{}: {} = {}", m.row + 1, m.column + 1, m.label, m.value);
                }
            }
        }

        Commands::Batch { folder, recursive, output, keywords } => {
            println!("📚 vigilance - フォルダ一括解析\n");

            println!("[1/3] ワークブックをスキャン中...");
            let books = scanner::scan_folder(&folder, recursive)?;
            println!("✔ {}件のワークブックを検出\n", books.len());

            if books.is_empty() {
                return Err(error::VigilanceError::NoWorkbooksFound(folder.display().to_string()));
            }

            println!("[2/3] 解析中...");
            let options = AnalysisOptions::from_config(&config, None, keywords.as_deref())?;
            let paths: Vec<PathBuf> = books.into_iter().map(|b| b.path).collect();
            let entries = analyzer::analyze_batch(&paths, &options, !cli.verbose);

            let mut records = Vec::new();
            for entry in &entries {
                match &entry.outcome {
                    Ok(record) => {
                        println!("  {} {:<4} {}", signal_mark(record), record.earnings_manipulation_signal, record.name);
                        records.push(record.clone());
                    }
                    Err(e) => println!("  ✘ {}: {}", entry.path.display(), e),
                }
            }
            println!("✔ {}/{}件を解析\n", records.len(), entries.len());

            println!("[3/3] サマリーを保存中...");
            let output_dir = output.unwrap_or_else(|| folder.clone());
            let (json_path, excel_path) = export::export_summary(&records, &output_dir)?;
            println!("✔ JSON出力: {}", json_path.display());
            println!("✔ Excel出力: {}", excel_path.display());

            println!("\n✅ 完了");
        }

        Commands::Config { show, set_sheet, set_keywords, skip_header } => {
            let mut config = config;
            let mut changed = false;

            if let Some(sheet) = set_sheet {
                config.primary_sheet = sheet;
                changed = true;
            }
            if let Some(path) = set_keywords {
                // 保存前に検証
                vigilance_common::KeywordProfile::from_file(&path)?;
                config.keyword_profile = Some(path);
                changed = true;
            }
            if let Some(skip) = skip_header {
                config.skip_header_row = skip;
                changed = true;
            }

            if changed {
                config.save()?;
                println!("✔ 設定を保存しました: {}", Config::config_path()?.display());
            }

            if show || !changed {
                println!("設定:");
                println!("  主データシート: {}", config.primary_sheet);
                println!("  見出し行スキップ: {}", config.skip_header_row);
                println!(
                    "  キーワードファイル: {}",
                    config
                        .keyword_profile_path(None)
                        .map(|p| p.display().to_string())
                        .unwrap_or_else(|| "未設定".to_string())
                );
                println!("  レポートタイトル: {}", config.report_title);
            }
        }
    }

    Ok(())
}

/// JSONファイルから1件または配列のレコードを読み込む
fn read_records(input: &Path) -> Result<Vec<vigilance_common::ForensicRecord>> {
    if !input.exists() {
        return Err(error::VigilanceError::FileNotFound(input.display().to_string()));
    }
    let content = std::fs::read_to_string(input)?;
    let value: serde_json::Value = serde_json::from_str(&content)?;
    let records = if value.is_array() {
        serde_json::from_value(value)?
    } else {
        vec![serde_json::from_value(value)?]
    };
    Ok(records)
}

fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

fn signal_mark(record: &vigilance_common::ForensicRecord) -> &'static str {
    let critical = vigilance_common::assess(record)
        .iter()
        .any(|a| a.severity == Severity::Critical);
    match (record.earnings_manipulation_signal, critical) {
        (vigilance_common::Signal::High, _) => "⚠",
        (_, true) => "△",
        _ => "✔",
    }
}
