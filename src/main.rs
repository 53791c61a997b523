use clap::Parser;
use kata_etl::app::runner::{run_series, RunOptions, SeriesOutcome};
use kata_etl::config::toml_config::TomlConfig;
use kata_etl::domain::ports::SeriesJob;
use kata_etl::utils::error::{ErrorSeverity, Result};
use kata_etl::utils::logger;
use kata_etl::{CliConfig, HttpFetcher};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting kata-etl");
    tracing::debug!("CLI config: {:?}", cli);

    let options = RunOptions {
        force: cli.force,
        dry_run: cli.dry_run,
    };
    // 有配置文件時以 TOML 為準，否則使用命令行參數
    let result = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path);
            load_and_run(path, options).await
        }
        None => run_series(&cli, HttpFetcher::new(), options).await,
    };

    match result {
        Ok(outcomes) => report(&outcomes),
        Err(e) => {
            // 記錄詳細錯誤信息
            tracing::error!("Run failed: {} (Severity: {:?})", e, e.severity());
            // 輸出用戶友好的錯誤信息
            eprintln!("Error: {}", e);
            eprintln!("Suggestion: {}", e.recovery_suggestion());

            // 根據錯誤嚴重程度決定退出碼
            let exit_code = match e.severity() {
                ErrorSeverity::Low => 0,
                ErrorSeverity::Medium => 2, // 網絡錯誤，可重試
                ErrorSeverity::High => 1, // 頁面或數據錯誤
                ErrorSeverity::Critical => 3, // 系統錯誤
            };
            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}

async fn load_and_run(path: &str, options: RunOptions) -> Result<Vec<(SeriesJob, SeriesOutcome)>> {
    let config = TomlConfig::from_file(path)?;
    run_series(&config, HttpFetcher::new(), options).await
}

fn report(outcomes: &[(SeriesJob, SeriesOutcome)]) {
    for (job, outcome) in outcomes {
        match outcome {
            SeriesOutcome::Skipped => println!("File '{}' already exists", job.output),
            SeriesOutcome::Written(path) => println!("Output saved to: {}", path),
            SeriesOutcome::Planned(plans) => {
                for plan in plans {
                    println!("{} ({} kata rounds)", plan.draws_url, plan.round_urls.len());
                    for round_url in &plan.round_urls {
                        println!("  {}", round_url);
                    }
                }
            }
        }
    }
}
