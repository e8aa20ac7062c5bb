use clap::Parser;
use coinbase_liquidation::core::executor::ExecutorOptions;
use coinbase_liquidation::core::report::{print_summary, Reporter};
use coinbase_liquidation::core::{ConfigProvider, RunMode};
use coinbase_liquidation::utils::{logger, validation::Validate};
use coinbase_liquidation::{
    CliConfig, CoinbaseClient, Credentials, EngineSettings, LiquidationEngine, LiquidationError,
    LiquidationSettings, LocalStorage, TerminalConfirmation,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(config.verbose, config.log_file())?;

    tracing::info!("Starting coinbase-liquidation CLI");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    match run(&config).await {
        Ok(()) => {
            println!("\n✅ Liquidation process completed successfully!");
            Ok(())
        }
        Err(e) => {
            tracing::error!("❌ Liquidation process failed: {}", e);
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
            if e.is_fatal() {
                tracing::error!("Aborted before any orders were placed");
            }

            eprintln!("\n❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            // 根據錯誤階段決定退出碼
            std::process::exit(e.exit_code());
        }
    }
}

async fn run(config: &CliConfig) -> Result<(), LiquidationError> {
    // 驗證配置
    config.validate()?;
    let settings = LiquidationSettings::load(config.config.as_deref())?;
    settings.validate()?;

    let credentials = Credentials::from_file(config.api_key_path())?;
    tracing::info!("Successfully loaded Coinbase API credentials");

    let client = CoinbaseClient::new(
        &credentials,
        &settings.exchange.base_url,
        settings.request_timeout(),
    )?;

    let mode = if config.is_live() {
        RunMode::Live
    } else {
        RunMode::Trial
    };
    let mut executor = ExecutorOptions::new(mode);
    executor.retry = settings.retry_policy();
    executor.inter_item_delay = settings.inter_item_delay();
    executor.check_pairs = config.check_pairs();

    let engine = LiquidationEngine::new(
        client,
        Reporter::new(
            LocalStorage::new(config.output_dir().to_string()),
            settings.report.prefix.clone(),
        ),
        TerminalConfirmation,
        settings.precision_table(),
        EngineSettings {
            min_threshold: config.min_threshold(),
            portfolio: config.portfolio().map(str::to_string),
            executor,
        },
    );

    let summary = engine.run().await?;
    print_summary(&summary);
    Ok(())
}
