use anyhow::Context;
use clap::Parser;
use coinbase_liquidation::config::credentials::DEFAULT_CREDENTIALS_FILE;
use coinbase_liquidation::core::fetcher::fetch_balances;
use coinbase_liquidation::core::holdings::HoldingsSummary;
use coinbase_liquidation::utils::logger;
use coinbase_liquidation::{CoinbaseClient, Credentials, LiquidationSettings};

#[derive(Parser)]
#[command(name = "check-connection")]
#[command(about = "Verify the Coinbase API key and show what a liquidation would cover")]
struct Args {
    /// Path to the Coinbase CDP API key JSON file
    #[arg(long, default_value = DEFAULT_CREDENTIALS_FILE)]
    api_key: String,

    /// Optional TOML settings file
    #[arg(long)]
    config: Option<String>,

    /// Portfolio UUID (default: the first portfolio returned)
    #[arg(long)]
    portfolio: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args = Args::parse();

    if let Err(e) = logger::init_cli_logger(args.verbose, None) {
        eprintln!("❌ Failed to initialise logging: {}", e);
    }

    println!("Testing Coinbase API connection...");
    match check(&args).await {
        Ok(()) => {
            println!("\n✅ Connection test successful! You can now run the liquidation.");
        }
        Err(e) => {
            eprintln!("❌ {:#}", e);
            eprintln!("💡 Check your API key file and permissions and try again");
            std::process::exit(1);
        }
    }
}

async fn check(args: &Args) -> anyhow::Result<()> {
    let settings = LiquidationSettings::load(args.config.as_deref())
        .context("failed to load settings file")?;

    let credentials = Credentials::from_file(&args.api_key)?;
    println!("✅ API key loaded: {}...", credentials.key_name_preview());

    let client = CoinbaseClient::new(
        &credentials,
        &settings.exchange.base_url,
        settings.request_timeout(),
    )?;
    println!("✅ REST client initialized");

    let (portfolio, balances) = fetch_balances(&client, args.portfolio.as_deref())
        .await
        .context("failed to read portfolio from Coinbase")?;
    println!("✅ Using portfolio: {}", portfolio.uuid);

    HoldingsSummary::from_balances(&balances).print();
    Ok(())
}
