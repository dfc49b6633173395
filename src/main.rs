use clap::{Parser, Subcommand};
use dotenv::dotenv;
use eyre::{Error, Result};
use log::info;

use vram_trader::config::Config;
use vram_trader::trade::coins::{fetch_balances, format_primary};
use vram_trader::trade::{OsEntropy, TradingLoop};
use vram_trader::utils::app_context::AppContext;
use vram_trader::utils::logger::setup_logger;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the trading loop (default)
    Run {
        /// Stop after this many cycles
        #[arg(long)]
        cycles: Option<u64>,
    },
    /// Print the address derived from the credential
    Address,
    /// Print both balances once
    Balances,
}

async fn run_trading(ctx: &AppContext, cycles: Option<u64>) {
    let mut trading = TradingLoop::new(ctx, OsEntropy::new());
    trading.run_for(cycles).await;
    info!(
        "Trading finished after {} cycles ({:?})",
        trading.cycles(),
        trading.state()
    );
}

async fn print_balances(ctx: &AppContext) -> Result<(), Error> {
    let balances = fetch_balances(ctx).await?;
    println!("VRAM: {}", format_primary(balances.primary));
    println!("ANAM01: {}", balances.secondary);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    dotenv().ok();
    setup_logger()?;

    let cli = Cli::parse();
    let config = Config::from_env()?;
    let ctx = AppContext::new(&config)?;

    info!("Using {} credential", ctx.key_format);
    info!("Address: {}", ctx.address);

    match cli.command {
        Some(Commands::Address) => {
            println!("{}", ctx.address);
        }
        Some(Commands::Balances) => {
            print_balances(&ctx).await?;
        }
        Some(Commands::Run { cycles }) => {
            run_trading(&ctx, cycles).await;
        }
        None => {
            run_trading(&ctx, None).await;
        }
    }

    Ok(())
}
