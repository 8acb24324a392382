use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use tillbook::cli::{
    handle_balance_command, handle_expense_command, handle_report_command, handle_sale_command,
    BalanceCommands, ExpenseCommands, ReportCommands, SaleCommands,
};
use tillbook::config::{paths::TillbookPaths, settings::Settings};
use tillbook::storage::Storage;

#[derive(Parser)]
#[command(
    name = "tillbook",
    version,
    about = "Point-of-sale daily ledger and analytics engine",
    long_about = "tillbook keeps a small business's running daily cash balance, \
                  reconciles income from the sales store against manually \
                  recorded expenses, and builds daily/weekly/monthly analytics \
                  reports for rendering."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Expense recording and queries
    #[command(subcommand, alias = "exp")]
    Expense(ExpenseCommands),

    /// Sales store management
    #[command(subcommand)]
    Sale(SaleCommands),

    /// Daily balance recomputation and inspection
    #[command(subcommand, alias = "bal")]
    Balance(BalanceCommands),

    /// Period reports (daily, weekly, monthly)
    #[command(subcommand, alias = "rep")]
    Report(ReportCommands),

    /// Initialize the storage directories and settings
    Init,

    /// Show current configuration and paths
    Config,
}

fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let cli = Cli::parse();

    // Initialize paths and settings
    let paths = TillbookPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;

    // Initialize storage
    let mut storage = Storage::new(paths.clone())?;
    storage.load_all()?;

    match cli.command {
        Some(Commands::Expense(cmd)) => {
            handle_expense_command(&storage, &settings, cmd)?;
        }
        Some(Commands::Sale(cmd)) => {
            handle_sale_command(&storage, &settings, cmd)?;
        }
        Some(Commands::Balance(cmd)) => {
            handle_balance_command(&storage, &settings, cmd)?;
        }
        Some(Commands::Report(cmd)) => {
            handle_report_command(&storage, &settings, cmd)?;
        }
        Some(Commands::Init) => {
            paths.ensure_directories()?;
            settings.save(&paths)?;
            println!("Initialized tillbook at {}", paths.base_dir().display());
        }
        Some(Commands::Config) => {
            println!("Base directory:  {}", paths.base_dir().display());
            println!("Data directory:  {}", paths.data_dir().display());
            println!("Settings file:   {}", paths.settings_file().display());
            println!("Currency symbol: {}", settings.currency_symbol);
            println!("Top customers:   {}", settings.top_customer_count);
        }
        None => {
            println!("Run `tillbook --help` for usage.");
        }
    }

    Ok(())
}
