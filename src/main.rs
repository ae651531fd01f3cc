use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::fs;
use std::path::PathBuf;
use tracing::debug;

use ledger_tidy::config::{self, AppConfig};
use ledger_tidy::logging::init_logging;
use ledger_tidy::{
    canonicalize_identifier, clean_complaints, clean_transactions, extract_transaction_id,
    normalize_department, parse_flexible_date, parse_monetary_amount, report_for, round_to_cents,
    CleaningOptions, CleaningReport, DateOrder, Table, Value, COMPLAINT_DERIVED,
    TRANSACTION_DERIVED,
};

const MISSING: &str = "<missing>";

#[derive(Debug, Parser)]
#[command(name = "ledger-tidy", version, about = "Clean transaction and complaint CSV exports")]
struct Cli {
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Clean both tables and write *_clean.csv files
    Clean(CleanArgs),
    /// Show raw and cleaned previews of both tables
    Preview(PreviewArgs),
    /// Run one normalizer on a single value
    Normalize(NormalizeArgs),
}

#[derive(Debug, Args)]
struct InputArgs {
    #[arg(long)]
    transactions: Option<PathBuf>,
    #[arg(long)]
    complaints: Option<PathBuf>,
    /// month-first, day-first or infer
    #[arg(long)]
    date_order: Option<DateOrder>,
}

#[derive(Debug, Args)]
struct CleanArgs {
    #[command(flatten)]
    inputs: InputArgs,
    #[arg(long)]
    out: Option<PathBuf>,
    /// Print the cleaning report as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Args)]
struct PreviewArgs {
    #[command(flatten)]
    inputs: InputArgs,
    #[arg(long)]
    rows: Option<usize>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Field {
    Id,
    Department,
    Amount,
    TxnId,
    Date,
}

#[derive(Debug, Args)]
struct NormalizeArgs {
    #[arg(value_enum)]
    field: Field,
    value: String,
    #[arg(long)]
    date_order: Option<DateOrder>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let app_config = config::load(cli.config.clone()).context("load config")?;
    debug!(?app_config, "config resolved");

    match cli.command {
        Command::Clean(args) => run_clean(&app_config, args),
        Command::Preview(args) => run_preview(&app_config, args),
        Command::Normalize(args) => run_normalize(&app_config, args),
    }
}

struct Loaded {
    transactions: Table,
    complaints: Table,
    options: CleaningOptions,
}

fn load_inputs(app_config: &AppConfig, args: &InputArgs) -> Result<Loaded> {
    let tx_path = args
        .transactions
        .clone()
        .unwrap_or_else(|| app_config.inputs.transactions.clone());
    let cp_path = args
        .complaints
        .clone()
        .unwrap_or_else(|| app_config.inputs.complaints.clone());

    let transactions = Table::from_path(&tx_path)
        .with_context(|| format!("Failed to load transactions: {}", tx_path.display()))?;
    let complaints = Table::from_path(&cp_path)
        .with_context(|| format!("Failed to load complaints: {}", cp_path.display()))?;

    let options = CleaningOptions::with_date_order(args.date_order.unwrap_or(app_config.date_order));

    Ok(Loaded {
        transactions,
        complaints,
        options,
    })
}

fn run_clean(app_config: &AppConfig, args: CleanArgs) -> Result<()> {
    let loaded = load_inputs(app_config, &args.inputs)?;

    let txc = clean_transactions(&loaded.transactions, &loaded.options)
        .context("Failed to clean transactions")?;
    let cpc = clean_complaints(&loaded.complaints, &loaded.options)
        .context("Failed to clean complaints")?;

    let out_dir = args.out.unwrap_or_else(|| app_config.output_dir.clone());
    fs::create_dir_all(&out_dir)
        .with_context(|| format!("Failed to create output directory: {}", out_dir.display()))?;

    let tx_out = out_dir.join("transactions_clean.csv");
    let cp_out = out_dir.join("complaints_clean.csv");
    txc.to_path(&tx_out)
        .with_context(|| format!("Failed to write {}", tx_out.display()))?;
    cpc.to_path(&cp_out)
        .with_context(|| format!("Failed to write {}", cp_out.display()))?;

    let reports: Vec<CleaningReport> = vec![
        report_for(&txc, TRANSACTION_DERIVED),
        report_for(&cpc, COMPLAINT_DERIVED),
    ];

    if args.json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
        return Ok(());
    }

    println!("🧹 Cleaning complete (dates: {})", loaded.options.date_order);
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    for report in &reports {
        println!("{}", report.summary());
    }
    println!("\n✓ Wrote {}", tx_out.display());
    println!("✓ Wrote {}", cp_out.display());

    Ok(())
}

fn run_preview(app_config: &AppConfig, args: PreviewArgs) -> Result<()> {
    let loaded = load_inputs(app_config, &args.inputs)?;
    let rows = args.rows.unwrap_or(app_config.preview_rows);

    let txc = clean_transactions(&loaded.transactions, &loaded.options)
        .context("Failed to clean transactions")?;
    let cpc = clean_complaints(&loaded.complaints, &loaded.options)
        .context("Failed to clean complaints")?;

    println!("📂 Raw data preview\n");
    println!("Transactions\n{}", loaded.transactions.render_preview(rows));
    println!("Complaints\n{}", loaded.complaints.render_preview(rows));

    println!("🧹 Cleaned data preview\n");
    println!("Cleaned Transactions\n{}", txc.render_preview(rows));
    println!("Cleaned Complaints\n{}", cpc.render_preview(rows));

    Ok(())
}

fn run_normalize(app_config: &AppConfig, args: NormalizeArgs) -> Result<()> {
    let value = Value::from_field(&args.value);

    let result = match args.field {
        Field::Id => canonicalize_identifier(&value),
        Field::Department => normalize_department(&value),
        Field::Amount => parse_monetary_amount(&value).map(|x| format!("{:.2}", round_to_cents(x))),
        Field::TxnId => extract_transaction_id(&value),
        Field::Date => {
            let order = args.date_order.unwrap_or(app_config.date_order);
            parse_flexible_date(std::slice::from_ref(&value), order)
                .into_iter()
                .next()
                .flatten()
                .map(|ts| Value::Timestamp(ts).to_string())
        }
    };

    println!("{}", result.as_deref().unwrap_or(MISSING));
    Ok(())
}
