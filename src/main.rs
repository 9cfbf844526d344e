use attribution::{evaluate_portfolio, load_portfolio};
use clap::{Parser, Subcommand, ValueEnum};
use comfy_table::{presets::UTF8_FULL, Table};
use configuration::Settings;
use core_types::{AnnotatedLoan, DerivedSeries};
use metrics::{market_share_shocks, market_shares};
use panel_store::{PanelStore, QueryResolver, Selector};
use risk::{top_shocks, SummaryRow};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// The main entry point for the crisk climate-risk application.
fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // Parse command-line arguments
    let cli = Cli::parse();

    // Load the configuration and the scenario panel once; every command works
    // against the same read-only store.
    let settings = match configuration::load_config() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Error loading config.toml: {e}");
            std::process::exit(1);
        }
    };
    let store = match PanelStore::from_csv_path(&settings.data.panel_file) {
        Ok(store) => store,
        Err(e) => {
            eprintln!("Error loading scenario panel: {e}");
            std::process::exit(1);
        }
    };
    info!("store ready, dispatching command");

    // Execute the appropriate command
    let result = match cli.command {
        Commands::List(args) => handle_list(args, &settings, &store),
        Commands::Shares(args) => handle_shares(args, &settings, &store),
        Commands::Shocks(args) => handle_shocks(args, &settings, &store),
        Commands::Portfolio(args) => handle_portfolio(args, &settings, &store),
        Commands::Summary(args) => handle_summary(args, &settings, &store),
    };
    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Market-share-shock exposure of a credit portfolio under climate-policy scenarios.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Enumerate a panel dimension (models, scenarios, regions, ...).
    List(ListArgs),
    /// Derive market shares for a sector against its base sector.
    Shares(SharesArgs),
    /// Derive market-share shocks between a baseline and a policy scenario.
    Shocks(ShocksArgs),
    /// Annotate a loan portfolio with per-loan shocks.
    Portfolio(PortfolioArgs),
    /// Build the portfolio risk summary across the configured scenario grid.
    Summary(SummaryArgs),
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Dimension {
    Models,
    Scenarios,
    Regions,
    Variables,
    Comparisons,
}

#[derive(Parser)]
struct ListArgs {
    /// The dimension to enumerate.
    #[arg(long, value_enum)]
    dimension: Dimension,

    /// Restrict the enumeration to one model's rows.
    #[arg(long)]
    model: Option<String>,
}

#[derive(Parser)]
struct SharesArgs {
    /// The model to query (e.g. "GCAM").
    #[arg(long)]
    model: String,

    /// Scenario selector: a name, a comma-separated list, "all" or "sample".
    #[arg(long)]
    scenario: String,

    /// Region selector: a name, a comma-separated list, "all" or "sample".
    #[arg(long)]
    region: String,

    /// The sector variable path; its base sector is included automatically.
    #[arg(long)]
    sector: String,

    /// Express shares as percentages instead of ratios.
    #[arg(long)]
    percent: bool,

    /// Emit the result as JSON instead of a table.
    #[arg(long)]
    json: bool,
}

#[derive(Parser)]
struct ShocksArgs {
    /// The model to query (e.g. "GCAM").
    #[arg(long)]
    model: String,

    /// Exactly two scenarios, comma-separated (e.g. "LIMITS-Base,LIMITS-RefPol-500").
    #[arg(long)]
    scenarios: String,

    /// Region selector: a name, a comma-separated list, "all" or "sample".
    #[arg(long)]
    region: String,

    /// The sector variable path; its base sector is included automatically.
    #[arg(long)]
    sector: String,

    /// Express shocks as percentages instead of ratios.
    #[arg(long)]
    percent: bool,

    /// Drop shock rows beyond this year.
    #[arg(long)]
    cutoff_year: Option<i32>,

    /// Emit the result as JSON instead of a table.
    #[arg(long)]
    json: bool,
}

#[derive(Parser)]
struct PortfolioArgs {
    /// The model to evaluate under (e.g. "GCAM").
    #[arg(long)]
    model: String,

    /// The reference (policy) scenario compared against the configured baseline.
    #[arg(long)]
    scenario: String,

    /// The year of shock occurrence.
    #[arg(long)]
    year: i32,

    /// Path to the loan portfolio CSV (columns: region, sector, amount).
    #[arg(long)]
    loans: std::path::PathBuf,

    /// Assumed recovery rate.
    #[arg(long, default_value_t = 0.0)]
    recovery_rate: f64,

    /// Assumed elasticity.
    #[arg(long, default_value_t = 1.0)]
    elasticity: f64,

    /// Emit the result as JSON instead of a table.
    #[arg(long)]
    json: bool,
}

#[derive(Parser)]
struct SummaryArgs {
    /// The year of shock occurrence.
    #[arg(long)]
    year: i32,

    /// Path to the loan portfolio CSV (columns: region, sector, amount).
    #[arg(long)]
    loans: std::path::PathBuf,

    /// Assumed recovery rate.
    #[arg(long, default_value_t = 0.0)]
    recovery_rate: f64,

    /// Assumed elasticity.
    #[arg(long, default_value_t = 1.0)]
    elasticity: f64,

    /// Confidence level for the tail-quantile shock; defaults to the
    /// configured value.
    #[arg(long)]
    confidence_level: Option<f64>,

    /// Emit the result as JSON instead of a table.
    #[arg(long)]
    json: bool,
}

// ==============================================================================
// Command Logic
// ==============================================================================

fn handle_list(args: ListArgs, settings: &Settings, store: &PanelStore) -> anyhow::Result<()> {
    let model = args.model.as_deref();
    let values = match args.dimension {
        Dimension::Models => store.models(),
        Dimension::Scenarios => store.scenarios(model),
        Dimension::Regions => store.regions(model),
        Dimension::Variables => store.energy_variables(model),
        Dimension::Comparisons => settings
            .scenarios
            .comparisons
            .iter()
            .map(|c| format!("{},{}", c.baseline, c.policy))
            .collect(),
    };
    for value in values {
        println!("{value}");
    }
    Ok(())
}

fn handle_shares(args: SharesArgs, settings: &Settings, store: &PanelStore) -> anyhow::Result<()> {
    let resolver = resolver(settings, store);
    let Some(sub) = resolver.query(
        &Selector::from(args.model.as_str()),
        &Selector::from(args.scenario.as_str()),
        &Selector::from(args.region.as_str()),
        &Selector::Many(vec![
            args.sector.clone(),
            core_types::base_sector(&args.sector).to_string(),
        ]),
    )?
    else {
        println!("No data matches the query.");
        return Ok(());
    };

    let shares = market_shares(&sub, args.percent)?;
    render_series(&shares, args.json)
}

fn handle_shocks(args: ShocksArgs, settings: &Settings, store: &PanelStore) -> anyhow::Result<()> {
    let resolver = resolver(settings, store);
    let Some(sub) = resolver.query(
        &Selector::from(args.model.as_str()),
        &Selector::from(args.scenarios.as_str()),
        &Selector::from(args.region.as_str()),
        &Selector::Many(vec![
            args.sector.clone(),
            core_types::base_sector(&args.sector).to_string(),
        ]),
    )?
    else {
        println!("No data matches the query.");
        return Ok(());
    };

    let shocks = market_share_shocks(&sub, args.percent, args.cutoff_year)?;
    render_series(&shocks, args.json)
}

fn handle_portfolio(
    args: PortfolioArgs,
    settings: &Settings,
    store: &PanelStore,
) -> anyhow::Result<()> {
    let loans = load_portfolio(&args.loans)?;
    let resolver = resolver(settings, store);
    let annotated = evaluate_portfolio(
        &resolver,
        &settings.scenarios.baseline,
        &args.model,
        &args.scenario,
        args.year,
        &loans,
        args.recovery_rate,
        args.elasticity,
    )?;
    render_portfolio(&annotated, args.json)
}

fn handle_summary(
    args: SummaryArgs,
    settings: &Settings,
    store: &PanelStore,
) -> anyhow::Result<()> {
    let loans = load_portfolio(&args.loans)?;
    let resolver = resolver(settings, store);
    let confidence_level = args
        .confidence_level
        .unwrap_or(settings.summary.confidence_level);
    let rows = top_shocks(
        &resolver,
        &settings.summary,
        &settings.scenarios.baseline,
        args.year,
        &loans,
        args.recovery_rate,
        args.elasticity,
        confidence_level,
    )?;
    render_summary(&rows, args.json)
}

fn resolver<'a>(settings: &Settings, store: &'a PanelStore) -> QueryResolver<'a> {
    QueryResolver::new(
        store,
        settings.scenarios.samples.clone(),
        settings.regions.samples.clone(),
    )
}

// ==============================================================================
// Rendering
// ==============================================================================
// All numeric rounding to 2 decimals happens here, for display only; the
// computed values stay unrounded in memory and in JSON output.

fn render_series(series: &DerivedSeries, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(series)?);
        return Ok(());
    }
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(["Model", "Scenario", "Region", "Year", "Variable", "Value", "Unit"]);
    for point in &series.points {
        table.add_row([
            point.model.clone(),
            point.scenario.clone(),
            point.region.clone(),
            point.year.to_string(),
            series.name.clone(),
            fmt_opt(point.value),
            series.unit.clone(),
        ]);
    }
    println!("{table}");
    Ok(())
}

fn render_portfolio(loans: &[AnnotatedLoan], json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(loans)?);
        return Ok(());
    }
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(["Region", "Sector", "Amount", "Shock"]);
    for loan in loans {
        table.add_row([
            loan.region.clone(),
            loan.sector.clone(),
            format!("{:.2}", loan.amount),
            fmt_opt(loan.shock),
        ]);
    }
    println!("{table}");
    Ok(())
}

fn render_summary(rows: &[SummaryRow], json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(rows)?);
        return Ok(());
    }
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header([
        "Model",
        "Scenario",
        "Min Shock",
        "Max Shock",
        "Total Neg",
        "Total Pos",
        "Total Neg Rel",
        "Project VaR",
    ]);
    for row in rows {
        table.add_row([
            row.model.clone(),
            row.scenario.clone(),
            fmt_opt(row.min_shock),
            fmt_opt(row.max_shock),
            format!("{:.2}", row.total_neg),
            format!("{:.2}", row.total_pos),
            fmt_opt(row.total_neg_rel),
            fmt_opt(row.project_var),
        ]);
    }
    println!("{table}");
    Ok(())
}

fn fmt_opt(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.2}"),
        None => "n/a".to_string(),
    }
}
