// col - cost-of-living comparisons from the command line

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use cost_of_living::{
    calculate_comparison, compare_cities, fetch_location, AppConfig, BedroomType, Child,
    CityDataset, ComparisonInput, DiningFrequency, HouseholdOptions, JsonFileResearcher,
    LifestyleLevel, LocationQualityEngine, LocationResearcher, SqliteLocationCache,
};

#[derive(Parser, Debug)]
#[command(name = "col", version, about = "Compare take-home pay and living costs across cities")]
struct Cli {
    /// JSON config file (defaults apply when omitted)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Rank every city in the dataset against the current one
    Cities {
        #[arg(long)]
        salary: f64,

        /// Current city id, e.g. san-francisco-ca
        #[arg(long)]
        current: String,

        #[arg(long, default_value = "1br")]
        bedrooms: BedroomType,

        #[arg(long, default_value_t = 1)]
        adults: i64,

        #[arg(long, default_value_t = 0)]
        children: i64,

        #[arg(long)]
        car: bool,

        /// Only show the first N cities
        #[arg(long)]
        top: Option<usize>,

        #[arg(long)]
        json: bool,
    },

    /// Compare two researched locations
    Relocate {
        #[arg(long)]
        from: String,

        #[arg(long)]
        to: String,

        /// Annual gross salary in the origin currency
        #[arg(long)]
        salary: f64,

        #[arg(long, default_value = "1br")]
        bedrooms: BedroomType,

        #[arg(long, default_value_t = 1)]
        adults: i64,

        /// Age of each child (repeatable)
        #[arg(long = "child-age")]
        child_ages: Vec<f64>,

        #[arg(long)]
        car: bool,

        #[arg(long, default_value = "sometimes")]
        dining: DiningFrequency,

        #[arg(long, default_value = "moderate")]
        lifestyle: LifestyleLevel,

        #[arg(long)]
        json: bool,
    },

    /// Print the backfill report for researched locations
    ValidateLocation {
        #[arg(required = true)]
        names: Vec<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref())?;

    init_tracing(&config.log_level);

    match cli.command {
        Command::Cities {
            salary,
            current,
            bedrooms,
            adults,
            children,
            car,
            top,
            json,
        } => {
            let household = HouseholdOptions::new(bedrooms)
                .with_adults(adults)
                .with_children(children)
                .with_car(car);
            run_cities(&config, salary, &current, &household, top, json)
        }
        Command::Relocate {
            from,
            to,
            salary,
            bedrooms,
            adults,
            child_ages,
            car,
            dining,
            lifestyle,
            json,
        } => {
            let input = ComparisonInput {
                bedrooms,
                adults,
                children: child_ages.into_iter().map(Child::new).collect(),
                has_car: car,
                dining_out: dining,
                lifestyle,
                ..ComparisonInput::new(&from, &to, salary)
            };
            run_relocate(&config, &input, json)
        }
        Command::ValidateLocation { names } => run_validate_locations(&config, &names),
    }
}

/// RUST_LOG wins over the configured level
fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run_cities(
    config: &AppConfig,
    salary: f64,
    current: &str,
    household: &HouseholdOptions,
    top: Option<usize>,
    json: bool,
) -> Result<()> {
    let dataset = CityDataset::from_path(&config.cities_path)?;
    dataset.validate();

    let comparison = compare_cities(salary, current, dataset.cities(), household)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&comparison)?);
        return Ok(());
    }

    let base = &comparison.current_city;
    println!("📍 {}", base.summary());
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let limit = top.unwrap_or(comparison.ranked_cities.len());
    for (rank, result) in comparison.ranked_cities.iter().take(limit).enumerate() {
        println!(
            "{:>3}. {:<28} surplus ${:>6}/mo  ({:+})",
            rank + 1,
            result.city.label(),
            result.monthly_surplus,
            result.difference()
        );
    }

    Ok(())
}

fn open_sources(config: &AppConfig) -> Result<(SqliteLocationCache, JsonFileResearcher)> {
    let cache = SqliteLocationCache::open(&config.cache_path)?;
    let researcher = JsonFileResearcher::from_file(&config.locations_path)?;
    info!(records = researcher.len(), "loaded location research");
    Ok((cache, researcher))
}

fn run_relocate(config: &AppConfig, input: &ComparisonInput, json: bool) -> Result<()> {
    let (cache, researcher) = open_sources(config)?;
    let max_age = config.cache_max_age();

    let origin = fetch_location(&input.origin, &cache, &researcher, max_age)
        .with_context(|| format!("Could not load origin '{}'", input.origin))?;
    let destination = fetch_location(&input.destination, &cache, &researcher, max_age)
        .with_context(|| format!("Could not load destination '{}'", input.destination))?;

    let result = calculate_comparison(origin, destination, input);

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    let origin_symbol = &result.origin.currency_symbol;
    let destination_symbol = &result.destination.currency_symbol;

    println!("🌍 {}", result.summary());
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!(
        "{:<16} {:>14} {:>14}",
        "",
        result.origin.label(),
        result.destination.label()
    );

    let rows = [
        ("Gross", result.origin_breakdown.gross_income, result.destination_breakdown.gross_income),
        ("Tax", result.origin_breakdown.tax, result.destination_breakdown.tax),
        ("Net", result.origin_breakdown.net_income, result.destination_breakdown.net_income),
    ];
    let expenses = result
        .origin_breakdown
        .expense_lines()
        .into_iter()
        .zip(result.destination_breakdown.expense_lines())
        .map(|((label, origin), (_, destination))| (label, origin, destination));
    let totals = [
        ("Expenses", result.origin_breakdown.total_expenses, result.destination_breakdown.total_expenses),
        ("Surplus", result.origin_breakdown.surplus, result.destination_breakdown.surplus),
    ];

    for (label, origin, destination) in rows.into_iter().chain(expenses).chain(totals) {
        println!(
            "{:<16} {:>13} {:>13}",
            label,
            format!("{}{}", origin_symbol, origin),
            format!("{}{}", destination_symbol, destination)
        );
    }

    let summary = &result.comparison;
    println!();
    println!(
        "Salary needed in {}: {}{} (flat rate estimate {}{})",
        result.destination.label(),
        destination_symbol,
        summary.salary_needed_exact,
        destination_symbol,
        summary.salary_needed_to_match_lifestyle
    );

    if !result.recommendations.is_empty() {
        println!("\n💡 Recommendations:");
        for rec in &result.recommendations {
            println!("  • {}", rec);
        }
    }

    for report in [&result.origin_quality, &result.destination_quality] {
        if !report.is_clean() {
            println!("⚠️  {}", report.summary());
        }
    }

    Ok(())
}

fn run_validate_locations(config: &AppConfig, names: &[String]) -> Result<()> {
    let researcher = JsonFileResearcher::from_file(&config.locations_path)?;
    let records = names
        .iter()
        .map(|name| researcher.research(name))
        .collect::<Result<Vec<_>>>()?;

    for (_, report) in LocationQualityEngine::new().validate_batch(records) {
        println!("🔍 {}", report.summary());
        for issue in &report.issues {
            println!(
                "  [{:?}] {}: {} → {}",
                issue.severity, issue.field, issue.issue, issue.recommendation
            );
        }

        if report.is_clean() {
            println!("✅ No backfill needed");
        }
    }

    Ok(())
}
