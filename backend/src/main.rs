//! Energy Explorer CLI - Sustainable energy analytics
//!
//! # Main Commands
//!
//! ```bash
//! energy-explorer serve                      # Start HTTP server (port 3000)
//! energy-explorer report --state '{"page":"analysis","tab":"gdp"}'
//! energy-explorer fields                     # Field glossary
//! ```
//!
//! # Query Commands
//!
//! ```bash
//! energy-explorer overview                   # Shape, head and summary statistics
//! energy-explorer rank --field gdp_per_capita --year 2020 --limit 10
//! energy-explorer extremes --extreme lowest --limit 10
//! energy-explorer correlate --fields access_to_electricity,gdp_per_capita
//! energy-explorer series --entity Norway --entity Chad
//! energy-explorer reductions                 # CO2 reductions first -> last year
//! energy-explorer latest --field low_carbon_electricity
//! ```
//!
//! Every command reads the dataset from `--data` (or `ENERGY_DATA_PATH`)
//! and writes JSON to stdout or `--output`.

use clap::{Args, Parser, Subcommand};
use energy_explorer::{
    build_report, correlation_matrix, entity_series, extremes, first_last_reductions, glossary,
    latest_top, overview, rank, resolve_entity, series_table, Dataset, Extreme, ExtremesQuery,
    Field, LatestQuery, Metric, RankingQuery, Reduction, RowOrder, Settings, SortOrder, Table,
    ViewEvent, ViewState,
};
use energy_explorer::api::{log_success, log_warning};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

type CmdResult = Result<(), Box<dyn std::error::Error>>;

#[derive(Parser)]
#[command(name = "energy-explorer")]
#[command(about = "Explore global sustainable energy indicators", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Dataset input and JSON output shared by the query commands.
#[derive(Args)]
struct Io {
    /// Dataset CSV (default: ENERGY_DATA_PATH or Energy_data.csv)
    #[arg(short, long)]
    data: Option<PathBuf>,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start HTTP server
    Serve {
        /// Dataset CSV
        #[arg(short, long)]
        data: Option<PathBuf>,

        /// Directory with the frontend bundle and landing image
        #[arg(short, long)]
        static_dir: Option<PathBuf>,

        /// Port to listen on (default: PORT or 3000)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Dataset shape, first rows and summary statistics
    Overview {
        #[command(flatten)]
        io: Io,
    },

    /// Top/bottom rows of one year by a field
    Rank {
        #[arg(short, long, default_value = "2020")]
        year: i32,

        #[arg(short, long, default_value = "gdp_per_capita")]
        field: Field,

        /// asc or desc
        #[arg(long, default_value = "desc")]
        order: SortOrder,

        #[arg(short, long, default_value = "10")]
        limit: usize,

        /// Extra context columns
        #[arg(short, long, value_delimiter = ',')]
        columns: Vec<Field>,

        #[command(flatten)]
        io: Io,
    },

    /// Lowest/highest unique entities of one year
    Extremes {
        #[arg(short, long, default_value = "2020")]
        year: i32,

        #[arg(short, long, default_value = "access_to_electricity")]
        field: Field,

        /// lowest or highest
        #[arg(short, long, default_value = "lowest")]
        extreme: Extreme,

        #[arg(short, long, default_value = "10")]
        limit: usize,

        #[command(flatten)]
        io: Io,
    },

    /// Pairwise-complete correlation matrix
    Correlate {
        #[arg(
            short,
            long,
            value_delimiter = ',',
            default_value = "access_to_electricity,gdp_per_capita,land_area,population"
        )]
        fields: Vec<Field>,

        /// Only use rows of this year
        #[arg(short, long)]
        year: Option<i32>,

        #[command(flatten)]
        io: Io,
    },

    /// Time series of one or more entities
    Series {
        /// Entity name (repeatable, case-insensitive prefix allowed)
        #[arg(short, long, required = true)]
        entity: Vec<String>,

        #[arg(
            short,
            long,
            value_delimiter = ',',
            default_value = "access_to_electricity,renewable_share"
        )]
        fields: Vec<Field>,

        #[command(flatten)]
        io: Io,
    },

    /// Entities whose value fell between their first and last year
    Reductions {
        #[arg(short, long, default_value = "co2_emissions")]
        metric: Metric,

        /// Use file order instead of sorting by (entity, year)
        #[arg(long)]
        as_loaded: bool,

        #[command(flatten)]
        io: Io,
    },

    /// Rank each entity's most recent row
    Latest {
        #[arg(short, long, default_value = "low_carbon_electricity")]
        field: Field,

        #[arg(long, default_value = "desc")]
        order: SortOrder,

        #[arg(short, long, default_value = "10")]
        limit: usize,

        /// Use file order instead of sorting by (entity, year)
        #[arg(long)]
        as_loaded: bool,

        #[command(flatten)]
        io: Io,
    },

    /// Build the dashboard report for a view state
    Report {
        /// View state as JSON (missing keys use defaults)
        #[arg(short, long, default_value = "{}")]
        state: String,

        /// Event to apply first, as JSON
        #[arg(short, long)]
        event: Option<String>,

        #[command(flatten)]
        io: Io,
    },

    /// Show the field glossary
    Fields {
        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Serve {
            data,
            static_dir,
            port,
        } => cmd_serve(data, static_dir, port).await,

        Commands::Overview { io } => cmd_overview(&io),

        Commands::Rank {
            year,
            field,
            order,
            limit,
            columns,
            io,
        } => cmd_rank(
            &RankingQuery {
                year,
                field,
                order,
                limit,
            },
            &columns,
            &io,
        ),

        Commands::Extremes {
            year,
            field,
            extreme,
            limit,
            io,
        } => cmd_extremes(
            &ExtremesQuery {
                year,
                field,
                extreme,
                limit,
            },
            &io,
        ),

        Commands::Correlate { fields, year, io } => cmd_correlate(&fields, year, &io),

        Commands::Series { entity, fields, io } => cmd_series(&entity, &fields, &io),

        Commands::Reductions { metric, as_loaded, io } => cmd_reductions(metric, row_order(as_loaded), &io),

        Commands::Latest {
            field,
            order,
            limit,
            as_loaded,
            io,
        } => cmd_latest(
            &LatestQuery {
                field,
                order,
                limit,
                row_order: row_order(as_loaded),
            },
            &io,
        ),

        Commands::Report { state, event, io } => cmd_report(&state, event.as_deref(), &io),

        Commands::Fields { output } => cmd_fields(output.as_deref()),
    };

    if let Err(e) = result {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

async fn cmd_serve(data: Option<PathBuf>, static_dir: Option<PathBuf>, port: Option<u16>) -> CmdResult {
    let settings = Settings::from_env()?
        .with_data_path(data)
        .with_static_dir(static_dir)
        .with_port(port);
    energy_explorer::server::start_server(&settings).await
}

fn cmd_overview(io: &Io) -> CmdResult {
    let dataset = load_dataset(io)?;
    write_json(&overview(&dataset), io)
}

fn cmd_rank(query: &RankingQuery, columns: &[Field], io: &Io) -> CmdResult {
    let dataset = load_dataset(io)?;
    let rows = rank(&dataset, query)?;
    if rows.is_empty() {
        log_warning(format!("No {} values for year {}", query.field, query.year));
    }

    let mut fields = vec![Field::Entity, Field::Year, query.field];
    for column in columns {
        if !fields.contains(column) {
            fields.push(*column);
        }
    }
    write_json(&Table::project(rows, &fields), io)
}

fn cmd_extremes(query: &ExtremesQuery, io: &Io) -> CmdResult {
    let dataset = load_dataset(io)?;
    let rows = extremes(&dataset, query)?;
    log_success(format!("{} {} unique entities for {}", rows.len(), query.extreme, query.year));
    write_json(&Table::project(rows, &[Field::Entity, Field::Year, query.field]), io)
}

fn cmd_correlate(fields: &[Field], year: Option<i32>, io: &Io) -> CmdResult {
    let dataset = load_dataset(io)?;
    let rows = dataset
        .rows()
        .iter()
        .filter(|obs| year.map_or(true, |y| obs.year == y));
    let matrix = correlation_matrix(rows, fields)?;
    write_json(&matrix, io)
}

fn cmd_series(names: &[String], fields: &[Field], io: &Io) -> CmdResult {
    let dataset = load_dataset(io)?;
    let resolved = names
        .iter()
        .map(|name| resolve_entity(&dataset, name))
        .collect::<Result<Vec<_>, _>>()?;
    let rows = entity_series(&dataset, &resolved);
    write_json(&series_table(rows, fields), io)
}

fn cmd_reductions(metric: Metric, order: RowOrder, io: &Io) -> CmdResult {
    let dataset = load_dataset(io)?;
    let reductions = first_last_reductions(&dataset, metric, order);
    log_success(format!("{} entities reduced {}", reductions.len(), metric));
    write_json(&Reduction::table(&reductions), io)
}

fn cmd_latest(query: &LatestQuery, io: &Io) -> CmdResult {
    let dataset = load_dataset(io)?;
    let rows = latest_top(&dataset, query)?;
    write_json(&Table::project(rows, &[Field::Entity, Field::Year, query.field]), io)
}

fn cmd_report(state: &str, event: Option<&str>, io: &Io) -> CmdResult {
    let dataset = load_dataset(io)?;
    let mut state: ViewState = serde_json::from_str(state)?;
    if let Some(event) = event {
        let event: ViewEvent = serde_json::from_str(event)?;
        state = state.apply(event);
    }
    let report = build_report(&dataset, &state)?;
    write_json(&report, io)
}

fn cmd_fields(output: Option<&Path>) -> CmdResult {
    let json = serde_json::to_string_pretty(&glossary())?;
    write_output(&json, output)
}

// =============================================================================
// Helpers
// =============================================================================

fn load_dataset(io: &Io) -> Result<Dataset, Box<dyn std::error::Error>> {
    let settings = Settings::from_env()?.with_data_path(io.data.clone());
    Ok(Dataset::load(&settings.data_path)?)
}

fn row_order(as_loaded: bool) -> RowOrder {
    if as_loaded {
        RowOrder::AsLoaded
    } else {
        RowOrder::Chronological
    }
}

fn write_json<T: Serialize>(value: &T, io: &Io) -> CmdResult {
    let json = serde_json::to_string_pretty(value)?;
    write_output(&json, io.output.as_deref())
}

fn write_output(content: &str, path: Option<&Path>) -> CmdResult {
    match path {
        Some(p) => {
            fs::write(p, content)?;
            eprintln!("💾 Output written to: {}", p.display());
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
