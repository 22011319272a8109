use clap::{Parser, Subcommand};
use results_importer::{Competition, FfdanseConfig, FfdanseProvider, ResultsProvider};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "results")]
#[command(about = "Dance sport federation results extractor", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Competitions of a season
    List {
        /// First year of the season (August 15 to August 14)
        #[arg(long)]
        year: i32,

        /// Also fetch the contests of every competition
        #[arg(long)]
        details: bool,

        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// One competition with its contests
    Details {
        #[arg(long)]
        year: i32,

        #[arg(long)]
        id: String,
    },
    /// Club names matching a query
    Groups {
        #[arg(default_value = "")]
        query: String,
    },
    /// Couples registered with a club
    Club { name: String },
    /// Couples matching a name
    Search { query: String },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("results={},results_importer={}", log_level, log_level).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let provider: Box<dyn ResultsProvider> =
        Box::new(FfdanseProvider::new(FfdanseConfig::from_env())?);

    match cli.command {
        Commands::List {
            year,
            details,
            output,
        } => {
            handle_list(provider.as_ref(), year, details, output).await?;
        }
        Commands::Details { year, id } => {
            handle_details(provider.as_ref(), year, &id).await?;
        }
        Commands::Groups { query } => {
            print_json(&provider.search_groups(&query).await?)?;
        }
        Commands::Club { name } => {
            print_json(&provider.get_group_couples(&name).await?)?;
        }
        Commands::Search { query } => {
            print_json(&provider.search_couples(&query).await?)?;
        }
    }

    Ok(())
}

async fn handle_list(
    provider: &dyn ResultsProvider,
    year: i32,
    details: bool,
    output: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut competitions = provider.list_results(year).await?;
    tracing::info!(
        "{} competition(s) in season {}-{}",
        competitions.len(),
        year,
        year + 1
    );

    if details {
        let mut detailed = Vec::with_capacity(competitions.len());
        for (idx, competition) in competitions.into_iter().enumerate() {
            tracing::info!("[{}] {} ({})", idx + 1, competition.place, competition.date);
            detailed.push(provider.get_details(competition).await?);
        }
        competitions = detailed;
    }

    match output {
        Some(dir) => {
            let filepath = export_season(&competitions, year, provider.name(), &dir).await?;
            tracing::info!("Exported to: {}", filepath.display());
        }
        None => print_json(&competitions)?,
    }

    Ok(())
}

async fn handle_details(
    provider: &dyn ResultsProvider,
    year: i32,
    id: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let competition = provider
        .list_results(year)
        .await?
        .into_iter()
        .find(|competition| competition.id == id)
        .ok_or_else(|| format!("Competition '{}' not found in season {}", id, year))?;

    print_json(&provider.get_details(competition).await?)?;
    Ok(())
}

async fn export_season(
    competitions: &[Competition],
    year: i32,
    provider: &str,
    output_dir: &Path,
) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let season_dir = output_dir.join(year.to_string());
    tokio::fs::create_dir_all(&season_dir).await?;

    let timestamp = chrono::Utc::now().format("%Y-%m-%dT%H-%M-%S");
    let filename = format!("{}_{}.json", timestamp, provider.to_lowercase());
    let filepath = season_dir.join(&filename);

    let json = serde_json::to_string_pretty(competitions)?;
    tokio::fs::write(&filepath, json).await?;

    Ok(filepath)
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
