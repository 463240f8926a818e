use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand, ValueEnum};
use squad_oracle::config::{Config, ConfigOverrides};
use squad_oracle::directory::StaticTeamDirectory;
use squad_oracle::ingest::parse_snapshot;
use squad_oracle::lineup::optimizer::optimize_lineup;
use squad_oracle::lineup::LineupResult;
use squad_oracle::output::csv::{sales_to_csv, transfers_to_csv};
use squad_oracle::output::json::render_json;
use squad_oracle::output::table::{
    render_lineup_table, render_replacements_table, render_report, render_sales_table,
    render_transfers_table,
};
use squad_oracle::report::{build_report, sales_advice, SaleAdvice, SquadReport};
use squad_oracle::sales::rules::expected_sale_value;
use squad_oracle::server::run_server;
use squad_oracle::transfers::recommender::recommend_transfers;
use squad_oracle::transfers::replacements::find_replacements;
use squad_oracle::transfers::{ReplacementSuggestion, TransferRecommendation};
use squad_oracle::types::{LeagueSnapshot, Metric, SaleGoal};
use tracing::warn;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
    Csv,
}

#[derive(Debug, Parser)]
#[command(name = "squad-oracle", about = "Fantasy squad advice from league snapshots")]
struct Cli {
    /// Path to a JSON snapshot exported from the league provider.
    #[arg(short, long)]
    snapshot: Option<PathBuf>,
    #[arg(short, long)]
    league: Option<String>,
    #[arg(short, long)]
    config: Option<PathBuf>,
    #[arg(short, long)]
    metric: Option<String>,
    #[arg(short, long)]
    goal: Option<String>,
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    output: OutputFormat,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    Lineup,
    Sales {
        #[arg(long)]
        top: Option<usize>,
    },
    Replacements {
        /// Player id or name from the roster.
        player: String,
        #[arg(long, default_value_t = 5)]
        top: usize,
    },
    Transfers {
        #[arg(long)]
        top: Option<usize>,
    },
    Report,
    Serve {
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
        #[arg(long, default_value_t = 3001)]
        port: u16,
    },
    Config {
        #[arg(long)]
        init: bool,
        #[arg(long)]
        show: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(Config::default_path);
    let mut config = Config::load(Some(&config_path))?;
    config.apply_overrides(ConfigOverrides {
        league_id: cli.league.clone(),
        metric: cli.metric.clone(),
        goal: cli.goal.clone(),
    });

    if matches!(cli.command, Commands::Config { .. }) {
        return handle_config_command(&cli.command, &config, &config_path);
    }
    if let Commands::Serve { host, port } = &cli.command {
        let bind = format!("{host}:{port}");
        let addr: SocketAddr = bind
            .parse()
            .map_err(|e| anyhow!("invalid bind address {bind}: {e}"))?;
        return run_server(config, addr).await;
    }

    let snapshot_path = cli
        .snapshot
        .as_deref()
        .ok_or_else(|| anyhow!("--snapshot <FILE> is required for this command"))?;
    let snapshot = load_snapshot(snapshot_path, &config)?;
    let metric = Metric::from_str(&config.engine.metric)?;
    let goal = SaleGoal::from_str(&config.engine.goal)?;

    match &cli.command {
        Commands::Lineup => {
            let lineup = optimize_lineup(&snapshot.roster, metric);
            print_lineup(&lineup, cli.output)?;
        }
        Commands::Sales { top } => {
            let mut sales = sales_advice(&snapshot, metric, goal, &config);
            if let Some(top) = top {
                sales.truncate((*top).max(1));
            }
            print_sales(&sales, cli.output)?;
        }
        Commands::Replacements { player, top } => {
            let sold = snapshot
                .roster
                .iter()
                .find(|p| p.id == *player || p.name.eq_ignore_ascii_case(player))
                .ok_or_else(|| anyhow!("player not found in roster: {player}"))?;
            let expected = expected_sale_value(sold, &config.sales);
            let mut suggestions = find_replacements(
                sold,
                expected,
                &snapshot.market,
                &snapshot.roster,
                snapshot.budget,
                metric,
                &config.replacements,
            );
            suggestions.truncate((*top).max(1));
            print_replacements(&suggestions, cli.output)?;
        }
        Commands::Transfers { top } => {
            let mut transfers = recommend_transfers(
                &snapshot.market,
                &snapshot.roster,
                snapshot.budget,
                &config.transfers,
            );
            if let Some(top) = top {
                transfers.truncate((*top).max(1));
            }
            let directory = StaticTeamDirectory::from_snapshot(&snapshot);
            print_transfers(&transfers, &directory, cli.output)?;
        }
        Commands::Report => {
            let report = build_report(&snapshot, metric, goal, &config);
            let directory = StaticTeamDirectory::from_snapshot(&snapshot);
            print_report(&report, &directory, cli.output)?;
        }
        Commands::Config { .. } => {}
        Commands::Serve { .. } => unreachable!("serve command handled before dispatch"),
    }

    Ok(())
}

fn handle_config_command(command: &Commands, config: &Config, config_path: &PathBuf) -> Result<()> {
    let Commands::Config { init, show } = command else {
        return Ok(());
    };
    if *init {
        Config::write_template(config_path)?;
        println!("Wrote config template to {}", config_path.display());
    }
    if *show || !*init {
        println!("{}", render_json(config)?);
    }
    Ok(())
}

fn load_snapshot(path: &Path, config: &Config) -> Result<LeagueSnapshot> {
    let data = std::fs::read_to_string(path)
        .map_err(|e| anyhow!("failed reading snapshot {}: {e}", path.display()))?;
    let raw: serde_json::Value = serde_json::from_str(&data)
        .map_err(|e| anyhow!("snapshot {} is not valid JSON: {e}", path.display()))?;
    let (mut snapshot, ingest) = parse_snapshot(&raw)?;
    if ingest.dropped_total() > 0 {
        warn!(
            dropped_players = ingest.dropped_players,
            dropped_listings = ingest.dropped_listings,
            "snapshot entities dropped during ingest"
        );
    }
    if snapshot.league_id == "default" && !config.league.id.is_empty() {
        snapshot.league_id = config.league.id.clone();
    }
    Ok(snapshot)
}

fn print_lineup(lineup: &LineupResult, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => println!("{}", render_lineup_table(lineup)),
        OutputFormat::Json => println!("{}", render_json(lineup)?),
        OutputFormat::Csv => {
            warn!("CSV output for lineup not implemented, using JSON");
            println!("{}", render_json(lineup)?);
        }
    }
    Ok(())
}

fn print_sales(sales: &[SaleAdvice], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => println!("{}", render_sales_table(sales)),
        OutputFormat::Json => println!("{}", render_json(sales)?),
        OutputFormat::Csv => println!("{}", sales_to_csv(sales)?),
    }
    Ok(())
}

fn print_replacements(suggestions: &[ReplacementSuggestion], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => println!("{}", render_replacements_table(suggestions)),
        OutputFormat::Json => println!("{}", render_json(suggestions)?),
        OutputFormat::Csv => {
            warn!("CSV output for replacements not implemented, using JSON");
            println!("{}", render_json(suggestions)?);
        }
    }
    Ok(())
}

fn print_transfers(
    transfers: &[TransferRecommendation],
    directory: &StaticTeamDirectory,
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Table => println!("{}", render_transfers_table(transfers, directory)),
        OutputFormat::Json => println!("{}", render_json(transfers)?),
        OutputFormat::Csv => println!("{}", transfers_to_csv(transfers)?),
    }
    Ok(())
}

fn print_report(
    report: &SquadReport,
    directory: &StaticTeamDirectory,
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Table => println!("{}", render_report(report, directory)),
        OutputFormat::Json => println!("{}", render_json(report)?),
        OutputFormat::Csv => {
            warn!("CSV output for report not implemented, using JSON");
            println!("{}", render_json(report)?);
        }
    }
    Ok(())
}
