use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use fitness_recorder::commands;
use fitness_recorder::utils::config;

/// Log fitness activities and get a video for your effort.
#[derive(Debug, Parser)]
#[command(name = "fitness-recorder", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Directory holding the database and settings
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Skip the video lookup for this run
    #[arg(long, global = true)]
    offline: bool,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Record one activity
    Add {
        #[arg(short, long)]
        name: String,
        #[arg(short, long)]
        minutes: String,
    },
    /// Show the most recent entries
    Recent {
        #[arg(short, long)]
        count: Option<usize>,
    },
    /// Show the whole log
    List,
    /// Interactive entry form
    Session,
    /// Storage statistics
    Stats,
    /// Export the log as JSON
    Export,
    /// Show or change settings
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
}

#[derive(Debug, Subcommand)]
enum SettingsAction {
    Show,
    /// Set a value, e.g. `video.search_query "morning yoga"`
    Set { key: String, value: String },
}

#[tokio::main]
async fn main() {
    config::load_dotenv();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    if let Err(error) = run(Cli::parse()).await {
        eprintln!("fitness-recorder error: {error:#}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let data_dir = config::resolve_data_dir(cli.data_dir.as_deref()).map_err(anyhow::Error::msg)?;

    match cli.command {
        Commands::Add { name, minutes } => {
            let outcome = commands::entry::add_fitness_log(&data_dir, name, minutes, cli.offline)
                .await
                .map_err(anyhow::Error::msg)?;
            print!("{}", commands::session::format_outcome(&outcome));
        }
        Commands::Recent { count } => {
            let logs = commands::entry::get_recent_logs(&data_dir, count)
                .await
                .map_err(anyhow::Error::msg)?;
            print!("{}", commands::session::format_entries(&logs));
        }
        Commands::List => {
            let logs = commands::entry::get_logs(&data_dir).await.map_err(anyhow::Error::msg)?;
            print!("{}", commands::session::format_entries(&logs));
        }
        Commands::Session => {
            let recorder = commands::entry::open_recorder(&data_dir, cli.offline)
                .map_err(anyhow::Error::msg)?;
            let input = tokio::io::BufReader::new(tokio::io::stdin());
            let recorded = commands::session::run_session(&recorder, input, &mut std::io::stdout())
                .await
                .map_err(anyhow::Error::msg)?;
            println!("\nRecorded {} entries.", recorded);
        }
        Commands::Stats => {
            let stats = commands::storage::get_storage_stats(&data_dir)
                .await
                .map_err(anyhow::Error::msg)?;
            println!("{}", serde_json::to_string_pretty(&stats).context("failed to render stats")?);
        }
        Commands::Export => {
            let path = commands::storage::export_data(&data_dir).await.map_err(anyhow::Error::msg)?;
            println!("{}", path.display());
        }
        Commands::Settings { action } => {
            let settings = match action {
                SettingsAction::Show => commands::settings::get_settings(&data_dir),
                SettingsAction::Set { key, value } => {
                    commands::settings::update_setting(&data_dir, &key, &value)
                }
            }
            .map_err(anyhow::Error::msg)?;
            let rendered =
                serde_json::to_string_pretty(&settings).context("failed to render settings")?;
            println!("{}", rendered);
        }
    }

    Ok(())
}
