use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

mod commands;
mod common;

#[derive(Parser)]
#[command(name = "talentflow-cli", version, about = "Talentflow CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Momentum and composite scoring
    Score {
        #[command(subcommand)]
        action: commands::score::ScoreAction,
    },
    /// Time bucketing
    Bucket {
        #[command(subcommand)]
        action: commands::bucket::BucketAction,
    },
    /// Deal pipeline
    Deal {
        #[command(subcommand)]
        action: commands::deal::DealAction,
    },
    /// Artist and score records
    Artist {
        #[command(subcommand)]
        action: commands::artist::ArtistAction,
    },
    /// Weight configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Generate shell completions
    Completions { shell: Shell },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Score { action } => commands::score::run(action),
        Commands::Bucket { action } => commands::bucket::run(action),
        Commands::Deal { action } => commands::deal::run(action),
        Commands::Artist { action } => commands::artist::run(action),
        Commands::Config { action } => commands::config::run(action),
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "talentflow-cli", &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
