use clap::Subcommand;

use crate::common::{load_weights, print_json, weights_path, WeightsFile};

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Write a weights.toml with the default coefficients
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Print the effective weights (file overrides merged with defaults)
    Show,
    /// Print where weights.toml is looked up
    Path,
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Init { force } => {
            let path = weights_path()?;
            if path.exists() && !force {
                return Err(format!(
                    "{} already exists; pass --force to overwrite",
                    path.display()
                )
                .into());
            }
            let rendered = toml::to_string_pretty(&WeightsFile::default())?;
            std::fs::write(&path, rendered)?;
            println!("wrote {}", path.display());
            Ok(())
        }
        ConfigAction::Show => {
            let weights = load_weights()?;
            print_json(&weights)
        }
        ConfigAction::Path => {
            println!("{}", weights_path()?.display());
            Ok(())
        }
    }
}
