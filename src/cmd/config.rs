//! Configuration view and validation — `backlogseed config`.

use anyhow::Result;

use super::super::ConfigCommands;

pub fn cmd_config(command: Option<ConfigCommands>) -> Result<()> {
    use backlogseed::config::{Config, EnvSnapshot, Overrides};

    match command {
        None | Some(ConfigCommands::Show) => {
            // Build leniently (dry-run rules) so a half-configured
            // environment can still be inspected.
            let config = Config::build(
                EnvSnapshot::capture(),
                Overrides {
                    dry_run: true,
                    ..Default::default()
                },
            )?;
            let or_unset = |v: &str| {
                if v.is_empty() {
                    "(unset)".to_string()
                } else {
                    v.to_string()
                }
            };
            println!("Tracker URL: {}", or_unset(&config.base_url));
            println!("Email:       {}", or_unset(&config.email));
            println!("API token:   {}", config.redacted_token());
            println!("Project key: {}", config.project_key);
            println!(
                "Board id:    {}",
                config
                    .board_id
                    .map(|id| id.to_string())
                    .unwrap_or_else(|| "(discover at run time)".to_string())
            );
        }
        Some(ConfigCommands::Validate) => {
            Config::build(EnvSnapshot::capture(), Overrides::default())?;
            println!("Configuration OK — a run could start.");
        }
    }
    Ok(())
}
