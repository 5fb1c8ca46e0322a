//! Command-line entry point for the recycling guide.
//!
//! # Responsibility
//! - Resolve configuration, open the guide database and dispatch one command
//!   through the controller.
//! - Print `status` and body; exit non-zero when the status is an error.

use anyhow::Context;
use clap::{Parser, Subcommand};
use recycle_guide_api::{ApiResponse, GuideController};
use recycle_guide_core::db::open_db;
use recycle_guide_core::{
    init_logging, GuideConfig, GuideService, RecycleGuide, SqliteDocumentStore,
};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "recycle-guide",
    version = recycle_guide_core::core_version(),
    about = "Recycling guide lookup"
)]
struct Cli {
    /// SQLite database file (overrides RECYCLE_GUIDE_DB_PATH)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Log level (overrides RECYCLE_GUIDE_LOG_LEVEL)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Absolute log directory (overrides RECYCLE_GUIDE_LOG_DIR)
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Add or overwrite the guideline for an item
    Add {
        material: String,
        item: String,
        guideline: String,
    },
    /// List materials
    Materials,
    /// List items of a material
    Items { material: String },
    /// Show the guideline for an item
    Guide { material: String, item: String },
    /// Replace the guideline of an existing item
    Update {
        material: String,
        item: String,
        guideline: String,
    },
    /// Delete an item's guide
    Delete { material: String, item: String },
}

impl Cli {
    fn config(&self) -> GuideConfig {
        let mut config = GuideConfig::from_env();
        if let Some(db) = &self.db {
            config.db_path = db.clone();
        }
        if let Some(level) = &self.log_level {
            config.log_level = level.clone();
        }
        if let Some(dir) = &self.log_dir {
            config.log_dir = Some(dir.clone());
        }
        config
    }
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let config = cli.config();
    if let Some(log_dir) = &config.log_dir {
        init_logging(&config.log_level, log_dir).map_err(anyhow::Error::msg)?;
    }

    let conn = open_db(&config.db_path)
        .with_context(|| format!("failed to open `{}`", config.db_path.display()))?;
    let store = SqliteDocumentStore::try_new(&conn).context("failed to prepare guide store")?;
    let controller = GuideController::new(GuideService::new(store));

    let response = dispatch(&controller, cli.command)?;
    println!("{}", response.status);
    if !response.body.is_empty() {
        println!("{}", response.body);
    }

    Ok(if response.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn dispatch(
    controller: &GuideController<SqliteDocumentStore<'_>>,
    command: Command,
) -> anyhow::Result<ApiResponse> {
    let response = match command {
        Command::Add {
            material,
            item,
            guideline,
        } => {
            let body = serde_json::to_string(&RecycleGuide::new(material, item, guideline))
                .context("failed to encode guide request")?;
            controller.post_guide(&body)
        }
        Command::Materials => controller.get_materials(),
        Command::Items { material } => controller.get_items(&material),
        Command::Guide { material, item } => controller.get_guideline(&material, &item),
        Command::Update {
            material,
            item,
            guideline,
        } => controller.patch_guideline(&material, &item, &guideline),
        Command::Delete { material, item } => controller.delete_guide(&material, &item),
    };
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::{Cli, Command};
    use clap::error::ErrorKind;
    use clap::{CommandFactory, Parser};

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn version_is_a_flag_not_a_subcommand() {
        let err = Cli::try_parse_from(["recycle-guide", "--version"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DisplayVersion);
        assert!(err
            .to_string()
            .contains(recycle_guide_core::core_version()));

        assert!(Cli::try_parse_from(["recycle-guide", "version"]).is_err());
    }

    #[test]
    fn global_db_flag_overrides_config() {
        let cli = Cli::try_parse_from([
            "recycle-guide",
            "items",
            "plastic",
            "--db",
            "/tmp/guide-test.sqlite3",
        ])
        .unwrap();

        assert!(matches!(&cli.command, Command::Items { material } if material == "plastic"));
        assert_eq!(
            cli.config().db_path,
            std::path::PathBuf::from("/tmp/guide-test.sqlite3")
        );
    }
}
