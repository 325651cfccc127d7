// FILE: crates/cli/src/main.rs

use anyhow::{Context, Result};
use clap::{Arg, ArgAction, Command};
use galleria_config::{Config, ConfigManager};
use std::path::PathBuf;

mod commands;
mod player;

fn label_args() -> [Arg; 2] {
    [
        Arg::new("character")
            .short('c')
            .long("character")
            .value_name("NAME")
            .help("Character label (repeatable, or comma separated)")
            .action(ArgAction::Append),
        Arg::new("tag")
            .short('t')
            .long("tag")
            .value_name("TAG")
            .help("Tag label (repeatable, or comma separated)")
            .action(ArgAction::Append),
    ]
}

fn build_cli() -> Command {
    Command::new("galleria")
        .version(env!("CARGO_PKG_VERSION"))
        .author("DrTomLLC")
        .about("Browse, play and manage image galleries stored in a B2 bucket")
        .arg(
            Arg::new("config-dir")
                .long("config-dir")
                .value_name("DIR")
                .help("Directory holding config.toml")
                .global(true),
        )
        .subcommand(
            Command::new("list")
                .about("List galleries, optionally filtered by character and tag")
                .args(label_args())
                .arg(
                    Arg::new("json")
                        .long("json")
                        .help("Print the matching galleries as JSON")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(Command::new("tags").about("Show every character and tag in use"))
        .subcommand(Command::new("stats").about("Show gallery and image totals"))
        .subcommand(
            Command::new("show")
                .about("Show one gallery and its image URLs")
                .arg(Arg::new("id").required(true).value_name("GALLERY_ID")),
        )
        .subcommand(
            Command::new("play")
                .about("Open a gallery in the terminal slideshow")
                .arg(Arg::new("id").required(true).value_name("GALLERY_ID"))
                .arg(
                    Arg::new("start")
                        .short('s')
                        .long("start")
                        .value_name("N")
                        .help("Slide to open at (1-based)")
                        .value_parser(clap::value_parser!(usize))
                        .default_value("1"),
                )
                .arg(
                    Arg::new("autoplay")
                        .short('a')
                        .long("autoplay")
                        .help("Start auto-advancing immediately")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("upload")
                .about("Upload image files as a new gallery")
                .arg(Arg::new("name").required(true).value_name("NAME"))
                .arg(
                    Arg::new("files")
                        .required(true)
                        .value_name("FILES")
                        .num_args(1..)
                        .help("Image files to upload"),
                )
                .args(label_args()),
        )
        .subcommand(
            Command::new("edit")
                .about("Rename a gallery or replace its labels")
                .arg(Arg::new("id").required(true).value_name("GALLERY_ID"))
                .arg(
                    Arg::new("name")
                        .short('n')
                        .long("name")
                        .value_name("NAME")
                        .help("New display name"),
                )
                .args(label_args()),
        )
        .subcommand(
            Command::new("delete")
                .about("Delete galleries and their images")
                .arg(
                    Arg::new("ids")
                        .required(true)
                        .value_name("GALLERY_ID")
                        .num_args(1..),
                )
                .arg(
                    Arg::new("force")
                        .short('f')
                        .long("force")
                        .help("Skip confirmation prompt")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(Command::new("test-connection").about("Check credentials and bucket access"))
        .subcommand(
            Command::new("config")
                .about("Manage the configuration file")
                .subcommand_required(true)
                .subcommand(Command::new("init").about("Write a default config file"))
                .subcommand(Command::new("show").about("Print the effective configuration"))
                .subcommand(Command::new("validate").about("Check the config file for problems")),
        )
}

fn config_manager(dir: Option<&String>) -> Result<ConfigManager> {
    let manager = match dir {
        Some(dir) => ConfigManager::with_directory(PathBuf::from(dir)),
        None => ConfigManager::new(),
    };
    manager.context("Failed to locate configuration directory")
}

/// Problems in the loaded configuration, reported once logging is running
fn config_warnings(config: &Config) -> Vec<String> {
    match config.validate() {
        Ok(()) => Vec::new(),
        Err(errors) => errors.iter().map(|e| e.to_string()).collect(),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let matches = build_cli().get_matches();
    let manager = config_manager(matches.get_one::<String>("config-dir"))?;
    let config = manager
        .load_with_env_overrides()
        .context("Failed to load configuration")?;

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.app.log_filter()),
    )
    .init();

    for warning in config_warnings(&config) {
        log::warn!("Config validation warning: {}", warning);
    }

    let ctx = commands::AppContext::new(manager, config);

    match matches.subcommand() {
        Some(("list", sub_matches)) => commands::list_galleries(&ctx, sub_matches).await,
        Some(("tags", _)) => commands::show_tags(&ctx).await,
        Some(("stats", _)) => commands::show_stats(&ctx).await,
        Some(("show", sub_matches)) => commands::show_gallery(&ctx, sub_matches).await,
        Some(("play", sub_matches)) => commands::play_gallery(&ctx, sub_matches).await,
        Some(("upload", sub_matches)) => commands::upload_gallery(&ctx, sub_matches).await,
        Some(("edit", sub_matches)) => commands::edit_gallery(&ctx, sub_matches).await,
        Some(("delete", sub_matches)) => commands::delete_galleries(&ctx, sub_matches).await,
        Some(("test-connection", _)) => commands::test_connection(&ctx).await,
        Some(("config", sub_matches)) => match sub_matches.subcommand() {
            Some(("init", _)) => commands::config_init(&ctx),
            Some(("show", _)) => commands::config_show(&ctx),
            Some(("validate", _)) => commands::config_validate(&ctx),
            _ => Ok(()),
        },
        _ => {
            build_cli().print_help()?;
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        build_cli().debug_assert();
    }

    #[test]
    fn test_config_warnings() {
        assert!(config_warnings(&Config::default()).is_empty());

        let mut config = Config::default();
        config.slideshow.frame_interval_ms = 0;
        let warnings = config_warnings(&config);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("slideshow.frame_interval_ms"));
    }

    #[test]
    fn test_play_defaults() {
        let matches = build_cli()
            .try_get_matches_from(["galleria", "play", "gallery-1"])
            .unwrap();
        let (_, play) = matches.subcommand().unwrap();
        assert_eq!(play.get_one::<usize>("start"), Some(&1));
        assert!(!play.get_flag("autoplay"));
    }

    #[test]
    fn test_repeated_labels() {
        let matches = build_cli()
            .try_get_matches_from(["galleria", "list", "-c", "Alice", "--character", "Bob"])
            .unwrap();
        let (_, list) = matches.subcommand().unwrap();
        let characters: Vec<&String> = list.get_many::<String>("character").unwrap().collect();
        assert_eq!(characters, ["Alice", "Bob"]);
    }

    #[test]
    fn test_upload_needs_files() {
        let result = build_cli().try_get_matches_from(["galleria", "upload", "Trip"]);
        assert!(result.is_err());
    }
}
