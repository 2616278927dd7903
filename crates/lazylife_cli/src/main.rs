//! Command-line entry for `lazylife_core` grouping.
//!
//! # Responsibility
//! - Load a JSON snapshot of tasks and events and print their ordered groups.
//! - Keep output deterministic for a given `--today`.

use chrono::NaiveDate;
use clap::Parser;
use lazylife_core::config::DEFAULT_CONFIG_NAME;
use lazylife_core::{
    build_event_groups, build_task_groups, core_version, CoreConfig, DayAnchor, Event, Task,
};
use log::info;
use serde::Deserialize;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Snapshot {
    tasks: Vec<Task>,
    events: Vec<Event>,
}

#[derive(Debug, Parser)]
#[command(version, about = "Print task and event groups for a JSON snapshot")]
struct Args {
    /// JSON file with `tasks` and `events` arrays.
    snapshot: PathBuf,
    /// Day to group against (YYYY-MM-DD). Defaults to the local date.
    #[arg(long)]
    today: Option<NaiveDate>,
    /// Core config file; missing files fall back to defaults.
    #[arg(long, default_value = DEFAULT_CONFIG_NAME)]
    config: PathBuf,
}

fn run(args: Args) -> Result<String, String> {
    let config = CoreConfig::load_or_default(&args.config).map_err(|err| err.to_string())?;
    config.init_logging().map_err(|err| err.to_string())?;

    let raw = std::fs::read_to_string(&args.snapshot)
        .map_err(|err| format!("failed to read `{}`: {err}", args.snapshot.display()))?;
    let snapshot: Snapshot = serde_json::from_str(&raw)
        .map_err(|err| format!("invalid snapshot `{}`: {err}", args.snapshot.display()))?;

    let anchor = args.today.map_or_else(DayAnchor::local_today, DayAnchor::for_date);
    let titles = config.titles();
    let output = serde_json::json!({
        "version": core_version(),
        "today": anchor.today_key(),
        "tasks": build_task_groups(&snapshot.tasks, &anchor, titles),
        "events": build_event_groups(&snapshot.events, &anchor, titles),
    });

    info!(
        "event=cli_group module=cli status=ok tasks={} events={}",
        snapshot.tasks.len(),
        snapshot.events.len()
    );
    serde_json::to_string_pretty(&output).map_err(|err| err.to_string())
}

fn main() -> ExitCode {
    match run(Args::parse()) {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(message) => {
            eprintln!("lazylife_cli: {message}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Args;
    use chrono::NaiveDate;
    use clap::Parser;
    use lazylife_core::config::DEFAULT_CONFIG_NAME;
    use std::path::PathBuf;

    #[test]
    fn parses_today_and_defaults_config() {
        let args = Args::try_parse_from(["lazylife_cli", "snap.json", "--today", "2024-06-10"])
            .unwrap();

        assert_eq!(args.snapshot, PathBuf::from("snap.json"));
        assert_eq!(args.today, NaiveDate::from_ymd_opt(2024, 6, 10));
        assert_eq!(args.config, PathBuf::from(DEFAULT_CONFIG_NAME));
    }

    #[test]
    fn rejects_malformed_today_and_unknown_flags() {
        assert!(
            Args::try_parse_from(["lazylife_cli", "snap.json", "--today", "2024-13-01"]).is_err()
        );
        assert!(Args::try_parse_from(["lazylife_cli", "snap.json", "--verbose"]).is_err());
        assert!(Args::try_parse_from(["lazylife_cli"]).is_err());
    }

    #[test]
    fn config_path_can_be_overridden() {
        let args =
            Args::try_parse_from(["lazylife_cli", "snap.json", "--config", "alt.json"]).unwrap();
        assert_eq!(args.config, PathBuf::from("alt.json"));
        assert!(args.today.is_none());
    }
}
