use std::path::PathBuf;

use clap::{Arg, ArgAction, Command, value_parser};
use clap_complete::Shell;

pub fn build_cli() -> Command {
    Command::new("runwatch")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Browse platform entities and watch background task runs")
        .long_about("runwatch queries a platform's entity listing with search, facet filters and pagination, and follows a single task run until it finishes. Data comes from a JSON snapshot of the platform passed with --data or configured in .runwatch/config.toml.")
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .help("Only log errors")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("data")
                .long("data")
                .value_name("FILE")
                .help("Platform snapshot to serve (overrides config)")
                .value_parser(value_parser!(PathBuf))
                .global(true),
        )
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("list")
                .about("List entities matching the given filters")
                .arg(
                    Arg::new("search")
                        .long("search")
                        .short('s')
                        .help("Case-insensitive name search")
                )
                .arg(
                    Arg::new("status")
                        .long("status")
                        .help("Keep entities with this status (repeatable)")
                        .action(ArgAction::Append)
                )
                .arg(
                    Arg::new("tag")
                        .long("tag")
                        .help("Keep entities carrying this tag (repeatable)")
                        .action(ArgAction::Append)
                )
                .arg(
                    Arg::new("label")
                        .long("label")
                        .help("Keep entities carrying this label (repeatable)")
                        .action(ArgAction::Append)
                )
                .arg(
                    Arg::new("feature")
                        .long("feature")
                        .help("Keep entities using this feature (repeatable)")
                        .action(ArgAction::Append)
                )
                .arg(
                    Arg::new("page")
                        .long("page")
                        .short('p')
                        .help("Zero-based page index")
                        .value_parser(value_parser!(i64).range(0..))
                )
                .arg(
                    Arg::new("page-size")
                        .long("page-size")
                        .help("Rows per page (overrides config)")
                        .value_parser(value_parser!(u32).range(1..))
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .help("Output in JSON format")
                        .action(ArgAction::SetTrue)
                )
        )
        .subcommand(
            Command::new("watch")
                .about("Follow a task run until it finishes")
                .arg(
                    Arg::new("task-id")
                        .help("Task the run belongs to")
                        .required(true)
                        .index(1)
                )
                .arg(
                    Arg::new("run-id")
                        .help("Run to follow")
                        .required(true)
                        .index(2)
                )
                .arg(
                    Arg::new("refreshes")
                        .long("refreshes")
                        .short('n')
                        .help("Stop after this many successful refreshes")
                        .value_parser(value_parser!(u64).range(1..))
                )
                .arg(
                    Arg::new("interval-ms")
                        .long("interval-ms")
                        .help("Milliseconds between refreshes (overrides config)")
                        .value_parser(value_parser!(u64).range(1..))
                )
        )
        .subcommand(
            Command::new("completions")
                .about("Generate shell completion scripts")
                .arg(
                    Arg::new("shell")
                        .help("Target shell")
                        .required(true)
                        .value_parser(value_parser!(Shell))
                )
        )
}
