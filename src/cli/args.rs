//! CLI argument parsing.
//!
//! Hand-rolled parser over any iterator of strings so it can be tested
//! without touching `std::env::args()`.

use std::path::PathBuf;

use crate::params::{parse_assignment, ParamMap};

/// CLI arguments container.
#[derive(Debug, Clone, PartialEq)]
pub struct Args {
    /// The command to execute.
    pub command: Command,
}

/// Which part of the catalogue `list` shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CatalogueFilter {
    /// Every registered simulation.
    #[default]
    All,
    /// Free simulations only.
    Free,
    /// Premium simulations only.
    Premium,
}

/// Options shared by `run` and `series`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RunOptions {
    /// Simulation id.
    pub id: String,
    /// Simulated seconds (config default when absent).
    pub seconds: Option<f64>,
    /// Frame step for `run`, row interval for `series`.
    pub step: Option<f64>,
    /// Parameter overrides from `--set key=value`.
    pub params: ParamMap,
    /// Optional YAML config file.
    pub config: Option<PathBuf>,
    /// Optional seed override.
    pub seed: Option<u64>,
}

/// Available CLI commands.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// List the catalogue
    List {
        /// Free, premium or all.
        filter: CatalogueFilter,
    },
    /// Print a parameter schema as JSON
    Params {
        /// Simulation id.
        id: String,
    },
    /// Run a simulation headless and print its final snapshot
    Run(RunOptions),
    /// Print closed-form chart rows
    Series(RunOptions),
    /// Show help
    Help,
    /// Show version
    Version,
}

impl Args {
    /// Parse command-line arguments from an iterator.
    ///
    /// The first item is the program name.
    #[must_use]
    pub fn parse_from<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let args: Vec<String> = args.into_iter().map(|s| s.as_ref().to_string()).collect();
        Self::parse_from_vec(&args)
    }

    /// Parse command-line arguments from the environment.
    #[must_use]
    pub fn parse() -> Self {
        Self::parse_from(std::env::args())
    }

    fn parse_from_vec(args: &[String]) -> Self {
        if args.len() < 2 {
            return Self {
                command: Command::Help,
            };
        }

        let command = match args[1].as_str() {
            "list" => Self::parse_list_command(args),
            "params" => Self::parse_params_command(args),
            "run" => Self::parse_run_options(args, "--dt").map_or(Command::Help, Command::Run),
            "series" => {
                Self::parse_run_options(args, "--interval").map_or(Command::Help, Command::Series)
            }
            "-h" | "--help" | "help" => Command::Help,
            "-V" | "--version" | "version" => Command::Version,
            unknown => {
                eprintln!("Unknown command: {unknown}");
                Command::Help
            }
        };

        Self { command }
    }

    fn parse_list_command(args: &[String]) -> Command {
        let mut filter = CatalogueFilter::All;
        for arg in &args[2..] {
            match arg.as_str() {
                "--free" => filter = CatalogueFilter::Free,
                "--premium" => filter = CatalogueFilter::Premium,
                other => eprintln!("Ignoring unknown option: {other}"),
            }
        }
        Command::List { filter }
    }

    fn parse_params_command(args: &[String]) -> Command {
        match args.get(2) {
            Some(id) => Command::Params { id: id.clone() },
            None => {
                eprintln!("Error: 'params' command requires a simulation id");
                Command::Help
            }
        }
    }

    /// Parse `<id> [--seconds S] [<step_flag> X] [--set k=v]... [--config F] [--seed N]`.
    fn parse_run_options(args: &[String], step_flag: &str) -> Option<RunOptions> {
        let Some(id) = args.get(2) else {
            eprintln!("Error: '{}' command requires a simulation id", args[1]);
            return None;
        };

        let mut options = RunOptions {
            id: id.clone(),
            ..RunOptions::default()
        };

        let mut i = 3;
        while i < args.len() {
            let flag = args[i].as_str();
            let value = args.get(i + 1);
            match (flag, value) {
                ("--seconds", Some(v)) => options.seconds = parse_number(flag, v),
                (f, Some(v)) if f == step_flag => options.step = parse_number(flag, v),
                ("--set", Some(v)) => match parse_assignment(v) {
                    Ok((key, value)) => {
                        options.params.insert(key, value);
                    }
                    Err(e) => eprintln!("Error: {e}"),
                },
                ("--config", Some(v)) => options.config = Some(PathBuf::from(v)),
                ("--seed", Some(v)) => options.seed = v.parse().ok(),
                (_, None) => {
                    eprintln!("Error: option '{flag}' is missing a value");
                    i += 1;
                    continue;
                }
                _ => {
                    eprintln!("Ignoring unknown option: {flag}");
                    i += 1;
                    continue;
                }
            }
            i += 2;
        }

        Some(options)
    }
}

fn parse_number(flag: &str, raw: &str) -> Option<f64> {
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() => Some(v),
        _ => {
            eprintln!("Error: '{flag}' expects a number, got '{raw}'");
            None
        }
    }
}
