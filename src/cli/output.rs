//! CLI output formatting.
//!
//! Formatting returns strings so it can be tested; the `print_*` wrappers
//! write to stdout.

use crate::metadata::SimulationMetadata;

/// Version line, with the git hash when the build captured one.
#[must_use]
pub fn version_string() -> String {
    let version = option_env!("PHYSVERSE_VERSION").unwrap_or(env!("CARGO_PKG_VERSION"));
    match option_env!("GIT_HASH").filter(|h| !h.is_empty()) {
        Some(hash) => format!("physverse {version} ({})", &hash[..hash.len().min(12)]),
        None => format!("physverse {version}"),
    }
}

/// Print version information.
pub fn print_version() {
    println!("{}", version_string());
}

/// Print help message.
pub fn print_help() {
    println!(
        r"physverse - Frame-driven physics simulation core

USAGE:
    physverse <COMMAND> [OPTIONS]

COMMANDS:
    list                        List available simulations
        --free                  Only the free catalogue
        --premium               Only the premium catalogue

    params <id>                 Print the parameter schema as JSON

    run <id>                    Run headless and print the final snapshot
        --seconds <S>           Simulated seconds (default from config: 10)
        --dt <D>                Frame step in seconds (default: 1/60)
        --set <key=value>       Override a parameter (repeatable)
        --config <file.yaml>    Load settings from a config file
        --seed <N>              Override the seed of stochastic models

    series <id>                 Print closed-form chart rows as JSON
        --seconds <S>           Time span (default from config: 10)
        --interval <I>          Seconds between rows (default: 0.1)
        --set <key=value>       Override a parameter (repeatable)
        --config <file.yaml>    Load settings from a config file

    help                        Show this help message
    version                     Show version information

EXAMPLES:
    physverse list --free
    physverse params projectile
    physverse run projectile --seconds 3 --set angle=30
    physverse run n-body --set bodyCount=100 --seed 7
    physverse series spring-mass --seconds 4 --interval 0.05

Set RUST_LOG=physverse=debug to see parameter fallbacks and guard events.
"
    );
}

/// Catalogue table, one simulation per line.
#[must_use]
pub fn format_catalogue<'a>(entries: impl IntoIterator<Item = &'a SimulationMetadata>) -> String {
    let entries: Vec<&SimulationMetadata> = entries.into_iter().collect();
    let id_width = entries.iter().map(|m| m.id.len()).max().unwrap_or(2).max(2);
    let category_width = entries
        .iter()
        .map(|m| m.category.len())
        .max()
        .unwrap_or(8)
        .max(8);

    let mut out = format!(
        "{:<id_width$}  {:<category_width$}  {:<12}  {:<7}  NAME\n",
        "ID", "CATEGORY", "DIFFICULTY", "TIER"
    );
    for m in &entries {
        let tier = if m.premium { "premium" } else { "free" };
        out.push_str(&format!(
            "{:<id_width$}  {:<category_width$}  {:<12}  {:<7}  {}\n",
            m.id,
            m.category,
            m.difficulty.to_string(),
            tier,
            m.name
        ));
    }
    out.push_str(&format!("\n{} simulation(s)\n", entries.len()));
    out
}

/// Pretty JSON, or a compact fallback if pretty printing fails.
#[must_use]
pub fn format_json(value: &serde_json::Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}
