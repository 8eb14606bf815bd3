use std::fmt::Write;
use std::path::PathBuf;

use clap::{
    ArgAction, ColorChoice, Parser, ValueEnum,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};

use crate::app_dirs;

/// Produce the full version banner including config and data directories.
fn long_version() -> &'static str {
    let config_dir = match app_dirs::get_config_dir() {
        Ok(path) => path.display().to_string(),
        Err(err) => format!("unavailable ({err})"),
    };
    let data_dir = match app_dirs::get_data_dir() {
        Ok(path) => path.display().to_string(),
        Err(err) => format!("unavailable ({err})"),
    };

    let mut details = format!("receptar {}", env!("CARGO_PKG_VERSION"));
    let _ = writeln!(details);
    let _ = writeln!(details, "config directory: {config_dir}");
    let _ = writeln!(details, "data directory: {data_dir}");

    Box::leak(details.into_boxed_str())
}

/// Create the clap styles used for custom colour output.
fn cli_styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::Green.on_default().effects(Effects::BOLD))
        .usage(AnsiColor::Green.on_default().effects(Effects::BOLD))
        .literal(AnsiColor::Cyan.on_default())
        .placeholder(AnsiColor::Yellow.on_default())
}

/// Parse command line arguments into the strongly typed [`CliArgs`] structure.
pub(crate) fn parse_cli() -> CliArgs {
    CliArgs::parse()
}

#[derive(Parser, Debug)]
#[command(
    name = "receptar",
    version,
    long_version = long_version(),
    about = "Terminal typeahead search for Strapi-backed recipe collections",
    color = ColorChoice::Auto,
    styles = cli_styles()
)]
/// Command-line arguments accepted by the `receptar` binary.
pub(crate) struct CliArgs {
    #[arg(
        short,
        long = "config",
        value_name = "FILE",
        env = "RECEPTAR_CONFIG",
        action = ArgAction::Append,
        help = "Additional configuration file to merge (default: none)"
    )]
    pub(crate) config: Vec<PathBuf>,
    #[arg(
        short = 'n',
        long = "no-config",
        help = "Skip loading default configuration files (default: disabled)"
    )]
    pub(crate) no_config: bool,
    #[arg(
        short = 'b',
        long = "backend-url",
        value_name = "URL",
        env = "RECEPTAR_BACKEND_URL",
        help = "Base URL of the CMS backend (default: none; runs without remote suggestions)"
    )]
    pub(crate) backend_url: Option<String>,
    #[arg(
        long,
        value_name = "NAME",
        help = "Collection to search (default: recepteks)"
    )]
    pub(crate) collection: Option<String>,
    #[arg(
        long,
        value_name = "TOKEN",
        env = "STRAPI_API_TOKEN",
        hide_env_values = true,
        help = "API token for the view-counter and rating writes (default: none)"
    )]
    pub(crate) token: Option<String>,
    #[arg(
        short = 'q',
        long = "query",
        value_name = "QUERY",
        help = "Seed the prompt with an initial query (default: empty)"
    )]
    pub(crate) initial_query: Option<String>,
    #[arg(
        short = 't',
        long,
        value_name = "TITLE",
        help = "Override the prompt title (default: Recipe search)"
    )]
    pub(crate) title: Option<String>,
    #[arg(
        long,
        value_name = "COUNT",
        help = "Maximum number of suggestions to show (default: 5)"
    )]
    pub(crate) limit: Option<usize>,
    #[arg(
        long = "debounce-ms",
        value_name = "MS",
        help = "Quiet period between keystrokes and a lookup (default: 300)"
    )]
    pub(crate) debounce_ms: Option<u64>,
    #[arg(
        long,
        value_name = "STARS",
        value_parser = clap::value_parser!(u8).range(1..=5),
        help = "Rate the selected recipe 1-5 after the search (default: none)"
    )]
    pub(crate) rate: Option<u8>,
    #[arg(
        long = "no-view-count",
        help = "Skip the view-counter bump on selection (default: disabled)"
    )]
    pub(crate) no_view_count: bool,
    #[arg(
        long = "print-config",
        help = "Print the effective configuration before starting (default: disabled)"
    )]
    pub(crate) print_config: bool,
    #[arg(
        short = 'o',
        long,
        value_enum,
        default_value_t = OutputFormat::Plain,
        help = "Output format for the session outcome (default: plain)"
    )]
    pub(crate) output: OutputFormat,
}

/// Supported output formats for the final report.
#[derive(ValueEnum, Clone, Copy, Debug)]
pub(crate) enum OutputFormat {
    Plain,
    Json,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        CliArgs::command().debug_assert();
    }

    #[test]
    fn rate_rejects_out_of_range_values() {
        let result = CliArgs::try_parse_from(["receptar", "--rate", "6"]);
        assert!(result.is_err());
        let result = CliArgs::try_parse_from(["receptar", "--rate", "5"]);
        assert_eq!(result.unwrap().rate, Some(5));
    }
}
