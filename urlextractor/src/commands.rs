use clap::{arg, command};
use urlextractor_scanner::fetcher::normalize_seed;

pub const CLAP_STYLING: clap::builder::styling::Styles = clap::builder::styling::Styles::styled()
    .header(clap_cargo::style::HEADER)
    .usage(clap_cargo::style::USAGE)
    .literal(clap_cargo::style::LITERAL)
    .placeholder(clap_cargo::style::PLACEHOLDER)
    .error(clap_cargo::style::ERROR)
    .valid(clap_cargo::style::VALID)
    .invalid(clap_cargo::style::INVALID);

/// Accepts seeds with or without a scheme and stores the normalized form.
fn parse_seed_url(value: &str) -> Result<String, String> {
    normalize_seed(value)
        .map(|url| url.to_string())
        .map_err(|e| e.to_string())
}

pub fn command_argument_builder() -> clap::Command {
    command!()
        .bin_name("urlextractor")
        .styles(CLAP_STYLING)
        .about("Extract every same-host URL reachable from a seed page")
        .after_help("Example: urlextractor -u https://domain.com -d -v -o output_file.txt")
        .arg(
            arg!(-u --"url" <URL>)
                .required(true)
                .help("URL to extract links from (http:// is assumed when no scheme is given)")
                .value_parser(parse_seed_url),
        )
        .arg(
            arg!(-v --"verbose")
                .help("Print each discovered URL as it is found")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            arg!(-o --"output" <PATH>)
                .required(false)
                .help("Output file name (default: <host>.txt, leading www. stripped)"),
        )
        .arg(
            arg!(-d --"deep")
                .help("Perform deep crawl: follow every discovered link")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            arg!(-t --"threads" <NUM_WORKERS>)
                .required(false)
                .help("Maximum number of concurrent fetches")
                .value_parser(clap::value_parser!(usize))
                .default_value("10"),
        )
        .arg(
            arg!(--"timeout" <SECONDS>)
                .required(false)
                .help("Per-request timeout in seconds")
                .value_parser(clap::value_parser!(u64))
                .default_value("10"),
        )
        .arg(
            arg!(--"max-depth" <DEPTH>)
                .required(false)
                .help("Do not fetch pages more than DEPTH links away from the seed (deep mode)")
                .value_parser(clap::value_parser!(usize)),
        )
        .arg(
            arg!(--"max-links" <COUNT>)
                .required(false)
                .help("Stop after discovering COUNT URLs")
                .value_parser(clap::value_parser!(usize)),
        )
        .arg(
            arg!(--"no-sitemap")
                .help("Skip sitemap discovery")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            arg!(--"json")
                .help("Print the crawl summary as JSON")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            arg!(-q --"quiet")
                .help("Suppress banner and progress output")
                .action(clap::ArgAction::SetTrue),
        )
}
