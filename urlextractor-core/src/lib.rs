pub mod crawl;
pub mod output;

use colored::Colorize;

pub const TOOL_NAME: &str = "urlextractor";

pub fn print_banner() {
    println!(
        "{} {} {}",
        TOOL_NAME.bright_yellow().bold(),
        format!("v{}", env!("CARGO_PKG_VERSION")).bright_white(),
        "- same-host URL discovery".dimmed()
    );
    println!();
}
