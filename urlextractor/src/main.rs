use urlextractor::commands::command_argument_builder;
use urlextractor::handlers::handle_crawl;
use urlextractor_core::print_banner;

#[tokio::main]
async fn main() {
    let cmd = command_argument_builder();
    let matches = cmd.get_matches();

    // Show banner unless --quiet or --json is set
    if !matches.get_flag("quiet") && !matches.get_flag("json") {
        print_banner();
    }

    handle_crawl(&matches).await;
}
