use clap::ArgMatches;
use colored::Colorize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use urlextractor_core::crawl::{
    CrawlOptions, LinkCallback, execute_crawl, generate_crawl_report, summary_json,
};
use urlextractor_core::output::default_output_path;
use urlextractor_scanner::DiscoveredLink;

/// Install the tracing subscriber. `RUST_LOG` wins over the verbosity default.
pub fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "urlextractor=info,urlextractor_core=info,urlextractor_scanner=info"
    } else {
        "urlextractor=warn,urlextractor_core=warn,urlextractor_scanner=warn"
    };

    // A second init (tests, embedding) keeps the first subscriber.
    let _ = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

/// Output path from `-o`, with `~` expanded, or the seed-derived default.
pub fn resolve_output_path(seed: &str, output: Option<&String>) -> PathBuf {
    match output {
        Some(path) => PathBuf::from(shellexpand::tilde(path).as_ref()),
        None => default_output_path(seed),
    }
}

/// Map parsed arguments onto crawl options
pub fn crawl_options_from_matches(sub_matches: &ArgMatches) -> CrawlOptions {
    let url = sub_matches
        .get_one::<String>("url")
        .cloned()
        .unwrap_or_default();
    let output = resolve_output_path(&url, sub_matches.get_one::<String>("output"));
    let verbose = sub_matches.get_flag("verbose");
    let quiet = sub_matches.get_flag("quiet");
    let json = sub_matches.get_flag("json");

    CrawlOptions {
        output,
        deep: sub_matches.get_flag("deep"),
        threads: *sub_matches.get_one::<usize>("threads").unwrap_or(&10),
        timeout_secs: *sub_matches.get_one::<u64>("timeout").unwrap_or(&10),
        max_depth: sub_matches.get_one::<usize>("max-depth").copied(),
        max_links: sub_matches.get_one::<usize>("max-links").copied(),
        use_sitemap: !sub_matches.get_flag("no-sitemap"),
        // Verbose mode prints each URL instead of animating.
        show_progress_bars: !(verbose || quiet || json),
        url,
    }
}

pub async fn handle_crawl(sub_matches: &ArgMatches) {
    let verbose = sub_matches.get_flag("verbose");
    let json = sub_matches.get_flag("json");
    init_tracing(verbose);

    let options = crawl_options_from_matches(sub_matches);
    let output = options.output.clone();
    debug!(
        "Seed {} -> {} (deep: {}, threads: {})",
        options.url,
        output.display(),
        options.deep,
        options.threads
    );

    if !json {
        println!(
            "{} {} {}",
            "→".blue(),
            "Extracting URLs from".bright_white(),
            options.url.bright_cyan()
        );
        println!(
            "{} {}",
            "→".blue(),
            if options.deep {
                "Deep crawl: following every discovered link"
            } else {
                "Seed page only (use -d for a deep crawl)"
            }
        );
        println!();
    }

    let link_callback: Option<LinkCallback> = if verbose && !json {
        Some(Arc::new(|link: &DiscoveredLink| {
            println!("{}", link.url);
        }))
    } else {
        None
    };

    let summary = match execute_crawl(options, link_callback).await {
        Ok(summary) => summary,
        Err(e) => {
            eprintln!("{} {:#}", "✗".red().bold(), e);
            std::process::exit(1);
        }
    };

    if json {
        match summary_json(&summary) {
            Ok(text) => println!("{}", text),
            Err(e) => {
                eprintln!("{} {:#}", "✗".red().bold(), e);
                std::process::exit(1);
            }
        }
        return;
    }

    println!("\n{} Extraction complete!\n", "✓".green().bold());
    print!("{}", generate_crawl_report(&summary, &output));
}
