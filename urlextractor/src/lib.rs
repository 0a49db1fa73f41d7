pub mod commands;
pub mod handlers;

// Re-export commonly used handler functions for convenience
pub use handlers::{crawl_options_from_matches, handle_crawl, init_tracing, resolve_output_path};

pub use urlextractor_core::crawl::{
    CrawlOptions, LinkCallback, execute_crawl, extract_url_path, generate_crawl_report,
};
