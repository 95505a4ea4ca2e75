use tracing_subscriber::{fmt, EnvFilter};

fn main() {
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("ffxiv_scraper=debug,info")),
        )
        .init();

    let port = std::env::var("FFXIV_SCRAPER_PORT")
        .ok()
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(17237);

    let rt = tokio::runtime::Runtime::new().expect("failed to create tokio runtime");
    rt.block_on(async move {
        if let Err(e) = ffxiv_scraper::server::start_server(port).await {
            eprintln!("server error: {}", e);
            std::process::exit(1);
        }
    });
}
