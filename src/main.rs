use anyhow::Result;
use linktrack::{config, logging, server};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let config = config::load_from_env()?;

    logging::init_tracing(&config.log_level, &config.log_format)?;
    config.print_summary();

    server::run(config).await
}
