use clap::Parser;
use color_eyre::eyre::Result;
use crm_proxy::Config;
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();
    color_eyre::install()?;

    let config = Config::parse();
    let addr = format!("127.0.0.1:{}", config.port);
    let listener = TcpListener::bind(&addr).await?;
    info!(upstream = %config.upstream_url()?, "proxy listening on {addr}");
    crm_proxy::run(listener, &config).await
}
