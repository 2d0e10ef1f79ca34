//! `ragline serve` — Start the HTTP answering gateway.

use anyhow::Context;
use ragline_config::AppConfig;

pub async fn run(port_override: Option<u16>) -> anyhow::Result<()> {
    let mut config = AppConfig::load().context("Failed to load configuration")?;

    if let Some(port) = port_override {
        config.gateway.port = port;
    }

    println!("Ragline Gateway");
    println!("   Listening: {}:{}", config.gateway.host, config.gateway.port);
    println!("   Model: {}", config.chat_model);

    ragline_gateway::start(config)
        .await
        .map_err(|e| anyhow::anyhow!("Gateway failed: {e}"))?;

    Ok(())
}
