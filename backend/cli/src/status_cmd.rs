//! CLI Status Command
//!
//! Asks a running server for its health report.

use anyhow::Result;

use intake_config::IntakeConfig;

pub async fn run(config: &IntakeConfig) -> Result<()> {
    let url = format!("http://127.0.0.1:{}/api/health", config.server.port);
    let client = reqwest::Client::builder().timeout(config.http_timeout()).build()?;

    match client.get(&url).send().await {
        Ok(resp) => {
            let body: serde_json::Value = resp.json().await?;
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
        Err(_) => {
            println!("Intake service is not running on port {}", config.server.port);
        }
    }
    Ok(())
}
