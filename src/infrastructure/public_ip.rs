//! Public Address Detection
//!
//! Resolves the host's public IP when none is configured. The server
//! record registered with the load balancer is keyed by this address.

use std::net::IpAddr;
use std::time::Duration;

/// Fetch the public IP from the AWS checkip service.
pub async fn fetch_public_ip() -> Option<IpAddr> {
    let client = match reqwest::Client::builder()
        .timeout(Duration::from_secs(5))
        .build()
    {
        Ok(client) => client,
        Err(_) => return None,
    };

    let response = match client.get("https://checkip.amazonaws.com/").send().await {
        Ok(response) => response,
        Err(err) => {
            tracing::warn!("failed to fetch public IP: {}", err);
            return None;
        }
    };

    let text = match response.text().await {
        Ok(text) => text.trim().to_string(),
        Err(_) => return None,
    };

    match text.parse::<IpAddr>() {
        Ok(ip) => {
            tracing::info!("public IP detected: {}", ip);
            Some(ip)
        }
        Err(_) => None,
    }
}
