use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Root URL of the remote control-plane API
    pub endpoint: String,
    /// Load-balancer service instance name (scopes every resource path)
    pub service_name: String,
    /// This host's public address; autodetected when unset
    pub address: Option<String>,
    pub sync_interval_secs: u64,
    pub request_timeout_secs: u64,
    /// Cap on concurrent detail fetches in a fan-out
    pub fan_out_limit: usize,
    /// Whether the remote variant exposes explicit link resources
    pub link_resources: bool,
    pub api_listen_addr: String,
    pub debug: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            service_name: String::new(),
            address: None,
            sync_interval_secs: 30,
            request_timeout_secs: 10,
            fan_out_limit: 16,
            link_resources: true,
            api_listen_addr: "0.0.0.0:8081".to_string(),
            debug: false,
        }
    }
}

pub fn load_config() -> anyhow::Result<Config> {
    let endpoint = std::env::var("EDGEREGISTRAR_ENDPOINT")
        .map_err(|_| anyhow::anyhow!("EDGEREGISTRAR_ENDPOINT is required"))?;

    let service_name = std::env::var("EDGEREGISTRAR_SERVICE")
        .map_err(|_| anyhow::anyhow!("EDGEREGISTRAR_SERVICE is required"))?;

    let address = std::env::var("EDGEREGISTRAR_ADDRESS").ok();

    let sync_interval_secs = std::env::var("EDGEREGISTRAR_SYNC_INTERVAL_SECS")
        .unwrap_or_else(|_| "30".to_string())
        .parse()
        .unwrap_or(30);

    let request_timeout_secs = std::env::var("EDGEREGISTRAR_REQUEST_TIMEOUT_SECS")
        .unwrap_or_else(|_| "10".to_string())
        .parse()
        .unwrap_or(10);

    let fan_out_limit = std::env::var("EDGEREGISTRAR_FAN_OUT_LIMIT")
        .unwrap_or_else(|_| "16".to_string())
        .parse()
        .unwrap_or(16);

    let link_resources = std::env::var("EDGEREGISTRAR_LINK_RESOURCES")
        .map(|v| v == "1" || v.to_lowercase() == "true")
        .unwrap_or(true);

    let api_listen_addr = std::env::var("EDGEREGISTRAR_API_LISTEN_ADDR")
        .unwrap_or_else(|_| "0.0.0.0:8081".to_string());

    let debug = std::env::var("DEBUG").is_ok();

    Ok(Config {
        endpoint,
        service_name,
        address,
        sync_interval_secs,
        request_timeout_secs,
        fan_out_limit,
        link_resources,
        api_listen_addr,
        debug,
    })
}
