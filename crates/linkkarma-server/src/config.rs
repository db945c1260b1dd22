//! Runtime configuration, from flags with environment fallbacks.

use std::net::SocketAddr;
use std::time::Duration;

use clap::Args;
use linkkarma_ai::gemini::{DEFAULT_BASE_URL, DEFAULT_MODEL, GeminiConfig};

/// Model access settings shared by every subcommand that calls the LLM.
#[derive(Debug, Clone, Args)]
pub struct LlmConfig {
    /// Gemini API key.
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub gemini_api_key: String,

    #[arg(long, env = "GEMINI_MODEL", default_value = DEFAULT_MODEL)]
    pub gemini_model: String,

    #[arg(long, env = "GEMINI_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub gemini_base_url: String,

    /// Per-call model timeout, in seconds.
    #[arg(long, env = "LLM_TIMEOUT_SECS", default_value_t = 30)]
    pub llm_timeout_secs: u64,
}

impl LlmConfig {
    pub fn gemini(&self) -> GeminiConfig {
        GeminiConfig {
            api_key: self.gemini_api_key.clone(),
            model: self.gemini_model.clone(),
            base_url: self.gemini_base_url.clone(),
            timeout: Duration::from_secs(self.llm_timeout_secs),
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct FetchConfig {
    /// Referral page fetch timeout, in seconds.
    #[arg(long, env = "FETCH_TIMEOUT_SECS", default_value_t = 10)]
    pub fetch_timeout_secs: u64,
}

impl FetchConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}

#[derive(Debug, Clone, Args)]
pub struct Config {
    #[arg(long, env = "LINKKARMA_HOST", default_value = "0.0.0.0")]
    pub host: String,

    #[arg(long, env = "LINKKARMA_PORT", default_value_t = 3000)]
    pub port: u16,

    /// Artificial latency added to every store call, in milliseconds.
    #[arg(long, env = "STORE_LATENCY_MS", default_value_t = 300)]
    pub store_latency_ms: u64,

    /// Start the store with demo showcases.
    #[arg(long, env = "SEED_SHOWCASES", default_value_t = true, action = clap::ArgAction::Set)]
    pub seed_showcases: bool,

    #[command(flatten)]
    pub llm: LlmConfig,

    #[command(flatten)]
    pub fetch: FetchConfig,
}

impl Config {
    pub fn address(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.host, self.port).parse()
    }

    pub fn store_latency(&self) -> Duration {
        Duration::from_millis(self.store_latency_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Cli {
        #[command(flatten)]
        config: Config,
    }

    #[test]
    fn defaults_apply() {
        let cli = Cli::try_parse_from(["linkkarma", "--gemini-api-key", "k"]).unwrap();
        let config = cli.config;
        assert_eq!(config.port, 3000);
        assert_eq!(config.store_latency(), Duration::from_millis(300));
        assert!(config.seed_showcases);
        assert_eq!(config.fetch.timeout(), Duration::from_secs(10));
        assert_eq!(config.llm.gemini().timeout, Duration::from_secs(30));
        assert_eq!(config.address().unwrap().port(), 3000);
    }

    #[test]
    fn seeding_can_be_disabled() {
        let cli = Cli::try_parse_from([
            "linkkarma",
            "--gemini-api-key",
            "k",
            "--seed-showcases",
            "false",
            "--port",
            "8080",
        ])
        .unwrap();
        assert!(!cli.config.seed_showcases);
        assert_eq!(cli.config.port, 8080);
    }
}
