use std::time::Duration;
use clap::Args;
use crate::input::CompletionRule;

pub const DEFAULT_BASE_URL: &str = "https://viacep.com.br/ws";

/// Options shared by every command
#[derive(Debug, Clone, Args)]
pub struct LookupConfig {
    /// base URL of the ViaCEP-compatible lookup service
    #[arg(long, global = true, default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// request timeout in seconds
    #[arg(long, global = true, default_value_t = 10)]
    pub timeout_secs: u64,

    /// extra attempts after a connect error, timeout or 5xx (0 disables retrying)
    #[arg(long, global = true, default_value_t = 0)]
    pub retries: usize,

    /// accept any 8 characters as a complete code, not only 8 digits
    #[arg(long, global = true)]
    pub lenient: bool,
}

impl LookupConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn completion_rule(&self) -> CompletionRule {
        if self.lenient {
            CompletionRule::Length
        } else {
            CompletionRule::Digits
        }
    }
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 10,
            retries: 0,
            lenient: false,
        }
    }
}
