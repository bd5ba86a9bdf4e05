use clap::Parser;
use database::Database;
use std::time::Duration;

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub config: Config,
}

#[derive(Clone, Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    #[arg(long, env = "PORT", default_value = "3000")]
    pub port: u16,

    /// Artificial delay applied to every store access, in milliseconds
    #[arg(long, env = "MOCK_LATENCY_MS", default_value = "300")]
    pub mock_latency_ms: u64,
}

impl Config {
    pub fn mock_latency(&self) -> Duration {
        Duration::from_millis(self.mock_latency_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::try_parse_from(["finance-tracker"]).unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.mock_latency(), Duration::from_millis(300));
    }

    #[test]
    fn test_flags_override_defaults() {
        let config =
            Config::try_parse_from(["finance-tracker", "--port", "8080", "--mock-latency-ms", "0"]).unwrap();
        assert_eq!(config.port, 8080);
        assert!(config.mock_latency().is_zero());
    }
}
