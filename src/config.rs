use crate::executor::executor::RetryPolicy;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::str::FromStr;

#[derive(Debug, Clone)]
pub struct NodeConfig {
    /// HTTP bind address.
    pub bind_addr: SocketAddr,
    /// Endpoint serving the full document list for `/index`.
    pub source_url: String,
    /// Number of background workers.
    pub worker_count: usize,
    /// Attempts per background task before it is marked failed.
    pub max_attempts: u32,
    /// Maximum number of unfinished background tasks.
    pub queue_capacity: usize,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 5000)),
            source_url: "http://127.0.0.1:8000/documents".to_string(),
            worker_count: 4,
            max_attempts: 3,
            queue_capacity: 64,
        }
    }
}

impl NodeConfig {
    /// Builds the config from `WORDINDEX_*` environment variables, then `args`.
    ///
    /// Command line flags win over the environment. `args[0]` is the program name.
    pub fn from_args(args: &[String]) -> Result<Self> {
        let mut config = Self::default();
        config.apply_env()?;

        let mut i = 1;
        while i < args.len() {
            let flag = args[i].as_str();
            let value = || {
                args.get(i + 1)
                    .map(String::as_str)
                    .with_context(|| format!("{} requires a value", flag))
            };

            match flag {
                "--bind" => config.bind_addr = parse(flag, value()?)?,
                "--source-url" => config.source_url = value()?.to_string(),
                "--workers" => config.worker_count = parse(flag, value()?)?,
                "--max-attempts" => config.max_attempts = parse(flag, value()?)?,
                "--queue-capacity" => config.queue_capacity = parse(flag, value()?)?,
                _ => {
                    tracing::warn!("Ignoring unknown argument {}", flag);
                    i += 1;
                    continue;
                }
            }
            i += 2;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts,
            ..RetryPolicy::default()
        }
    }

    fn apply_env(&mut self) -> Result<()> {
        if let Ok(addr) = std::env::var("WORDINDEX_BIND_ADDR") {
            self.bind_addr = parse("WORDINDEX_BIND_ADDR", &addr)?;
        }
        if let Ok(url) = std::env::var("WORDINDEX_SOURCE_URL") {
            self.source_url = url;
        }
        if let Ok(workers) = std::env::var("WORDINDEX_WORKERS") {
            self.worker_count = parse("WORDINDEX_WORKERS", &workers)?;
        }
        if let Ok(attempts) = std::env::var("WORDINDEX_MAX_ATTEMPTS") {
            self.max_attempts = parse("WORDINDEX_MAX_ATTEMPTS", &attempts)?;
        }
        if let Ok(capacity) = std::env::var("WORDINDEX_QUEUE_CAPACITY") {
            self.queue_capacity = parse("WORDINDEX_QUEUE_CAPACITY", &capacity)?;
        }
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.worker_count == 0 {
            anyhow::bail!("worker count must be at least 1");
        }
        if self.max_attempts == 0 {
            anyhow::bail!("max attempts must be at least 1");
        }
        if self.queue_capacity == 0 {
            anyhow::bail!("queue capacity must be at least 1");
        }
        Ok(())
    }
}

fn parse<T>(name: &str, value: &str) -> Result<T>
where
    T: FromStr,
    <T as FromStr>::Err: std::fmt::Display,
{
    value
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid value {:?} for {}: {}", value, name, e))
}
