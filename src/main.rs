//! DuSleuth: disk usage over HTTP.
//!
//! Thin binary entry point. All logic lives in the `dusleuth-core`
//! and `dusleuth-server` crates.

use anyhow::Context;
use clap::Parser;
use dusleuth_core::encode::write_lines;
use dusleuth_core::{FsReader, SystemClock, TtlCache, Walker};
use dusleuth_server::ServerConfig;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "dusleuth", version, about = "Serve a cached size breakdown of a directory tree")]
struct Cli {
    /// Print the base directory's breakdown to stdout and exit
    #[arg(long)]
    stdout: bool,

    /// Directory served as `/`
    #[arg(long, default_value = ".")]
    base_path: PathBuf,

    /// Listening port
    #[arg(long, default_value_t = dusleuth_server::config::DEFAULT_PORT)]
    port: u16,

    /// How long computed directory sizes stay fresh
    #[arg(long, value_parser = humantime::parse_duration, default_value = "30s")]
    cache_duration: Duration,

    /// Time after which a slow scan shows "please wait"
    #[arg(long, value_parser = humantime::parse_duration, default_value = "2s")]
    apology_timeout: Duration,
}

impl Cli {
    fn config(&self) -> anyhow::Result<ServerConfig> {
        let base_path = std::path::absolute(&self.base_path)
            .with_context(|| format!("invalid base path {}", self.base_path.display()))?;
        Ok(ServerConfig {
            base_path,
            port: self.port,
            cache_ttl: self.cache_duration,
            apology_timeout: self.apology_timeout,
        })
    }
}

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so `--stdout` output stays clean.
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.config()?;

    let cache = Arc::new(TtlCache::new(config.cache_ttl, Arc::new(SystemClock)));
    let walker = Walker::new(Arc::new(FsReader), cache);

    if cli.stdout {
        let report = walker.walk(&config.base_path, Path::new(""));
        let mut out = std::io::stdout().lock();
        write_lines(&report, &mut out)?;
        out.flush()?;
        return Ok(());
    }

    tracing::info!("DuSleuth starting");
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;
    runtime.block_on(dusleuth_server::serve(&config, walker))
}
