use clap::Parser;
use std::path::PathBuf;

const VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), "+", env!("BUILD_NUMBER"));

#[derive(Parser, Debug)]
#[command(name = "dagstertui", version = VERSION, about = "Terminal UI for Dagster")]
pub struct Cli {
    /// Environment name from ~/.dagstertui/config.json
    #[arg(short, long, default_value = crate::config::DEFAULT_ENVIRONMENT)]
    pub environment: String,

    /// Number of recent runs fetched per job
    #[arg(short, long, default_value_t = 10, value_parser = parse_limit)]
    pub limit: usize,

    /// Read environments from this file instead of the default location
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Write debug logs to $XDG_STATE_HOME/dagstertui/debug.log
    #[arg(long)]
    pub verbose: bool,
}

fn parse_limit(s: &str) -> Result<usize, String> {
    let n: usize = s.parse().map_err(|_| format!("'{s}' is not a number"))?;
    if n == 0 {
        return Err("limit must be at least 1".to_string());
    }
    Ok(n)
}
