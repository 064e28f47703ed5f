use clap::Parser;

use super::constants::{ENV_COLLECTOR_CAPACITY, ENV_HOST, ENV_LOG_JSON, ENV_PORT};

#[derive(Parser, Debug)]
#[command(name = "traceloom")]
#[command(version, about = "Trace normalization hub for LLM instrumentation", long_about = None)]
pub struct Cli {
    /// Server host address
    #[arg(long, short = 'H', env = ENV_HOST)]
    pub host: Option<String>,

    /// Server port
    #[arg(long, short = 'p', env = ENV_PORT)]
    pub port: Option<u16>,

    /// Emit logs as JSON
    #[arg(long, env = ENV_LOG_JSON)]
    pub log_json: bool,

    /// Number of canonical traces the in-memory collector retains
    #[arg(long, env = ENV_COLLECTOR_CAPACITY)]
    pub collector_capacity: Option<usize>,
}

pub fn parse() -> Cli {
    Cli::parse()
}
