use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser, Subcommand};

use pce_client::{Credentials, PceConfig, PollPolicy};
use pce_observe::LoggerFormat;

#[derive(Parser, Debug)]
#[command(name = "pce-export")]
#[command(version, about = "Export application labels and traffic flows from a PCE")]
pub struct Args {
    #[command(flatten)]
    pub pce: PceArgs,

    /// Log output format: text, json or journald
    #[arg(long, global = true, default_value = "text")]
    pub log_format: LoggerFormat,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(ClapArgs, Debug)]
pub struct PceArgs {
    /// PCE FQDN name
    #[arg(long, global = true, env = "PCE_FQDN")]
    pub pce_fqdn: Option<String>,

    /// PCE port
    #[arg(long, global = true, env = "PCE_PORT", default_value_t = 9443)]
    pub pce_port: u16,

    /// PCE org id
    #[arg(long, global = true, env = "PCE_ORG", default_value_t = 1)]
    pub pce_org: u32,

    /// API key for authentication
    #[arg(short = 'k', long = "api-key", global = true, env = "PCE_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// API secret for authentication
    #[arg(short = 's', long = "api-secret", global = true, env = "PCE_API_SECRET", hide_env_values = true)]
    pub api_secret: Option<String>,

    /// Skip TLS certificate verification
    #[arg(long, global = true)]
    pub insecure: bool,

    /// Pause between async job status polls, in milliseconds
    #[arg(long, global = true, default_value_t = 5_000)]
    pub poll_interval_ms: u64,

    /// Give up waiting for an async job after this many seconds
    #[arg(long, global = true, default_value_t = 1_800)]
    pub poll_timeout_secs: u64,

    /// Per-request HTTP timeout, in seconds
    #[arg(long, global = true, default_value_t = 60)]
    pub request_timeout_secs: u64,
}

impl PceArgs {
    pub fn config(&self) -> PceConfig {
        PceConfig {
            fqdn: self.pce_fqdn.clone().unwrap_or_default(),
            port: self.pce_port,
            org: self.pce_org,
            credentials: Credentials::new(
                self.api_key.clone().unwrap_or_default(),
                self.api_secret.clone().unwrap_or_default(),
            ),
            verify_tls: !self.insecure,
            request_timeout_ms: self.request_timeout_secs.saturating_mul(1_000),
        }
    }

    pub fn poll_policy(&self) -> PollPolicy {
        PollPolicy {
            interval_ms: self.poll_interval_ms,
            max_attempts: None,
            timeout_ms: Some(self.poll_timeout_secs.saturating_mul(1_000)),
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Write the sorted values of all labels with one key to a text file
    Apps(AppsArgs),

    /// Export de-duplicated traffic flows to CSV
    Flows(FlowsArgs),
}

#[derive(ClapArgs, Debug)]
pub struct AppsArgs {
    /// Output text file
    #[arg(long, default_value = "IllumioApps.txt")]
    pub output_file: PathBuf,

    /// Label key to export
    #[arg(long, default_value = "app")]
    pub key: String,
}

#[derive(ClapArgs, Debug)]
pub struct FlowsArgs {
    /// Output CSV file
    #[arg(long, default_value = "illumio-algosec-export.csv")]
    pub output_file: PathBuf,

    /// Query file skeleton
    #[arg(long, default_value = "traffic-config.yaml")]
    pub query_file: PathBuf,

    /// Traffic configuration name
    #[arg(long, default_value = "default")]
    pub traffic_config: String,

    /// Label keys forming the application name, comma separated, e.g. "app" or "app,env"
    #[arg(short = 'a', long, default_value = "app")]
    pub algosec_label: String,

    /// String for concatenating label values
    #[arg(short = 'c', long, default_value = "-")]
    pub label_concat: String,

    /// Name given to the async traffic query
    #[arg(long, default_value = "daily_traffic")]
    pub query_name: String,
}
