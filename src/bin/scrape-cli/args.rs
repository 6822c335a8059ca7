use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use scrape_client::{JobStatus, SortOrder};

#[derive(Parser, Debug)]
#[command(
    name = "scrape-cli",
    version,
    about = "Command-line access to the scraping job service"
)]
pub struct CliArgs {
    /// Config file; defaults to <config dir>/scrape-client/config.toml
    #[arg(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,
    /// Overrides base_url from config and SCRAPE_API_URL
    #[arg(long, global = true)]
    pub base_url: Option<String>,
    /// Request ceiling in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,
    /// Writes logs to a rotating file instead of stderr
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Single liveness call
    Health {
        /// Use /api/v1/health instead of /health
        #[arg(long)]
        versioned: bool,
    },
    /// Poll liveness and print each health change until interrupted
    Watch {
        /// Poll interval; defaults to health.interval_ms
        #[arg(long)]
        interval_ms: Option<u64>,
        #[arg(long)]
        versioned: bool,
    },
    /// List jobs
    Jobs(JobsArgs),
    /// Show one job
    Job { id: String },
    /// Submit a scraping job
    Submit(SubmitArgs),
    /// Cancel a job
    Cancel { id: String },
    /// Fetch the results of a job
    Results {
        id: String,
        #[arg(long)]
        html: bool,
        #[arg(long)]
        screenshot: bool,
    },
}

#[derive(Args, Debug)]
pub struct JobsArgs {
    #[arg(long)]
    pub status: Option<JobStatus>,
    #[arg(long)]
    pub limit: Option<u32>,
    #[arg(long)]
    pub offset: Option<u32>,
    #[arg(long)]
    pub sort_by: Option<String>,
    #[arg(long, value_enum)]
    pub order: Option<OrderArg>,
}

#[derive(Args, Debug)]
pub struct SubmitArgs {
    pub url: String,
    /// CSS selector to wait for before capturing
    #[arg(long)]
    pub wait_for: Option<String>,
    #[arg(long)]
    pub javascript: bool,
    #[arg(long)]
    pub screenshot: bool,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum OrderArg {
    Asc,
    Desc,
}

impl From<OrderArg> for SortOrder {
    fn from(order: OrderArg) -> Self {
        match order {
            OrderArg::Asc => Self::Asc,
            OrderArg::Desc => Self::Desc,
        }
    }
}
