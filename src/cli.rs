use clap::Parser;
use std::path::PathBuf;

/// RetailCloud admin host - serves the admin UI and its category field schemas
#[derive(Parser, Debug, Clone)]
#[command(name = "retailcloud", version, about, long_about = None)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, env = "RETAILCLOUD_CONFIG", default_value = "retailcloud.toml")]
    pub config: PathBuf,

    /// Server host address
    #[arg(long, env = "RETAILCLOUD_HOST")]
    pub host: Option<String>,

    /// Server port
    #[arg(long, env = "RETAILCLOUD_PORT")]
    pub port: Option<u16>,

    /// Directory with one category definition per file
    #[arg(long, env = "RETAILCLOUD_CATEGORIES_DIR")]
    pub categories_dir: Option<PathBuf>,

    /// Tenant used when a request has no X-Tenant-ID header
    #[arg(long, env = "RETAILCLOUD_DEFAULT_TENANT")]
    pub default_tenant: Option<String>,

    /// Do not reload category definitions when they change
    #[arg(long, env = "RETAILCLOUD_NO_WATCH")]
    pub no_watch: bool,
}
