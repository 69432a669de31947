//! Terminal front-end for the engage analyzer.
//!
//! Maps CLI flags onto the client settings and hands over to the platform loop.
mod platform;

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use engage_engine::ClientSettings;

use platform::logging::LogDestination;

#[derive(Parser, Debug)]
#[command(
    name = "engage",
    version,
    about = "Upload a post image or PDF and get engagement recommendations"
)]
struct Cli {
    /// File to analyze right away. Without it an interactive session starts.
    file: Option<PathBuf>,

    /// Base URL of the analysis server.
    #[arg(long, env = "ENGAGE_SERVER", default_value = "http://127.0.0.1:5000")]
    server: String,

    /// Extraction endpoint path.
    #[arg(long, default_value = "/upload")]
    upload_path: String,

    /// Recommendation endpoint path.
    #[arg(long, default_value = "/recommend")]
    recommend_path: String,

    /// Overall request timeout in seconds. Network defaults apply when unset.
    #[arg(long)]
    timeout: Option<u64>,

    /// Where log records go.
    #[arg(long, env = "ENGAGE_LOG", value_enum, default_value = "file")]
    log: LogDestination,
}

impl Cli {
    fn client_settings(&self) -> ClientSettings {
        ClientSettings {
            base_url: self.server.clone(),
            upload_path: self.upload_path.clone(),
            recommend_path: self.recommend_path.clone(),
            request_timeout: self.timeout.map(Duration::from_secs),
            ..ClientSettings::default()
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    platform::logging::initialize(cli.log);
    let settings = cli.client_settings();
    platform::run_app(settings, cli.file)
}
