//! CLI client: ship a source file to the mock backend, print the JSON reply.

use clap::Parser;
use mock_a_parser::{client, protocol};
use std::io::Write;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Command-line arguments for the client
#[derive(Parser, Debug)]
#[command(name = "send-source")]
#[command(about = "Send a source file to the mock parser backend", long_about = None)]
struct Args {
    /// Backend address
    #[arg(short, long, default_value = protocol::DEFAULT_LISTEN)]
    addr: String,

    /// Local source file to send
    #[arg(short, long, conflicts_with = "url")]
    file: Option<PathBuf>,

    /// URL of a source file to fetch and send (file:// or http(s)://)
    #[arg(short, long)]
    url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let reply = match (&args.file, &args.url) {
        (Some(path), None) => client::send_file(&args.addr, path).await?,
        (None, Some(url)) => {
            let fetched = client::fetch_source(url).await?;
            client::send_file(&args.addr, fetched.path()).await?
        }
        _ => return Err("exactly one of --file or --url is required".into()),
    };

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(&reply)?;
    stdout.write_all(b"\n")?;
    Ok(())
}
