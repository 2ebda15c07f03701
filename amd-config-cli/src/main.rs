use anyhow::bail;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Statically discovers the AMD loader configuration governing a file and
/// prints it as JSON.
#[derive(Parser, Debug)]
#[command(author, version)]
struct Cli {
  /// File or directory to discover configuration for.
  path: PathBuf,

  /// Pretty-print the JSON output.
  #[arg(long)]
  pretty: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::from_default_env())
    .with_writer(std::io::stderr)
    .init();
  let cli = Cli::parse();
  let context = std::path::absolute(&cli.path)?;
  match amd_config::discover_config(&context).await {
    Some(config) => {
      let json = if cli.pretty {
        serde_json::to_string_pretty(&config)?
      } else {
        serde_json::to_string(&config)?
      };
      println!("{}", json);
      Ok(())
    }
    None => bail!("no AMD configuration found for {}", cli.path.display()),
  }
}
