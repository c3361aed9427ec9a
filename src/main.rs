mod app;
mod commands;

use clap::Parser;
use color_eyre::Result;
use hadisatlas::config::Config;
use hadisatlas::hadeeth::Language;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "hadisatlas")]
#[command(about = "Browse the HadeethEnc encyclopedia, online or from cache")]
#[command(version)]
struct Args {
  /// Path to config file (default: $XDG_CONFIG_HOME/hadisatlas/config.yaml)
  #[arg(short, long)]
  config: Option<PathBuf>,

  /// Content language for this run (tr, en, ar)
  #[arg(short, long)]
  language: Option<Language>,

  /// Act as if the network were unreachable
  #[arg(long)]
  offline: bool,

  #[command(subcommand)]
  command: commands::Command,
}

#[tokio::main]
async fn main() -> Result<()> {
  color_eyre::install()?;

  let args = Args::parse();

  // Load configuration
  let config = Config::load(args.config.as_deref())?;
  let _guard = hadisatlas::logging::init(config.data_dir().as_deref())?;

  // Initialize and run the app
  let app = app::App::new(config, args.language, args.offline)?;
  app.run(args.command, &mut std::io::stdout().lock()).await?;

  Ok(())
}
