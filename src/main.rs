use std::path::PathBuf;

use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use chartlist::{cli, config, error, warning};

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  author=env!("CARGO_PKG_AUTHORS"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    /// Credential file to read and update instead of the one in the data directory
    #[clap(long, global = true)]
    env_file: Option<PathBuf>,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Build the playlist for a chart date
    Run(RunOptions),

    /// Authorize with Spotify API
    Auth(AuthOptions),

    /// List dates that already have a playlist
    History(HistoryOptions),

    /// Show the songs of a chart date
    Chart(ChartOptions),

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct RunOptions {
    /// Chart date (YYYY-MM-DD); prompted for when omitted
    #[clap(long)]
    pub date: Option<String>,

    /// Capture the authorization code with a local callback server
    #[clap(long)]
    pub callback: bool,

    /// Exit with status 2 when anything was skipped or failed
    #[clap(long)]
    pub strict: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct AuthOptions {
    /// Capture the authorization code with a local callback server
    #[clap(long)]
    pub callback: bool,

    /// Drop the stored access token and authorize again
    #[clap(long)]
    pub reset: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct HistoryOptions {
    /// Only show this date (YYYY-MM-DD)
    #[clap(long)]
    pub date: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct ChartOptions {
    /// Chart date (YYYY-MM-DD); prompted for when omitted
    #[clap(long)]
    pub date: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let env_path = match config::load_env(cli.env_file.clone()).await {
        Ok(path) => path,
        Err(e) => error!("Cannot load environment. Err: {}", e),
    };
    let settings = config::Settings::from_env();

    match cli.command {
        Command::Run(opt) => {
            let outcome = cli::run(&settings, &env_path, opt.date, opt.callback).await;
            if opt.strict && outcome.is_partial_failure() {
                warning!("Run finished at stage '{}' with failures", outcome.final_stage());
                std::process::exit(2);
            }
        }
        Command::Auth(opt) => {
            if !cli::auth(&settings, &env_path, opt.callback, opt.reset).await {
                std::process::exit(1);
            }
        }
        Command::History(opt) => cli::history(&settings, opt.date).await,
        Command::Chart(opt) => cli::chart(&settings, opt.date).await,
        Command::Completions(opt) => {
            let mut cmd = Cli::command_for_update();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout())
        }
    }
}
