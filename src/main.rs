use std::path::PathBuf;

use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use genrecli::{Res, cli, config, error, warning};

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
    /// Directory holding the class documents (overrides GENRES_DIR)
    #[clap(long, global = true)]
    genres_dir: Option<PathBuf>,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Authorize with Spotify API
    Auth,

    /// Classify all liked tracks and create class and bucket playlists
    Build(BuildOptions),

    /// Add tracks liked since the last confirmed run to existing playlists
    Update(UpdateOptions),

    /// Show details of every (auto) playlist
    Analyze,

    /// List playlists whose names look generated
    Suspects,

    /// List all playlists
    List,

    /// Show (auto) and mix playlists with their descriptions
    Check,

    /// Delete owned playlists by marker or by month
    Delete(DeleteOptions),

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct BuildOptions {
    /// Apply the changes (dry run otherwise)
    #[clap(long)]
    confirm: bool,

    /// Do not ask about genres missing from the taxonomy
    #[clap(long)]
    skip_unknown: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct UpdateOptions {
    /// Apply the changes (dry run otherwise)
    #[clap(long)]
    confirm: bool,

    /// Treat every liked track as new when no previous run is recorded
    #[clap(long)]
    all: bool,

    /// Do not ask about genres missing from the taxonomy
    #[clap(long)]
    skip_unknown: bool,
}

#[derive(Parser, Debug, Clone)]
#[command(group(
    clap::ArgGroup::new("target")
        .required(true)
        .args(["auto", "month"]),
))]
pub struct DeleteOptions {
    /// Apply the changes (dry run otherwise)
    #[clap(long)]
    confirm: bool,

    /// Delete playlists whose name carries the (auto) marker
    #[clap(long)]
    auto: bool,

    /// Delete playlists whose first track was added in this month (YYYY-MM)
    #[clap(long)]
    month: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

async fn run(cli: Cli) -> Res<()> {
    if let Command::Completions(opt) = &cli.command {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        generate(opt.shell, &mut cmd, name, &mut std::io::stdout());
        return Ok(());
    }

    let cfg = config::Config::from_env()?.with_genres_dir(cli.genres_dir);

    match cli.command {
        Command::Auth => cli::auth(&cfg).await,
        Command::Build(opt) => cli::build(&cfg, opt.confirm, opt.skip_unknown).await,
        Command::Update(opt) => cli::update(&cfg, opt.confirm, opt.all, opt.skip_unknown).await,
        Command::Analyze => cli::analyze(&cfg).await,
        Command::Suspects => cli::suspects(&cfg).await,
        Command::List => cli::list(&cfg).await,
        Command::Check => cli::check(&cfg).await,
        Command::Delete(opt) => cli::delete(&cfg, opt.confirm, opt.auto, opt.month).await,
        Command::Completions(_) => Ok(()),
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    if let Err(e) = config::load_env().await {
        warning!("Cannot load environment. Err: {}", e);
    }

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        error!("{}", e);
        std::process::exit(e.exit_code());
    }
}
