use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use vim_chess::input::{KeyReader, parse_script};
use vim_chess::vim::StatusSnapshot;
use vim_chess::{Config, GameModel, PlayAs, StatusLine, Vim};

/// Play chess from the keyboard with vim-style modes
#[derive(Parser, Debug)]
#[command(name = "vim-chess", version, about)]
struct Cli {
    /// JSON config file
    #[arg(long)]
    config: Option<PathBuf>,
    /// Starting position, overrides the config
    #[arg(long)]
    fen: Option<String>,
    /// Side to play, overrides the config
    #[arg(long, value_enum)]
    play_as: Option<PlayAs>,
    /// Run a key script without opening a window, e.g. "njf<enter>"
    #[arg(long)]
    keys: Option<String>,
    /// Print the config JSON schema and exit
    #[arg(long)]
    print_schema: bool,
}

fn init_logging(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(fen) = &cli.fen {
        config.start_fen = Some(fen.clone());
    }
    if let Some(side) = cli.play_as {
        config.play_as = side;
    }
    Ok(config)
}

/// Feed a key script through a session and print the status after each key
fn run_script(game: GameModel, config: &Config, script: &str) -> anyhow::Result<()> {
    let keys = parse_script(script).with_context(|| format!("parsing key script {script:?}"))?;
    let mut reader = KeyReader::new(futures::stream::iter(keys));
    let mut vim = Vim::new(game, config.illegal_target);
    let mut presenter = |status: &StatusSnapshot| println!("{}", StatusLine::from_snapshot(status));

    futures::executor::block_on(vim.run(&mut reader, &mut presenter));

    let game = vim.board();
    println!("moves: {}", game.history().join(" "));
    println!("fen: {}", game.fen());
    Ok(())
}

#[cfg(feature = "gui")]
fn run_gui(game: GameModel, config: &Config) -> anyhow::Result<()> {
    let illegal_target = config.illegal_target;
    gpui::Application::new().run(move |cx: &mut gpui::App| {
        vim_chess::app::run(cx, game, illegal_target);
    });
    Ok(())
}

#[cfg(not(feature = "gui"))]
fn run_gui(_game: GameModel, _config: &Config) -> anyhow::Result<()> {
    anyhow::bail!("built without the `gui` feature; pass --keys to run headless")
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.print_schema {
        println!("{}", Config::schema()?);
        return Ok(());
    }

    let config = load_config(&cli)?;
    init_logging(&config.log_filter);
    info!(play_as = ?config.play_as, "starting");

    let game = GameModel::from_config(&config).context("setting up the starting position")?;
    match &cli.keys {
        Some(script) => run_script(game, &config, script),
        None => run_gui(game, &config),
    }
}
