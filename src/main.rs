mod app;
mod cards;
mod config;
mod edit;
mod input;
mod logging;
mod ui;
mod view;

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::{bail, WrapErr};
use crossterm::event::{
    DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture,
};

use cards::storage::{FileStore, MemoryStore, Persistence, StorageError};
use cards::{Card, CardStore};
use config::{ConfigError, UiConfig};

#[derive(Parser)]
#[command(name = "cardlist", about = "A minimal card list for quick notes")]
struct Cli {
    /// Data directory (defaults to ~/.cardlist)
    #[arg(long, global = true, env = "CARDLIST_DIR")]
    dir: Option<PathBuf>,

    /// Log level override (off, error, warn, info, debug, trace)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Keep cards in memory only; nothing is written to the data directory
    #[arg(long, global = true)]
    ephemeral: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Add a card to the top of the list
    Add {
        /// Card text
        text: String,
    },
    /// List all cards, newest first
    List,
    /// Replace a card's text (empty text deletes the card)
    Edit {
        /// Card ID (e.g. c_lq2x8k3ab12)
        card_id: String,
        /// New text
        text: String,
    },
    /// Delete a card
    Rm {
        /// Card ID
        card_id: String,
    },
    /// Delete all cards
    Clear {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Print the path of the store file
    Path,
}

fn main() {
    // Install color_eyre for unexpected panics/errors (developer bugs).
    let _ = color_eyre::install();
    let cli = Cli::parse();
    let data_dir = config::resolve_data_dir(cli.dir.as_deref());

    if let Err(e) = run_cli(cli, &data_dir) {
        print_user_error(&e);
        std::process::exit(1);
    }
}

fn run_cli(cli: Cli, data_dir: &Path) -> color_eyre::Result<()> {
    let config = config::load_config(data_dir)?;
    let store_path = FileStore::new(data_dir).path_for(&config.store.key)?;

    // Ephemeral runs leave nothing behind in the data directory, logs included.
    let level = cli.log_level.as_deref().unwrap_or(&config.log.level);
    let _logger = if cli.ephemeral {
        None
    } else {
        match logging::init_logging(level, data_dir) {
            Ok(handle) => Some(handle),
            Err(e) => {
                eprintln!("warning: logging disabled: {e}");
                None
            }
        }
    };

    let persistence = if cli.ephemeral {
        Persistence::new(Box::new(MemoryStore::new()), config.store.key.as_str())
    } else {
        Persistence::new(Box::new(FileStore::new(data_dir)), config.store.key.as_str())
    };
    let mut store = CardStore::open(persistence);

    match cli.command {
        Some(Command::Add { text }) => cmd_add(&mut store, &text),
        Some(Command::List) => cmd_list(&store),
        Some(Command::Edit { card_id, text }) => cmd_edit(&mut store, &card_id, &text),
        Some(Command::Rm { card_id }) => cmd_rm(&mut store, &card_id),
        Some(Command::Clear { yes }) => cmd_clear(&mut store, yes, &mut io::stdin().lock()),
        Some(Command::Path) => {
            println!("{}", store_path.display());
            Ok(())
        }
        None => cmd_tui(&mut store, &config.ui),
    }
}

/// Print a user-friendly error message, with actionable hints for known error types.
fn print_user_error(error: &color_eyre::Report) {
    if let Some(storage_err) = error.downcast_ref::<StorageError>() {
        match storage_err {
            StorageError::Io(e) => {
                eprintln!("error: could not read or write the card store.");
                eprintln!("  {e}");
                eprintln!("  Check the data directory's permissions, or pass --dir.");
            }
            StorageError::Json(e) => {
                eprintln!("error: could not encode cards.");
                eprintln!("  {e}");
            }
            StorageError::InvalidKey(key) => {
                eprintln!("error: invalid store key {key:?} in config.toml.");
                eprintln!("  Keys may only contain letters, digits, '-' and '_'.");
            }
        }
        return;
    }

    if let Some(config_err) = error.downcast_ref::<ConfigError>() {
        match config_err {
            ConfigError::Io { path, source } => {
                eprintln!("error: could not read {}.", path.display());
                eprintln!("  {source}");
            }
            ConfigError::Toml { path, source } => {
                eprintln!("error: {} is not valid.", path.display());
                eprintln!("  {source}");
                eprintln!("  Fix or remove the file to use the defaults.");
            }
        }
        return;
    }

    // For eyre::eyre!() / bail!() messages, print the full error chain.
    eprintln!("error: {e:#}", e = error);
}

/// Surface a failed write from the last mutation.
fn check_saved(store: &mut CardStore) -> color_eyre::Result<()> {
    match store.take_write_error() {
        Some(e) => Err(e.into()),
        None => Ok(()),
    }
}

fn cmd_add(store: &mut CardStore, text: &str) -> color_eyre::Result<()> {
    let Some(id) = store.add_front(text).map(|c| c.id.clone()) else {
        bail!("Card text is empty");
    };
    check_saved(store)?;
    println!("Added {id}");
    Ok(())
}

fn format_card_list(cards: &[Card]) -> String {
    if cards.is_empty() {
        return "No cards yet. Add one with `cardlist add \"text\"`.".to_string();
    }
    let id_width = cards.iter().map(|c| c.id.len()).max().unwrap_or(0);
    cards
        .iter()
        .map(|c| format!("  {:<id_width$}  {}", c.id, c.text))
        .collect::<Vec<_>>()
        .join("\n")
}

fn cmd_list(store: &CardStore) -> color_eyre::Result<()> {
    println!("{}", format_card_list(store.cards()));
    Ok(())
}

fn cmd_edit(store: &mut CardStore, card_id: &str, text: &str) -> color_eyre::Result<()> {
    if !store.update_text(card_id, text) {
        bail!("Card '{card_id}' not found");
    }
    check_saved(store)?;
    if store.get(card_id).is_some() {
        println!("Updated {card_id}");
    } else {
        println!("Deleted {card_id} (empty text)");
    }
    Ok(())
}

fn cmd_rm(store: &mut CardStore, card_id: &str) -> color_eyre::Result<()> {
    if !store.remove(card_id) {
        bail!("Card '{card_id}' not found");
    }
    check_saved(store)?;
    println!("Deleted {card_id}");
    Ok(())
}

fn cmd_clear(store: &mut CardStore, yes: bool, input: &mut impl BufRead) -> color_eyre::Result<()> {
    if store.is_empty() {
        println!("No cards to clear.");
        return Ok(());
    }
    if !yes {
        print!("Delete all {} cards? (y/n) ", store.len());
        io::stdout().flush()?;
        let mut answer = String::new();
        input.read_line(&mut answer)?;
        if !answer.trim().eq_ignore_ascii_case("y") {
            println!("Nothing deleted.");
            return Ok(());
        }
    }
    let count = store.len();
    store.clear();
    check_saved(store)?;
    println!("Deleted {count} cards");
    Ok(())
}

fn set_capture(ui: &UiConfig, enable: bool) -> io::Result<()> {
    let mut out = io::stdout();
    if enable {
        crossterm::execute!(out, EnableFocusChange)?;
        if ui.mouse {
            crossterm::execute!(out, EnableMouseCapture)?;
        }
    } else {
        if ui.mouse {
            crossterm::execute!(out, DisableMouseCapture)?;
        }
        crossterm::execute!(out, DisableFocusChange)?;
    }
    Ok(())
}

fn cmd_tui(store: &mut CardStore, ui: &UiConfig) -> color_eyre::Result<()> {
    let mut terminal = ratatui::init();
    let result = set_capture(ui, true)
        .wrap_err("failed to enable mouse capture")
        .and_then(|()| app::run(&mut terminal, store, ui));
    let _ = set_capture(ui, false);
    ratatui::restore();
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Cursor;

    fn file_store(dir: &Path) -> CardStore {
        CardStore::open(Persistence::new(Box::new(FileStore::new(dir)), "cards"))
    }

    fn stored(dir: &Path) -> Vec<Card> {
        let raw = fs::read_to_string(dir.join("cards.json")).unwrap();
        serde_json::from_str(&raw).unwrap()
    }

    #[test]
    fn cli_parses_subcommands_and_globals() {
        let cli = Cli::try_parse_from(["cardlist", "add", "Buy milk", "--dir", "/tmp/x"]).unwrap();
        assert_eq!(cli.dir.as_deref(), Some(Path::new("/tmp/x")));
        assert!(matches!(cli.command, Some(Command::Add { ref text }) if text == "Buy milk"));

        let cli = Cli::try_parse_from(["cardlist", "--ephemeral"]).unwrap();
        assert!(cli.ephemeral);
        assert!(cli.command.is_none());

        let cli = Cli::try_parse_from(["cardlist", "clear", "-y"]).unwrap();
        assert!(matches!(cli.command, Some(Command::Clear { yes: true })));
    }

    #[test]
    fn ephemeral_run_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let cli =
            Cli::try_parse_from(["cardlist", "--ephemeral", "add", "scratch"]).unwrap();
        run_cli(cli, dir.path()).unwrap();
        assert!(!dir.path().join("logs").exists());
        assert!(!dir.path().join("cards.json").exists());
    }

    #[test]
    fn cmd_add_persists_newest_first() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = file_store(dir.path());
        cmd_add(&mut store, "first").unwrap();
        cmd_add(&mut store, "second").unwrap();
        let texts: Vec<String> = stored(dir.path()).into_iter().map(|c| c.text).collect();
        assert_eq!(texts, vec!["second", "first"]);
    }

    #[test]
    fn cmd_add_empty_is_error_without_write() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = file_store(dir.path());
        assert!(cmd_add(&mut store, "   ").is_err());
        assert!(!dir.path().join("cards.json").exists());
    }

    #[test]
    fn cmd_edit_updates_and_empty_deletes() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = file_store(dir.path());
        cmd_add(&mut store, "old").unwrap();
        let id = store.cards()[0].id.clone();
        cmd_edit(&mut store, &id, " new ").unwrap();
        assert_eq!(stored(dir.path())[0].text, "new");
        cmd_edit(&mut store, &id, "").unwrap();
        assert!(stored(dir.path()).is_empty());
    }

    #[test]
    fn cmd_edit_and_rm_unknown_id_fail() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = file_store(dir.path());
        assert!(cmd_edit(&mut store, "c_nope", "x").is_err());
        assert!(cmd_rm(&mut store, "c_nope").is_err());
        assert!(!dir.path().join("cards.json").exists());
    }

    #[test]
    fn cmd_rm_removes_card() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = file_store(dir.path());
        cmd_add(&mut store, "a").unwrap();
        cmd_add(&mut store, "b").unwrap();
        let id = store.cards()[0].id.clone();
        cmd_rm(&mut store, &id).unwrap();
        let texts: Vec<String> = stored(dir.path()).into_iter().map(|c| c.text).collect();
        assert_eq!(texts, vec!["a"]);
    }

    #[test]
    fn cmd_clear_requires_yes() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = file_store(dir.path());
        cmd_add(&mut store, "a").unwrap();

        cmd_clear(&mut store, false, &mut Cursor::new("n\n")).unwrap();
        assert_eq!(stored(dir.path()).len(), 1);

        cmd_clear(&mut store, false, &mut Cursor::new("Y\n")).unwrap();
        assert!(stored(dir.path()).is_empty());
    }

    #[test]
    fn cmd_clear_with_flag_skips_prompt() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = file_store(dir.path());
        cmd_add(&mut store, "a").unwrap();
        cmd_clear(&mut store, true, &mut Cursor::new("")).unwrap();
        assert!(stored(dir.path()).is_empty());
    }

    #[test]
    fn cmd_clear_empty_is_ok() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = file_store(dir.path());
        assert!(cmd_clear(&mut store, true, &mut Cursor::new("")).is_ok());
        assert!(!dir.path().join("cards.json").exists());
    }

    #[test]
    fn write_failure_surfaces_as_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        // A file where the data directory should be makes every write fail.
        let blocker = dir.path().join("data");
        fs::write(&blocker, "").unwrap();
        let mut store = file_store(&blocker);
        let err = cmd_add(&mut store, "a").unwrap_err();
        assert!(err.downcast_ref::<StorageError>().is_some());
    }

    #[test]
    fn format_card_list_aligns_ids() {
        let cards = vec![
            Card { id: "c_1".into(), text: "short id".into() },
            Card { id: "c_123".into(), text: "long id".into() },
        ];
        assert_eq!(
            format_card_list(&cards),
            "  c_1    short id\n  c_123  long id"
        );
        assert!(format_card_list(&[]).starts_with("No cards yet"));
    }

    #[test]
    fn cards_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = file_store(dir.path());
        cmd_add(&mut store, "keep me").unwrap();
        let reopened = file_store(dir.path());
        assert_eq!(reopened.cards(), store.cards());
    }
}
