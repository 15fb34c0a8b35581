use std::io;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use crossterm::event::DisableMouseCapture;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{execute, terminal};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use term_desk::config::ConfigStore;
use term_desk::drivers::ConsoleDriver;
use term_desk::runner::run_shell;
use term_desk::shell::Shell;
use term_desk::tracing_sub;

#[derive(Debug, Parser)]
#[command(name = "term-desk", version, about = "A desktop shell simulation for terminal emulators.")]
struct Cli {
    /// Event poll interval in milliseconds.
    #[arg(long, default_value_t = 16)]
    tick_ms: u64,

    /// Start with mouse capture disabled.
    #[arg(long)]
    no_mouse: bool,

    /// Override the configuration directory.
    #[arg(long, value_name = "DIR")]
    config_dir: Option<PathBuf>,
}

fn main() -> io::Result<()> {
    let cli = Cli::parse();
    let store = match cli.config_dir {
        Some(dir) => ConfigStore::at(dir),
        None => ConfigStore::open_default(),
    };
    tracing_sub::init_default(store.dir());

    let mut shell = Shell::new(store);
    if cli.no_mouse {
        shell.set_mouse_capture(false);
        let _ = shell.take_mouse_capture_change();
    }

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    terminal::enable_raw_mode()?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    let mut driver = ConsoleDriver::new();

    let result = run_shell(
        &mut terminal,
        &mut driver,
        &mut shell,
        Duration::from_millis(cli.tick_ms),
    );

    terminal::disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableMouseCapture,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    result
}
