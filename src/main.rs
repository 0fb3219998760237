mod app;
mod background;
mod config;
mod input;
mod types;
mod ui;

use app::App;
use background::TerminalHost;
use clap::{Parser, ValueEnum};
use crossterm::{
    event::{
        self, DisableFocusChange, EnableFocusChange, Event, KeyCode, KeyEventKind, KeyModifiers,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::fs::{self, File};
use std::io;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Mutex;
use tracing::{info, warn, Level};
use types::{BackgroundOptions, Tier};

const LOG_LEVEL_VAR: &str = "STARGLOW_LOG";

#[derive(Parser, Debug)]
#[command(name = "starglow", version, about = "An ambient night sky for your terminal")]
struct Cli {
    /// Options file (defaults to `<config_dir>/starglow/options.json`).
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long, value_enum)]
    performance: Option<TierArg>,

    /// Target star count before tier scaling.
    #[arg(long)]
    density: Option<i64>,

    #[arg(long)]
    max_fps: Option<i64>,

    #[arg(long)]
    speed_factor: Option<f64>,

    #[arg(long)]
    shooting_stars_per_minute: Option<f64>,

    #[arg(long)]
    max_shooting_stars: Option<i64>,

    #[arg(long)]
    no_twinkle: bool,

    #[arg(long)]
    no_shooting_stars: bool,

    #[arg(long)]
    no_decor: bool,

    /// Keep animating while the terminal is unfocused.
    #[arg(long)]
    keep_running_unfocused: bool,

    /// Draw faint links between nearby foreground stars.
    #[arg(long)]
    constellations: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum TierArg {
    High,
    Balanced,
    Low,
}

impl From<TierArg> for Tier {
    fn from(arg: TierArg) -> Self {
        match arg {
            TierArg::High => Tier::High,
            TierArg::Balanced => Tier::Balanced,
            TierArg::Low => Tier::Low,
        }
    }
}

impl Cli {
    /// Options set on the command line; unset flags leave the file's values alone.
    fn overrides(&self) -> BackgroundOptions {
        BackgroundOptions {
            density: self.density,
            enable_twinkle: self.no_twinkle.then_some(false),
            enable_shooting_stars: self.no_shooting_stars.then_some(false),
            speed_factor: self.speed_factor,
            performance: self.performance.map(Tier::from),
            max_fps: self.max_fps,
            pause_when_hidden: self.keep_running_unfocused.then_some(false),
            disable_decor: self.no_decor.then_some(true),
            shooting_stars_per_minute: self.shooting_stars_per_minute,
            max_shooting_stars: self.max_shooting_stars,
            enable_constellations: self.constellations.then_some(true),
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging();

    let options_path = cli.config.clone().unwrap_or_else(config::options_path);
    let stored = config::load_options(&options_path).unwrap_or_else(|e| {
        warn!(error = %e, "falling back to default options");
        BackgroundOptions::default()
    });
    let options = stored.merged(&cli.overrides());
    info!(path = %options_path.display(), ?options, "starting");

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableFocusChange)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let size = terminal.size()?;
    let host = TerminalHost::from_env(size.width, size.height);
    let mut app = App::new(options, options_path, host);

    let result = run_app(&mut terminal, &mut app).await;
    app.shutdown();

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), DisableFocusChange, LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
    }

    info!("stopped");
    Ok(())
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        // Render
        terminal.draw(|f| ui::draw(f, app))?;

        // Poll for events until the next refresh is due at the fps cap
        if event::poll(app.until_next_refresh())? {
            match event::read()? {
                Event::Key(key) => {
                    // Only handle key press events, ignore release/repeat
                    if key.kind == KeyEventKind::Press {
                        // Ctrl+C always quits
                        if key.modifiers.contains(KeyModifiers::CONTROL)
                            && key.code == KeyCode::Char('c')
                        {
                            app.should_quit = true;
                        } else {
                            input::handle_key(app, key);
                        }
                    }
                }
                Event::Resize(cols, rows) => app.handle_resize(cols, rows),
                Event::FocusLost => app.handle_focus(false),
                Event::FocusGained => app.handle_focus(true),
                _ => {}
            }
        }

        // Refresh: hand the pending frame to the background once it is due
        app.on_refresh();

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

/// Route tracing output to a dated file; the terminal belongs to the UI.
fn init_logging() {
    let level = std::env::var(LOG_LEVEL_VAR)
        .ok()
        .and_then(|v| Level::from_str(v.trim()).ok())
        .unwrap_or(Level::INFO);

    let dir = config::log_dir();
    if fs::create_dir_all(&dir).is_err() {
        return;
    }
    let name = format!("starglow-{}.log", chrono::Local::now().format("%Y-%m-%d"));
    let file = match File::options().create(true).append(true).open(dir.join(name)) {
        Ok(file) => file,
        Err(_) => return,
    };

    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_ansi(false)
        .with_target(false)
        .with_writer(Mutex::new(file))
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_flags_leave_file_options_alone() {
        let cli = Cli::parse_from(["starglow"]);
        assert_eq!(cli.overrides(), BackgroundOptions::default());
    }

    #[test]
    fn flags_override_stored_options() {
        let cli = Cli::parse_from([
            "starglow",
            "--performance",
            "low",
            "--density",
            "90",
            "--no-twinkle",
            "--constellations",
        ]);
        let stored = BackgroundOptions {
            density: Some(300),
            max_fps: Some(30),
            enable_twinkle: Some(true),
            ..Default::default()
        };
        let merged = stored.merged(&cli.overrides());
        assert_eq!(merged.performance, Some(Tier::Low));
        assert_eq!(merged.density, Some(90));
        assert_eq!(merged.max_fps, Some(30));
        assert_eq!(merged.enable_twinkle, Some(false));
        assert_eq!(merged.enable_constellations, Some(true));
    }
}
