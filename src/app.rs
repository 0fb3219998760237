use crate::background::{Background, Host, PixelCanvas, TerminalHost};
use crate::config;
use crate::types::*;
use crate::ui::decor::DecorField;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// How long a footer message stays up.
const FLASH_MS: f64 = 2000.0;

/// Top-level application state.
pub struct App {
    pub options: BackgroundOptions,
    pub options_path: PathBuf,
    pub host: TerminalHost,
    pub canvas: PixelCanvas,
    pub background: Background,
    pub decor: DecorField,
    /// Clock time the current decor timeline started at.
    pub decor_epoch_ms: f64,
    pub dialog: Option<DialogKind>,
    pub should_quit: bool,
    pub tick: u64,
    pub started: Instant,
    /// Brief status message shown in footer (e.g. "Tier: low"), auto-clears.
    pub flash_message: Option<String>,
    pub flash_until_ms: f64,
    last_refresh_ms: Option<f64>,
}

impl App {
    pub fn new(options: BackgroundOptions, options_path: PathBuf, mut host: TerminalHost) -> Self {
        let mut canvas = PixelCanvas::new();
        let mut background = Background::new(options.clone());
        background.mount(&mut host, Some(&mut canvas));
        let decor = new_decor(&host);

        Self {
            options,
            options_path,
            host,
            canvas,
            background,
            decor,
            decor_epoch_ms: 0.0,
            dialog: None,
            should_quit: false,
            tick: 0,
            started: Instant::now(),
            flash_message: None,
            flash_until_ms: 0.0,
            last_refresh_ms: None,
        }
    }

    /// Milliseconds since start, the clock frames are stamped with.
    pub fn clock_ms(&self) -> f64 {
        self.started.elapsed().as_secs_f64() * 1000.0
    }

    /// Seconds into the current decor timeline.
    pub fn decor_secs(&self) -> f64 {
        (self.clock_ms() - self.decor_epoch_ms).max(0.0) / 1000.0
    }

    pub fn is_flashing(&self) -> bool {
        self.flash_message.is_some() && self.clock_ms() < self.flash_until_ms
    }

    /// Time left until the next refresh is due at the resolved fps cap.
    pub fn until_next_refresh(&self) -> Duration {
        let Some(last) = self.last_refresh_ms else {
            return Duration::ZERO;
        };
        let due = last + self.background.config().frame_interval_ms();
        Duration::from_secs_f64(((due - self.clock_ms()) / 1000.0).max(0.0))
    }

    pub fn on_refresh(&mut self) {
        let now = self.clock_ms();
        self.refresh_at(now);
    }

    /// Display refresh at `now_ms`: once a full frame interval has passed,
    /// deliver the outstanding frame request, if any.
    pub fn refresh_at(&mut self, now_ms: f64) {
        if let Some(last) = self.last_refresh_ms {
            if now_ms - last < self.background.config().frame_interval_ms() {
                return;
            }
        }
        self.last_refresh_ms = Some(now_ms);
        self.tick = self.tick.wrapping_add(1);
        if self.host.take_frame().is_some() {
            self.background.on_frame(&mut self.host, &mut self.canvas, now_ms);
        }
    }

    pub fn handle_resize(&mut self, cols: u16, rows: u16) {
        self.host.set_size(cols, rows);
        if self.host.is_listening() {
            self.background.on_resize(&mut self.host, &mut self.canvas);
        }
    }

    /// Terminal focus change, standing in for document visibility.
    pub fn handle_focus(&mut self, focused: bool) {
        self.host.set_hidden(!focused);
        if self.host.is_listening() {
            self.background.on_visibility_change(&mut self.host);
        }
    }

    pub fn shutdown(&mut self) {
        if self.background.is_mounted() {
            self.background.unmount(&mut self.host);
        }
        let stats = self.background.stats();
        info!(
            frames = stats.accepted,
            skipped = stats.dropped,
            shooting_stars = stats.spawned,
            "sky stopped"
        );
    }

    pub fn cycle_tier(&mut self) {
        let tier = self.background.config().tier.next();
        self.options.performance = Some(tier);
        self.apply_options(format!("Tier: {}", tier));
    }

    pub fn toggle_twinkle(&mut self) {
        let on = !self.options.enable_twinkle.unwrap_or(true);
        self.options.enable_twinkle = Some(on);
        self.apply_options(format!("Twinkle {}", on_off(on)));
    }

    pub fn toggle_shooting_stars(&mut self) {
        let on = !self.options.enable_shooting_stars.unwrap_or(true);
        self.options.enable_shooting_stars = Some(on);
        self.apply_options(format!("Shooting stars {}", on_off(on)));
    }

    pub fn toggle_decor(&mut self) {
        let disabled = !self.options.disable_decor.unwrap_or(false);
        self.options.disable_decor = Some(disabled);
        self.apply_options(format!("Decor {}", on_off(!disabled)));
    }

    pub fn toggle_constellations(&mut self) {
        let on = !self.options.enable_constellations.unwrap_or(false);
        self.options.enable_constellations = Some(on);
        self.apply_options(format!("Constellations {}", on_off(on)));
    }

    /// Reduced motion is a host signal, so it is not saved with the options.
    pub fn toggle_reduced_motion(&mut self) {
        let reduced = !self.host.prefers_reduced_motion();
        self.host.set_reduced_motion(reduced);
        self.remount();
        self.flash(format!("Reduced motion {}", on_off(reduced)));
    }

    pub fn open_help(&mut self) {
        self.dialog = Some(DialogKind::Help);
    }

    pub fn close_dialog(&mut self) {
        self.dialog = None;
    }

    fn apply_options(&mut self, message: String) {
        self.remount();
        if let Err(e) = config::save_options(&self.options_path, &self.options) {
            warn!(error = %e, "could not save options");
            self.flash(format!("{} (not saved)", message));
            return;
        }
        debug!(path = %self.options_path.display(), "options saved");
        self.flash(message);
    }

    fn remount(&mut self) {
        self.background
            .remount(&mut self.host, &mut self.canvas, self.options.clone());
        self.decor = new_decor(&self.host);
        self.decor_epoch_ms = self.clock_ms();
    }

    fn flash(&mut self, message: String) {
        self.flash_message = Some(message);
        self.flash_until_ms = self.clock_ms() + FLASH_MS;
    }
}

fn new_decor(host: &TerminalHost) -> DecorField {
    let viewport = host
        .viewport()
        .unwrap_or(crate::background::scheduler::HEADLESS_VIEWPORT);
    DecorField::new(&mut rand::thread_rng(), viewport)
}

fn on_off(on: bool) -> &'static str {
    if on {
        "on"
    } else {
        "off"
    }
}
