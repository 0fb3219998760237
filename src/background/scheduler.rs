use super::canvas::Canvas;
use super::host::{FrameRequest, Host, Viewport};
use super::resolve::{resolve, ResolvedConfig};
use super::shooting::ShootingStars;
use super::stars::StarField;
use crate::types::{BackgroundOptions, Tier};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

/// Only used to seed star positions when the host has no viewport.
pub const HEADLESS_VIEWPORT: Viewport = Viewport::new(1000.0, 1000.0);

/// Snapshot of the scheduler for status display.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameStats {
    pub accepted: u64,
    pub dropped: u64,
    pub stars: usize,
    pub shooting: usize,
    pub max_shooting: usize,
    pub spawned: u64,
    pub missed_spawns: u64,
    pub fps_cap: u32,
    pub tier: Tier,
    pub pixel_ratio: f64,
    pub paused: bool,
    pub running: bool,
}

/// The animated background: star field, shooting stars and the frame loop
/// driving them.
///
/// All state lives here and is only touched from host callbacks, one at a
/// time. The random source is injectable for tests.
pub struct Background<R = StdRng> {
    options: BackgroundOptions,
    config: ResolvedConfig,
    rng: R,
    stars: StarField,
    shooters: ShootingStars,
    viewport: Option<Viewport>,
    pixel_ratio: f64,
    pending: Option<FrameRequest>,
    last_accepted: Option<f64>,
    mounted: bool,
    paused: bool,
    accepted: u64,
    dropped: u64,
}

impl Background<StdRng> {
    /// Background with an entropy-seeded random source.
    pub fn new(options: BackgroundOptions) -> Self {
        Self::with_rng(options, StdRng::from_entropy())
    }
}

impl<R: Rng> Background<R> {
    pub fn with_rng(options: BackgroundOptions, rng: R) -> Self {
        let config = resolve(&options, false);
        Self {
            options,
            config,
            rng,
            stars: StarField::empty(),
            shooters: ShootingStars::new(),
            viewport: None,
            pixel_ratio: 1.0,
            pending: None,
            last_accepted: None,
            mounted: false,
            paused: false,
            accepted: 0,
            dropped: 0,
        }
    }

    pub fn config(&self) -> &ResolvedConfig {
        &self.config
    }

    pub fn stars(&self) -> &StarField {
        &self.stars
    }

    pub fn shooters(&self) -> &ShootingStars {
        &self.shooters
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// True while a frame request is outstanding.
    pub fn is_running(&self) -> bool {
        self.pending.is_some()
    }

    pub fn stats(&self) -> FrameStats {
        FrameStats {
            accepted: self.accepted,
            dropped: self.dropped,
            stars: self.stars.len(),
            shooting: self.shooters.len(),
            max_shooting: self.config.max_concurrent_shooters,
            spawned: self.shooters.spawned(),
            missed_spawns: self.shooters.dropped(),
            fps_cap: self.config.fps_cap,
            tier: self.config.tier,
            pixel_ratio: self.pixel_ratio,
            paused: self.is_paused(),
            running: self.is_running(),
        }
    }

    /// Start rendering into `canvas`. Without a canvas this is a no-op.
    pub fn mount<H, C>(&mut self, host: &mut H, canvas: Option<&mut C>)
    where
        H: Host + ?Sized,
        C: Canvas + ?Sized,
    {
        let Some(canvas) = canvas else {
            debug!("no drawing surface, background stays idle");
            return;
        };
        if self.mounted {
            self.unmount(host);
        }

        self.config = resolve(&self.options, host.prefers_reduced_motion());
        let seed_bounds = host.viewport().unwrap_or(HEADLESS_VIEWPORT);
        self.stars = StarField::new(
            &mut self.rng,
            seed_bounds,
            self.config.density_target,
            self.config.speed_factor,
        );
        self.shooters = ShootingStars::new();
        self.viewport = None;
        self.last_accepted = None;
        self.accepted = 0;
        self.dropped = 0;
        self.mounted = true;

        self.fit_surface(host, canvas);
        host.listen();
        self.paused = self.config.pause_when_hidden && host.is_hidden();
        self.schedule(host);

        info!(
            tier = %self.config.tier,
            stars = self.stars.len(),
            fps_cap = self.config.fps_cap,
            reduced_motion = host.prefers_reduced_motion(),
            "background mounted"
        );
    }

    /// Stop rendering: cancel the outstanding frame and drop the listeners.
    pub fn unmount<H: Host + ?Sized>(&mut self, host: &mut H) {
        if let Some(request) = self.pending.take() {
            host.cancel_frame(request);
        }
        if self.mounted {
            host.unlisten();
            debug!(
                accepted = self.accepted,
                dropped = self.dropped,
                spawns = self.shooters.opportunities(),
                "background unmounted"
            );
        }
        self.mounted = false;
        self.paused = false;
    }

    /// Replace the options and start over with a fresh resolution.
    pub fn remount<H, C>(&mut self, host: &mut H, canvas: &mut C, options: BackgroundOptions)
    where
        H: Host + ?Sized,
        C: Canvas + ?Sized,
    {
        self.options = options;
        info!("background options changed, remounting");
        self.mount(host, Some(canvas));
    }

    /// Host resize notification.
    pub fn on_resize<H, C>(&mut self, host: &mut H, canvas: &mut C)
    where
        H: Host + ?Sized,
        C: Canvas + ?Sized,
    {
        if !self.mounted {
            return;
        }
        self.fit_surface(host, canvas);
        self.schedule(host);
    }

    /// Host visibility notification.
    pub fn on_visibility_change<H: Host + ?Sized>(&mut self, host: &mut H) {
        if !self.mounted || !self.config.pause_when_hidden {
            return;
        }
        if host.is_hidden() {
            if let Some(request) = self.pending.take() {
                host.cancel_frame(request);
            }
            if !self.paused {
                debug!("host hidden, pausing background");
            }
            self.paused = true;
        } else if self.paused {
            debug!("host visible, resuming background");
            self.paused = false;
            self.last_accepted = None;
            self.schedule(host);
        }
    }

    /// Per-frame callback for the request the host just delivered.
    ///
    /// Frames arriving sooner than the fps cap allows are dropped and
    /// rescheduled. Accepted frames clear the surface, then advance and draw
    /// the star field followed by the shooting stars.
    pub fn on_frame<H, C>(&mut self, host: &mut H, canvas: &mut C, now_ms: f64)
    where
        H: Host + ?Sized,
        C: Canvas + ?Sized,
    {
        self.pending = None;
        if !self.mounted || self.paused {
            return;
        }
        let Some(bounds) = self.viewport else {
            return;
        };

        let interval = self.config.frame_interval_ms();
        let elapsed = match self.last_accepted {
            Some(last) => {
                let delta = now_ms - last;
                if delta < interval {
                    self.dropped += 1;
                    self.schedule(host);
                    return;
                }
                delta
            }
            // First frame after mount or resume: one nominal interval.
            None => interval,
        };
        self.last_accepted = Some(now_ms);
        self.accepted += 1;

        canvas.clear();
        self.stars.advance();
        self.stars.render(canvas, now_ms, &self.config);
        self.shooters.step(&mut self.rng, elapsed, bounds, &self.config);
        self.shooters.render(canvas, &self.config);
        canvas.present();

        self.schedule(host);
    }

    /// Size the backing store for the host's pixel ratio, capped by the tier.
    fn fit_surface<H, C>(&mut self, host: &mut H, canvas: &mut C)
    where
        H: Host + ?Sized,
        C: Canvas + ?Sized,
    {
        let Some(viewport) = host.viewport() else {
            debug!("host has no viewport, skipping surface sizing");
            return;
        };
        let host_ratio = host.device_pixel_ratio();
        let host_ratio = if host_ratio.is_finite() && host_ratio > 0.0 {
            host_ratio
        } else {
            1.0
        };
        let ratio = host_ratio.min(self.config.dpr_cap);
        let width = (viewport.width * ratio).round().max(0.0) as u32;
        let height = (viewport.height * ratio).round().max(0.0) as u32;

        canvas.resize(width, height);
        canvas.set_scale(ratio);
        self.pixel_ratio = ratio;
        self.viewport = Some(viewport);
        self.stars.set_bounds(viewport);
        debug!(
            css_width = viewport.width,
            css_height = viewport.height,
            ratio,
            width,
            height,
            "surface resized"
        );
    }

    fn schedule<H: Host + ?Sized>(&mut self, host: &mut H) {
        if self.pending.is_none() && !self.paused && self.viewport.is_some() {
            self.pending = Some(host.request_frame());
        }
    }
}
