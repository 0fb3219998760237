use crate::types::{BackgroundOptions, Tier};

pub const MIN_DENSITY: usize = 20;
pub const DEFAULT_DENSITY: i64 = 160;
const MAX_DENSITY: i64 = 5000;
const REDUCED_MOTION_DENSITY: f64 = 0.4;

pub const MIN_FPS: i64 = 10;
pub const MAX_FPS: i64 = 60;

const DEFAULT_SPEED_FACTOR: f64 = 1.0;
const SPEED_FACTOR_RANGE: (f64, f64) = (0.1, 5.0);
const MAX_SPAWNS_PER_MINUTE: f64 = 600.0;
const MAX_SHOOTERS: i64 = 64;

/// Concrete render parameters derived from [`BackgroundOptions`].
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    pub density_target: usize,
    pub twinkle_enabled: bool,
    pub shooting_enabled: bool,
    pub fps_cap: u32,
    pub dpr_cap: f64,
    pub decor_enabled: bool,
    pub spawn_rate_per_second: f64,
    pub max_concurrent_shooters: usize,
    pub speed_factor: f64,
    pub glow_by_layer: [f64; 3],
    pub tier: Tier,
    pub pause_when_hidden: bool,
    pub constellations_enabled: bool,
    /// Shooting-star trail length range in CSS pixels.
    pub trail_range: (f64, f64),
    /// Glow radius around a shooting-star head.
    pub head_glow: f64,
    /// Speed and lifetime damping applied to shooting stars.
    pub tier_damping: f64,
}

impl ResolvedConfig {
    /// Minimum interval between two accepted ticks, in milliseconds.
    pub fn frame_interval_ms(&self) -> f64 {
        1000.0 / self.fps_cap as f64
    }
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        resolve(&BackgroundOptions::default(), false)
    }
}

struct Preset {
    density: f64,
    fps: i64,
    spawns_per_minute: f64,
    max_shooters: i64,
    dpr_cap: f64,
    glow: [f64; 3],
    trail: (f64, f64),
    head_glow: f64,
    damping: f64,
}

fn preset(tier: Tier) -> Preset {
    match tier {
        Tier::High => Preset {
            density: 1.0,
            fps: 60,
            spawns_per_minute: 12.0,
            max_shooters: 6,
            dpr_cap: 1.5,
            glow: [2.0, 4.0, 6.0],
            trail: (140.0, 280.0),
            head_glow: 10.0,
            damping: 1.0,
        },
        Tier::Balanced => Preset {
            density: 0.8,
            fps: 45,
            spawns_per_minute: 8.0,
            max_shooters: 4,
            dpr_cap: 1.25,
            glow: [2.0, 3.0, 4.0],
            trail: (120.0, 240.0),
            head_glow: 7.0,
            damping: 1.0,
        },
        Tier::Low => Preset {
            density: 0.5,
            fps: 30,
            spawns_per_minute: 6.0,
            max_shooters: 3,
            dpr_cap: 1.0,
            glow: [1.0, 1.0, 2.0],
            trail: (110.0, 200.0),
            head_glow: 4.0,
            damping: 0.85,
        },
    }
}

/// Map user options plus the host's reduced-motion signal to render parameters.
///
/// Never fails: absent values take the tier defaults and out-of-range values
/// are clamped so no negative size, zero fps or unbounded spawn rate can leak
/// into the renderer.
pub fn resolve(options: &BackgroundOptions, reduced_motion: bool) -> ResolvedConfig {
    let tier = options.performance.unwrap_or_default();
    let p = preset(tier);
    let motion = if reduced_motion { REDUCED_MOTION_DENSITY } else { 1.0 };

    let density = options
        .density
        .unwrap_or(DEFAULT_DENSITY)
        .clamp(0, MAX_DENSITY) as f64;
    let density_target = ((density * motion * p.density).floor() as usize).max(MIN_DENSITY);

    let fps_cap = options.max_fps.unwrap_or(p.fps).clamp(MIN_FPS, MAX_FPS) as u32;

    let spawn_rate_per_minute = match options.shooting_stars_per_minute {
        Some(rate) if rate.is_finite() => rate.clamp(0.0, MAX_SPAWNS_PER_MINUTE),
        Some(_) => 0.0,
        None => p.spawns_per_minute,
    };

    let max_concurrent_shooters = options
        .max_shooting_stars
        .unwrap_or(p.max_shooters)
        .clamp(1, MAX_SHOOTERS) as usize;

    let speed_factor = match options.speed_factor {
        Some(s) if s.is_finite() && s > 0.0 => s.clamp(SPEED_FACTOR_RANGE.0, SPEED_FACTOR_RANGE.1),
        _ => DEFAULT_SPEED_FACTOR,
    };

    ResolvedConfig {
        density_target,
        twinkle_enabled: options.enable_twinkle.unwrap_or(true) && !reduced_motion,
        shooting_enabled: options.enable_shooting_stars.unwrap_or(true) && !reduced_motion,
        fps_cap,
        dpr_cap: p.dpr_cap,
        decor_enabled: !options.disable_decor.unwrap_or(false)
            && !reduced_motion
            && tier != Tier::Low,
        spawn_rate_per_second: spawn_rate_per_minute / 60.0,
        max_concurrent_shooters,
        speed_factor,
        glow_by_layer: p.glow,
        tier,
        pause_when_hidden: options.pause_when_hidden.unwrap_or(true),
        constellations_enabled: options.enable_constellations.unwrap_or(false) && tier != Tier::Low,
        trail_range: p.trail,
        head_glow: p.head_glow,
        tier_damping: p.damping,
    }
}
