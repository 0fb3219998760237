use serde::{Deserialize, Serialize};

/// Coarse quality preset driving density, glow, fps and pixel-ratio ceilings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    High,
    #[default]
    Balanced,
    Low,
}

impl Tier {
    /// Next preset when cycling from the keyboard.
    pub fn next(self) -> Self {
        match self {
            Tier::High => Tier::Balanced,
            Tier::Balanced => Tier::Low,
            Tier::Low => Tier::High,
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Tier::High => write!(f, "high"),
            Tier::Balanced => write!(f, "balanced"),
            Tier::Low => write!(f, "low"),
        }
    }
}

/// Background options as persisted in `options.json`.
///
/// Every field is optional; absent values are filled in by the resolver.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BackgroundOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub density: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_twinkle: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_shooting_stars: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speed_factor: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub performance: Option<Tier>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_fps: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pause_when_hidden: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disable_decor: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shooting_stars_per_minute: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_shooting_stars: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_constellations: Option<bool>,
}

impl BackgroundOptions {
    /// Layer `overrides` on top of `self`; set fields in `overrides` win.
    pub fn merged(&self, overrides: &BackgroundOptions) -> BackgroundOptions {
        BackgroundOptions {
            density: overrides.density.or(self.density),
            enable_twinkle: overrides.enable_twinkle.or(self.enable_twinkle),
            enable_shooting_stars: overrides
                .enable_shooting_stars
                .or(self.enable_shooting_stars),
            speed_factor: overrides.speed_factor.or(self.speed_factor),
            performance: overrides.performance.or(self.performance),
            max_fps: overrides.max_fps.or(self.max_fps),
            pause_when_hidden: overrides.pause_when_hidden.or(self.pause_when_hidden),
            disable_decor: overrides.disable_decor.or(self.disable_decor),
            shooting_stars_per_minute: overrides
                .shooting_stars_per_minute
                .or(self.shooting_stars_per_minute),
            max_shooting_stars: overrides.max_shooting_stars.or(self.max_shooting_stars),
            enable_constellations: overrides
                .enable_constellations
                .or(self.enable_constellations),
        }
    }
}

/// Active modal dialog type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogKind {
    /// Key reference overlay.
    Help,
}
