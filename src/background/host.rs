/// CSS pixels covered by one terminal cell.
pub const CELL_WIDTH_PX: f64 = 8.0;
pub const CELL_HEIGHT_PX: f64 = 16.0;

/// Pixel ratio used when `STARGLOW_PIXEL_RATIO` is unset or invalid.
pub const DEFAULT_PIXEL_RATIO: f64 = 0.5;

pub const PIXEL_RATIO_VAR: &str = "STARGLOW_PIXEL_RATIO";
pub const REDUCED_MOTION_VAR: &str = "STARGLOW_REDUCED_MOTION";

/// Size of the drawable area in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Handle for an outstanding per-frame callback request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameRequest(pub u64);

/// The environment a background renders into.
///
/// Supplies ambient signals and delivers per-frame callbacks. A host only
/// forwards resize and visibility notifications while listening.
pub trait Host {
    /// `None` when there is no viewport (headless).
    fn viewport(&self) -> Option<Viewport>;
    fn device_pixel_ratio(&self) -> f64;
    fn is_hidden(&self) -> bool;
    fn prefers_reduced_motion(&self) -> bool;
    fn request_frame(&mut self) -> FrameRequest;
    fn cancel_frame(&mut self, request: FrameRequest);
    fn listen(&mut self);
    fn unlisten(&mut self);
}

/// [`Host`] backed by the terminal the application runs in.
///
/// Terminal focus stands in for document visibility.
#[derive(Debug)]
pub struct TerminalHost {
    cols: u16,
    rows: u16,
    pixel_ratio: f64,
    hidden: bool,
    reduced_motion: bool,
    next_request: u64,
    pending: Option<FrameRequest>,
    listening: bool,
}

impl TerminalHost {
    pub fn new(cols: u16, rows: u16, pixel_ratio: f64, reduced_motion: bool) -> Self {
        Self {
            cols,
            rows,
            pixel_ratio,
            hidden: false,
            reduced_motion,
            next_request: 0,
            pending: None,
            listening: false,
        }
    }

    /// Read the pixel ratio and reduced-motion preference from the environment.
    pub fn from_env(cols: u16, rows: u16) -> Self {
        let pixel_ratio = parse_pixel_ratio(std::env::var(PIXEL_RATIO_VAR).ok().as_deref());
        let reduced_motion = parse_flag(std::env::var(REDUCED_MOTION_VAR).ok().as_deref());
        Self::new(cols, rows, pixel_ratio, reduced_motion)
    }

    pub fn set_size(&mut self, cols: u16, rows: u16) {
        self.cols = cols;
        self.rows = rows;
    }

    pub fn set_hidden(&mut self, hidden: bool) {
        self.hidden = hidden;
    }

    pub fn set_reduced_motion(&mut self, reduced: bool) {
        self.reduced_motion = reduced;
    }

    pub fn is_listening(&self) -> bool {
        self.listening
    }

    /// Consume the outstanding frame request, if any, so it can be delivered.
    pub fn take_frame(&mut self) -> Option<FrameRequest> {
        self.pending.take()
    }
}

impl Host for TerminalHost {
    fn viewport(&self) -> Option<Viewport> {
        if self.cols == 0 || self.rows == 0 {
            return None;
        }
        Some(Viewport::new(
            self.cols as f64 * CELL_WIDTH_PX,
            self.rows as f64 * CELL_HEIGHT_PX,
        ))
    }

    fn device_pixel_ratio(&self) -> f64 {
        self.pixel_ratio
    }

    fn is_hidden(&self) -> bool {
        self.hidden
    }

    fn prefers_reduced_motion(&self) -> bool {
        self.reduced_motion
    }

    fn request_frame(&mut self) -> FrameRequest {
        self.next_request += 1;
        let request = FrameRequest(self.next_request);
        self.pending = Some(request);
        request
    }

    fn cancel_frame(&mut self, request: FrameRequest) {
        if self.pending == Some(request) {
            self.pending = None;
        }
    }

    fn listen(&mut self) {
        self.listening = true;
    }

    fn unlisten(&mut self) {
        self.listening = false;
    }
}

fn parse_pixel_ratio(raw: Option<&str>) -> f64 {
    raw.and_then(|s| s.trim().parse::<f64>().ok())
        .filter(|r| r.is_finite() && *r > 0.0)
        .unwrap_or(DEFAULT_PIXEL_RATIO)
}

fn parse_flag(raw: Option<&str>) -> bool {
    matches!(
        raw.map(|s| s.trim().to_ascii_lowercase()).as_deref(),
        Some("1" | "true" | "yes" | "on" | "reduce")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn viewport_is_cells_times_cell_size() {
        let host = TerminalHost::new(100, 40, 1.0, false);
        assert_eq!(host.viewport(), Some(Viewport::new(800.0, 640.0)));
        let empty = TerminalHost::new(0, 40, 1.0, false);
        assert_eq!(empty.viewport(), None);
    }

    #[test]
    fn cancel_only_clears_matching_request() {
        let mut host = TerminalHost::new(10, 10, 1.0, false);
        let first = host.request_frame();
        let second = host.request_frame();
        host.cancel_frame(first);
        assert_eq!(host.take_frame(), Some(second));
        assert_eq!(host.take_frame(), None);
    }

    #[test]
    fn malformed_env_values_fall_back() {
        assert_eq!(parse_pixel_ratio(Some("2")), 2.0);
        assert_eq!(parse_pixel_ratio(Some("-1")), DEFAULT_PIXEL_RATIO);
        assert_eq!(parse_pixel_ratio(Some("nope")), DEFAULT_PIXEL_RATIO);
        assert_eq!(parse_pixel_ratio(None), DEFAULT_PIXEL_RATIO);
        assert!(parse_flag(Some("TRUE")));
        assert!(parse_flag(Some("reduce")));
        assert!(!parse_flag(Some("0")));
        assert!(!parse_flag(None));
    }
}
