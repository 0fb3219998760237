//! Test doubles for the host and the drawing surface.

use super::canvas::{Blend, Canvas, Rgba};
use super::host::{FrameRequest, Host, Viewport};
use kurbo::Point;

#[derive(Debug)]
pub struct FakeHost {
    pub viewport: Option<Viewport>,
    pub pixel_ratio: f64,
    pub hidden: bool,
    pub reduced_motion: bool,
    pub listening: bool,
    pub pending: Option<FrameRequest>,
    pub requested: u64,
    pub cancelled: u64,
}

impl FakeHost {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            viewport: Some(Viewport::new(width, height)),
            pixel_ratio: 1.0,
            hidden: false,
            reduced_motion: false,
            listening: false,
            pending: None,
            requested: 0,
            cancelled: 0,
        }
    }

    pub fn headless() -> Self {
        Self {
            viewport: None,
            ..Self::new(0.0, 0.0)
        }
    }

    pub fn take_frame(&mut self) -> Option<FrameRequest> {
        self.pending.take()
    }
}

impl Host for FakeHost {
    fn viewport(&self) -> Option<Viewport> {
        self.viewport
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
        self.requested += 1;
        let request = FrameRequest(self.requested);
        self.pending = Some(request);
        request
    }

    fn cancel_frame(&mut self, request: FrameRequest) {
        if self.pending == Some(request) {
            self.pending = None;
            self.cancelled += 1;
        }
    }

    fn listen(&mut self) {
        self.listening = true;
    }

    fn unlisten(&mut self) {
        self.listening = false;
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    Resize(u32, u32),
    Scale(f64),
    Clear,
    Blend(Blend),
    Circle(Point, f64, Rgba),
    Glow(Point, f64, Rgba),
    Line(Point, Point, Rgba),
    Trail(Point, Point, Rgba),
}

/// Canvas that records every call instead of drawing.
#[derive(Debug, Default)]
pub struct RecordingCanvas {
    pub calls: Vec<DrawCall>,
    blend: Blend,
}

impl RecordingCanvas {
    pub fn circles(&self) -> impl Iterator<Item = (Point, f64)> + '_ {
        self.calls.iter().filter_map(|c| match c {
            DrawCall::Circle(p, r, _) => Some((*p, *r)),
            _ => None,
        })
    }

    pub fn lines(&self) -> impl Iterator<Item = &DrawCall> + '_ {
        self.calls
            .iter()
            .filter(|c| matches!(c, DrawCall::Line(..)))
    }

    pub fn trails(&self) -> impl Iterator<Item = &DrawCall> + '_ {
        self.calls
            .iter()
            .filter(|c| matches!(c, DrawCall::Trail(..)))
    }

    pub fn clears(&self) -> usize {
        self.calls.iter().filter(|c| **c == DrawCall::Clear).count()
    }
}

impl Canvas for RecordingCanvas {
    fn resize(&mut self, width: u32, height: u32) {
        self.calls.push(DrawCall::Resize(width, height));
    }

    fn set_scale(&mut self, scale: f64) {
        self.calls.push(DrawCall::Scale(scale));
    }

    fn clear(&mut self) {
        self.calls.push(DrawCall::Clear);
    }

    fn blend(&self) -> Blend {
        self.blend
    }

    fn set_blend(&mut self, blend: Blend) {
        self.blend = blend;
        self.calls.push(DrawCall::Blend(blend));
    }

    fn fill_circle(&mut self, center: Point, radius: f64, color: Rgba) {
        self.calls.push(DrawCall::Circle(center, radius, color));
    }

    fn fill_glow(&mut self, center: Point, radius: f64, color: Rgba) {
        self.calls.push(DrawCall::Glow(center, radius, color));
    }

    fn stroke_line(&mut self, from: Point, to: Point, _width: f64, color: Rgba) {
        self.calls.push(DrawCall::Line(from, to, color));
    }

    fn stroke_trail(&mut self, head: Point, tail: Point, _width: f64, color: Rgba) {
        self.calls.push(DrawCall::Trail(head, tail, color));
    }
}
