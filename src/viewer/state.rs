// SPDX-License-Identifier: MPL-2.0
//! Viewer state machine: file list, active image, load lifecycle, and the
//! view transform, independent of any live rendering surface.

use crate::error::Error;
use crate::i18n::I18n;
use crate::media::{self, ImageData};
use crate::viewer::transform::ViewTransform;
use iced::{Point, Size};
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// Lifecycle of the active index's image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No files loaded yet.
    Empty,
    /// A decode is in flight for the active index.
    Loading,
    /// A bitmap is present and the transform is valid.
    Ready,
    /// The active index could not be shown; no bitmap is held.
    Failed(LoadFailure),
}

/// Why the active index has no bitmap. Read failures and decode failures
/// surface as different status messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadFailure {
    /// The file could not be read.
    Read,
    /// The bytes did not decode as a supported image.
    Decode,
}

/// Resampling quality for the canvas.
///
/// Zooming drops to `Fast` for responsiveness; once no zoom has happened
/// for the configured quiescence window, rendering upgrades to `Smooth`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderFilter {
    Fast,
    Smooth,
}

/// An image decode the application shell should start.
///
/// The sequence number tags the request; completions whose number no
/// longer matches the state are stale and get discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadRequest {
    pub seq: u64,
    pub path: PathBuf,
}

#[derive(Debug)]
pub struct State {
    files: Vec<PathBuf>,
    index: Option<usize>,
    image: Option<ImageData>,
    phase: Phase,
    pub transform: ViewTransform,
    viewport: Size<f64>,
    cursor: Option<Point<f64>>,
    drag_origin: Option<Point<f64>>,
    load_seq: u64,
    filter: RenderFilter,
    smoothing_deadline: Option<Instant>,
    smoothing_delay: Duration,
}

impl Default for State {
    fn default() -> Self {
        Self::new(Duration::from_millis(crate::config::DEFAULT_SMOOTHING_DELAY_MS))
    }
}

impl State {
    pub fn new(smoothing_delay: Duration) -> Self {
        Self {
            files: Vec::new(),
            index: None,
            image: None,
            phase: Phase::Empty,
            transform: ViewTransform::default(),
            viewport: Size::new(800.0, 600.0),
            cursor: None,
            drag_origin: None,
            load_seq: 0,
            filter: RenderFilter::Smooth,
            smoothing_deadline: None,
            smoothing_delay,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn image(&self) -> Option<&ImageData> {
        self.image.as_ref()
    }

    pub fn filter(&self) -> RenderFilter {
        self.filter
    }

    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    pub fn index(&self) -> Option<usize> {
        self.index
    }

    pub fn is_dragging(&self) -> bool {
        self.drag_origin.is_some()
    }

    /// Native dimensions of the loaded bitmap, if any.
    pub fn image_dimensions(&self) -> Option<(u32, u32)> {
        self.image.as_ref().map(|img| (img.width, img.height))
    }

    /// Display name of the active file (last path segment).
    pub fn current_file_name(&self) -> Option<String> {
        let index = self.index?;
        let path = self.files.get(index)?;
        Some(path.file_name()?.to_string_lossy().into_owned())
    }

    /// Accepts a dialog/CLI selection. Non-image paths are dropped first;
    /// an empty selection leaves the current state untouched.
    pub fn open_images(&mut self, paths: Vec<PathBuf>) -> Option<LoadRequest> {
        let filtered = media::filter_image_paths(paths);
        if filtered.is_empty() {
            return None;
        }
        self.files = filtered;
        self.index = Some(0);
        Some(self.begin_load(0))
    }

    /// Advances to the next file, wrapping past the end.
    pub fn navigate_next(&mut self) -> Option<LoadRequest> {
        self.navigate(1)
    }

    /// Steps back to the previous file, wrapping before the start.
    pub fn navigate_previous(&mut self) -> Option<LoadRequest> {
        self.navigate(-1)
    }

    fn navigate(&mut self, step: isize) -> Option<LoadRequest> {
        if self.files.is_empty() {
            return None;
        }
        let len = self.files.len() as isize;
        let current = self.index.unwrap_or(0) as isize;
        let next = (current + step).rem_euclid(len) as usize;
        self.index = Some(next);
        Some(self.begin_load(next))
    }

    /// Marks a decode as started for the given index. The previous bitmap
    /// is released immediately, before the replacement is ready.
    fn begin_load(&mut self, index: usize) -> LoadRequest {
        let path = self.files[index].clone();
        self.image = None;
        self.phase = Phase::Loading;
        self.load_seq += 1;
        LoadRequest {
            seq: self.load_seq,
            path,
        }
    }

    /// Applies a decode completion. Returns `true` when the result was
    /// current and accepted; stale completions (superseded by a newer
    /// navigation or open) are discarded without touching state.
    pub fn load_finished(&mut self, seq: u64, result: Result<ImageData, Error>) -> bool {
        if seq != self.load_seq {
            return false;
        }
        match result {
            Ok(image) => {
                self.transform.fit(image_size(&image), self.viewport);
                self.image = Some(image);
                self.phase = Phase::Ready;
                self.filter = RenderFilter::Smooth;
                self.smoothing_deadline = None;
            }
            Err(err) => {
                self.image = None;
                self.phase = Phase::Failed(match err {
                    Error::Decode(_) => LoadFailure::Decode,
                    _ => LoadFailure::Read,
                });
            }
        }
        true
    }

    /// Refits the current bitmap to the viewport.
    pub fn fit_to_screen(&mut self) {
        if let Some(image) = &self.image {
            self.transform.fit(image_size(image), self.viewport);
        }
    }

    fn cursor_in_viewport(&self) -> bool {
        match self.cursor {
            // An unknown cursor anchors at the viewport center instead.
            None => true,
            Some(c) => {
                c.x >= 0.0
                    && c.y >= 0.0
                    && c.x <= self.viewport.width
                    && c.y <= self.viewport.height
            }
        }
    }

    /// Pointer-anchored zoom. Falls back to the viewport center when the
    /// cursor has not entered the canvas yet; ignored while the cursor is
    /// outside the canvas (e.g. over the toolbar).
    pub fn zoom_at_cursor(&mut self, factor: f64, now: Instant) {
        if !self.cursor_in_viewport() {
            return;
        }
        let Some(image) = &self.image else { return };
        let pointer = self.cursor.unwrap_or(Point::new(
            self.viewport.width / 2.0,
            self.viewport.height / 2.0,
        ));
        self.transform
            .zoom_at(factor, pointer, image_size(image), self.viewport);
        self.filter = RenderFilter::Fast;
        self.smoothing_deadline = Some(now + self.smoothing_delay);
    }

    /// Absolute zoom shortcut (100%/200% keys).
    pub fn set_scale(&mut self, value: f64) {
        if self.phase == Phase::Ready {
            self.transform.set_scale(value);
        }
    }

    pub fn viewport_resized(&mut self, viewport: Size<f64>) {
        self.viewport = viewport;
        if let Some(image) = &self.image {
            self.transform.viewport_resized(image_size(image), viewport);
        }
    }

    pub fn viewport(&self) -> Size<f64> {
        self.viewport
    }

    /// Tracks the cursor in canvas coordinates; pans while a drag is held.
    pub fn cursor_moved(&mut self, position: Point<f64>) {
        if let Some(origin) = self.drag_origin {
            let dx = position.x - origin.x;
            let dy = position.y - origin.y;
            if self.phase == Phase::Ready {
                self.transform.pan(dx, dy);
            }
            self.drag_origin = Some(position);
        }
        self.cursor = Some(position);
    }

    /// Begins a pan drag at the current cursor position. Presses outside
    /// the canvas (toolbar clicks) do not start a drag.
    pub fn drag_started(&mut self) {
        if self.phase == Phase::Ready && self.cursor_in_viewport() {
            self.drag_origin = self.cursor;
        }
    }

    pub fn drag_ended(&mut self) {
        self.drag_origin = None;
    }

    /// Whether a smoothing upgrade is scheduled (drives the tick
    /// subscription).
    pub fn smoothing_pending(&self) -> bool {
        self.smoothing_deadline.is_some()
    }

    /// Upgrades to the high-quality filter once the quiescence window has
    /// elapsed. Returns `true` when the upgrade happened.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.smoothing_deadline {
            Some(deadline) if now >= deadline => {
                self.smoothing_deadline = None;
                self.filter = RenderFilter::Smooth;
                true
            }
            _ => false,
        }
    }

    /// The status line shown in the toolbar.
    pub fn status_line(&self, i18n: &I18n) -> String {
        match self.phase {
            Phase::Empty => i18n.tr("status-hint"),
            Phase::Loading => i18n.tr("status-loading"),
            Phase::Failed(LoadFailure::Read) => i18n.tr("status-load-failed"),
            Phase::Failed(LoadFailure::Decode) => i18n.tr("status-decode-failed"),
            Phase::Ready => {
                let name = self.current_file_name().unwrap_or_default();
                let zoom_pct = (self.transform.scale * 100.0).round() as i64;
                match self.image_dimensions() {
                    Some((w, h)) => format!("{name}  |  {zoom_pct}%  |  {w}×{h}"),
                    None => name,
                }
            }
        }
    }
}

fn image_size(image: &ImageData) -> Size<f64> {
    Size::new(f64::from(image.width), f64::from(image.height))
}
