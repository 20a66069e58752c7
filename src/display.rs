// SPDX-License-Identifier: MPL-2.0
//! Display selection: given an image's native size, pick the connected
//! display whose work area shows it best.
//!
//! The selector itself is a pure function over a snapshot of display work
//! areas; querying the OS lives in [`connected_displays`] so the scoring
//! logic stays testable without a windowing system.

/// Usable rectangle of a display, in logical pixels, excluding OS chrome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkArea {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

/// A connected display as seen at query time. Never cached across queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Display {
    pub id: u32,
    pub work_area: WorkArea,
}

/// Per-display score. Compared lexicographically: largest fitting scale
/// first, then matching orientation, then fitted pixel area.
#[derive(Debug, Clone, Copy)]
struct Candidate {
    ratio: f64,
    orientation_match: f64,
    area: f64,
}

impl Candidate {
    fn score(content_width: u32, content_height: u32, work_area: WorkArea) -> Self {
        let cw = f64::from(content_width);
        let ch = f64::from(content_height);
        let w = f64::from(work_area.width);
        let h = f64::from(work_area.height);

        let ratio = (w / cw).min(h / ch);
        // signum maps +/-0.0 to +/-1.0; square content or displays must
        // stay orientation-neutral instead.
        let diff = (w - h) * (cw - ch);
        let orientation_match = if diff > 0.0 {
            1.0
        } else if diff < 0.0 {
            -1.0
        } else {
            0.0
        };
        let area = cw * ch * ratio * ratio;

        Self {
            ratio,
            orientation_match,
            area,
        }
    }

    fn beats(&self, other: &Candidate) -> bool {
        self.ratio > other.ratio
            || (self.ratio == other.ratio && self.orientation_match > other.orientation_match)
            || (self.ratio == other.ratio
                && self.orientation_match == other.orientation_match
                && self.area > other.area)
    }
}

/// Picks the display whose work area best fits content of the given native
/// size. Content dimensions must be positive; callers reject zero sizes
/// before querying.
///
/// Returns `None` when no displays are connected. Ties retain the first
/// display in input order, so identical inputs always produce identical
/// results.
pub fn select_best_display(
    content_width: u32,
    content_height: u32,
    displays: &[Display],
) -> Option<&Display> {
    let mut best: Option<(&Display, Candidate)> = None;

    for display in displays {
        let candidate = Candidate::score(content_width, content_height, display.work_area);
        let better = match &best {
            None => true,
            Some((_, current)) => candidate.beats(current),
        };
        if better {
            best = Some((display, candidate));
        }
    }

    best.map(|(display, _)| display)
}

/// Snapshot of the currently connected displays.
///
/// Query failures are reported as an empty list; callers treat that the
/// same as having no display available and leave the window where it is.
pub fn connected_displays() -> Vec<Display> {
    match display_info::DisplayInfo::all() {
        Ok(infos) => infos
            .into_iter()
            .map(|info| Display {
                id: info.id,
                work_area: WorkArea {
                    x: info.x,
                    y: info.y,
                    width: info.width,
                    height: info.height,
                },
            })
            .collect(),
        Err(err) => {
            eprintln!("Failed to query connected displays: {err}");
            Vec::new()
        }
    }
}
