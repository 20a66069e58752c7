// SPDX-License-Identifier: MPL-2.0
//! View transform for the image canvas: uniform scale plus a pan offset
//! measured from the viewport center.
//!
//! All math is done in f64 so the pointer-anchored zoom stays reversible
//! within a tight tolerance; the renderer narrows to f32 at draw time.

use iced::{Point, Size};

/// Whether the view refits itself when the viewport changes size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FitMode {
    /// Auto-refit on resize; the image is fully visible and centered.
    #[default]
    Contain,
    /// The user has zoomed or panned manually; resizes leave the
    /// transform alone until the next explicit fit.
    Free,
}

/// Current zoom factor and pan offset.
///
/// `scale` of 1.0 maps one source pixel to one logical pixel. Offsets are
/// logical pixels from the viewport center to the image center.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewTransform {
    pub scale: f64,
    pub offset_x: f64,
    pub offset_y: f64,
    pub fit_mode: FitMode,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self {
            scale: 1.0,
            offset_x: 0.0,
            offset_y: 0.0,
            fit_mode: FitMode::Contain,
        }
    }
}

impl ViewTransform {
    /// Scales the image to be fully visible in the viewport, centered,
    /// and re-enables auto-refit.
    pub fn fit(&mut self, image: Size<f64>, viewport: Size<f64>) {
        let scale = (viewport.width / image.width).min(viewport.height / image.height);
        self.scale = if scale.is_finite() && scale > 0.0 {
            scale
        } else {
            1.0
        };
        self.offset_x = 0.0;
        self.offset_y = 0.0;
        self.fit_mode = FitMode::Contain;
    }

    /// Rescales by `factor` while keeping the image point under `pointer`
    /// (viewport coordinates) fixed on screen.
    pub fn zoom_at(
        &mut self,
        factor: f64,
        pointer: Point<f64>,
        image: Size<f64>,
        viewport: Size<f64>,
    ) {
        let anchor = self.viewport_to_image(pointer, image, viewport);

        self.scale *= factor;
        self.fit_mode = FitMode::Free;

        let center_x = pointer.x - anchor.x * self.scale + image.width * self.scale / 2.0;
        let center_y = pointer.y - anchor.y * self.scale + image.height * self.scale / 2.0;
        self.offset_x = center_x - viewport.width / 2.0;
        self.offset_y = center_y - viewport.height / 2.0;
    }

    /// Shifts the image by `(dx, dy)` logical pixels.
    pub fn pan(&mut self, dx: f64, dy: f64) {
        self.offset_x += dx;
        self.offset_y += dy;
        self.fit_mode = FitMode::Free;
    }

    /// Jumps to an absolute zoom factor, keeping the current offsets.
    pub fn set_scale(&mut self, value: f64) {
        self.scale = value;
        self.fit_mode = FitMode::Free;
    }

    /// Reacts to a viewport size change: refit in [`FitMode::Contain`],
    /// leave the transform untouched in [`FitMode::Free`].
    pub fn viewport_resized(&mut self, image: Size<f64>, viewport: Size<f64>) {
        if self.fit_mode == FitMode::Contain {
            self.fit(image, viewport);
        }
    }

    /// Image size after scaling.
    pub fn scaled_size(&self, image: Size<f64>) -> Size<f64> {
        Size::new(image.width * self.scale, image.height * self.scale)
    }

    /// Top-left corner of the drawn image in viewport coordinates.
    pub fn image_origin(&self, image: Size<f64>, viewport: Size<f64>) -> Point<f64> {
        let center_x = viewport.width / 2.0 + self.offset_x;
        let center_y = viewport.height / 2.0 + self.offset_y;
        Point::new(
            center_x - image.width * self.scale / 2.0,
            center_y - image.height * self.scale / 2.0,
        )
    }

    /// Maps a viewport point to image-space coordinates.
    pub fn viewport_to_image(
        &self,
        point: Point<f64>,
        image: Size<f64>,
        viewport: Size<f64>,
    ) -> Point<f64> {
        let origin = self.image_origin(image, viewport);
        Point::new(
            (point.x - origin.x) / self.scale,
            (point.y - origin.y) / self.scale,
        )
    }

    /// Maps an image-space point to viewport coordinates.
    pub fn image_to_viewport(
        &self,
        point: Point<f64>,
        image: Size<f64>,
        viewport: Size<f64>,
    ) -> Point<f64> {
        let origin = self.image_origin(image, viewport);
        Point::new(
            origin.x + point.x * self.scale,
            origin.y + point.y * self.scale,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const IMAGE: Size<f64> = Size {
        width: 1920.0,
        height: 1080.0,
    };
    const VIEWPORT: Size<f64> = Size {
        width: 800.0,
        height: 600.0,
    };

    fn close(a: f64, b: f64) -> bool {
        let scale = a.abs().max(b.abs()).max(1.0);
        (a - b).abs() <= 1e-6 * scale
    }

    #[test]
    fn fit_contains_image_and_touches_one_axis() {
        let mut t = ViewTransform::default();
        t.fit(IMAGE, VIEWPORT);

        let scaled = t.scaled_size(IMAGE);
        assert!(scaled.width <= VIEWPORT.width + 1e-9);
        assert!(scaled.height <= VIEWPORT.height + 1e-9);
        assert!(close(scaled.width, VIEWPORT.width) || close(scaled.height, VIEWPORT.height));
        assert_eq!(t.offset_x, 0.0);
        assert_eq!(t.offset_y, 0.0);
        assert_eq!(t.fit_mode, FitMode::Contain);
    }

    #[test]
    fn zoom_keeps_pointer_anchor_fixed() {
        let mut t = ViewTransform::default();
        t.fit(IMAGE, VIEWPORT);

        let pointer = Point::new(123.0, 456.0);
        let anchor_before = t.viewport_to_image(pointer, IMAGE, VIEWPORT);

        t.zoom_at(1.1, pointer, IMAGE, VIEWPORT);

        let projected = t.image_to_viewport(anchor_before, IMAGE, VIEWPORT);
        assert!(close(projected.x, pointer.x), "{} vs {}", projected.x, pointer.x);
        assert!(close(projected.y, pointer.y), "{} vs {}", projected.y, pointer.y);
        assert_eq!(t.fit_mode, FitMode::Free);
    }

    #[test]
    fn zoom_anchor_holds_from_free_transforms() {
        let mut t = ViewTransform {
            scale: 0.73,
            offset_x: -41.5,
            offset_y: 17.25,
            fit_mode: FitMode::Free,
        };

        let pointer = Point::new(700.0, 20.0);
        let anchor_before = t.viewport_to_image(pointer, IMAGE, VIEWPORT);

        t.zoom_at(1.0 / 1.1, pointer, IMAGE, VIEWPORT);

        let projected = t.image_to_viewport(anchor_before, IMAGE, VIEWPORT);
        assert!(close(projected.x, pointer.x));
        assert!(close(projected.y, pointer.y));
    }

    #[test]
    fn zoom_by_reciprocal_factor_restores_transform() {
        let mut t = ViewTransform::default();
        t.fit(IMAGE, VIEWPORT);
        t.pan(12.0, -7.0);

        let before = t;
        let pointer = Point::new(321.0, 99.0);

        t.zoom_at(1.1, pointer, IMAGE, VIEWPORT);
        t.zoom_at(1.0 / 1.1, pointer, IMAGE, VIEWPORT);

        assert!(close(t.scale, before.scale));
        assert!(close(t.offset_x, before.offset_x));
        assert!(close(t.offset_y, before.offset_y));
    }

    #[test]
    fn pan_accumulates_offsets_and_sets_free() {
        let mut t = ViewTransform::default();
        t.fit(IMAGE, VIEWPORT);

        t.pan(10.0, 20.0);
        t.pan(-4.0, 6.0);

        assert_eq!(t.offset_x, 6.0);
        assert_eq!(t.offset_y, 26.0);
        assert_eq!(t.fit_mode, FitMode::Free);
    }

    #[test]
    fn set_scale_keeps_offsets() {
        let mut t = ViewTransform::default();
        t.fit(IMAGE, VIEWPORT);
        t.pan(5.0, 5.0);

        t.set_scale(2.0);

        assert_eq!(t.scale, 2.0);
        assert_eq!(t.offset_x, 5.0);
        assert_eq!(t.offset_y, 5.0);
        assert_eq!(t.fit_mode, FitMode::Free);
    }

    #[test]
    fn resize_refits_only_in_contain_mode() {
        let mut t = ViewTransform::default();
        t.fit(IMAGE, VIEWPORT);
        let fitted_scale = t.scale;

        let wider = Size::new(1600.0, 600.0);
        t.viewport_resized(IMAGE, wider);
        assert!(t.scale != fitted_scale);
        assert_eq!(t.fit_mode, FitMode::Contain);

        t.pan(1.0, 1.0);
        let free_transform = t;
        t.viewport_resized(IMAGE, VIEWPORT);
        assert_eq!(t, free_transform);
    }

    #[test]
    fn fit_guards_against_degenerate_viewport() {
        let mut t = ViewTransform::default();
        t.fit(IMAGE, Size::new(0.0, 0.0));
        assert_eq!(t.scale, 1.0);
    }
}
