// SPDX-License-Identifier: MPL-2.0
//! Draw-only canvas program that renders the current bitmap under the
//! active view transform.

use crate::media::ImageData;
use crate::viewer::state::RenderFilter;
use crate::viewer::transform::ViewTransform;
use iced::widget::canvas;
use iced::widget::image::FilterMethod;
use iced::{mouse, Point, Rectangle, Size, Theme};

/// Renders one image centered at `(viewport/2 + offset)` scaled by the
/// transform. Input handling lives in the application subscription, so
/// this program carries no interaction state.
#[derive(Debug)]
pub struct ImagePane<'a> {
    pub image: &'a ImageData,
    pub transform: &'a ViewTransform,
    pub filter: RenderFilter,
}

impl<'a, Message> canvas::Program<Message> for ImagePane<'a> {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &iced::Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<canvas::Geometry> {
        let mut frame = canvas::Frame::new(renderer, bounds.size());

        let viewport = Size::new(f64::from(bounds.width), f64::from(bounds.height));
        let image = Size::new(f64::from(self.image.width), f64::from(self.image.height));

        let origin: Point<f64> = self.transform.image_origin(image, viewport);
        let scaled = self.transform.scaled_size(image);

        let destination = Rectangle {
            x: origin.x as f32,
            y: origin.y as f32,
            width: scaled.width as f32,
            height: scaled.height as f32,
        };

        let filter_method = match self.filter {
            RenderFilter::Fast => FilterMethod::Nearest,
            RenderFilter::Smooth => FilterMethod::Linear,
        };

        frame.draw_image(
            destination,
            canvas::Image::new(self.image.handle.clone()).filter_method(filter_method),
        );

        vec![frame.into_geometry()]
    }
}
