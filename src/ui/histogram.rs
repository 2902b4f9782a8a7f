/// Luminance histogram of the working image
use iced::widget::canvas::{self, Path, Stroke};
use iced::{Color, Point, Rectangle};
use image::GrayImage;

use crate::Message;

/// Histogram data structure
#[derive(Debug, Clone)]
pub struct Histogram {
    /// One bin per 8-bit luma value
    pub data: [u32; 256],
}

impl Histogram {
    /// Count pixel values of `image`
    pub fn from_image(image: &GrayImage) -> Self {
        let mut data = [0u32; 256];
        for pixel in image.pixels() {
            data[pixel.0[0] as usize] += 1;
        }
        Self { data }
    }
}

impl canvas::Program<Message> for Histogram {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &iced::Renderer,
        _theme: &iced::Theme,
        bounds: Rectangle,
        _cursor: iced::mouse::Cursor,
    ) -> Vec<canvas::Geometry> {
        let mut frame = canvas::Frame::new(renderer, bounds.size());

        let max_value = self.data.iter().copied().max().unwrap_or(1) as f32;

        if max_value < 1.0 {
            return vec![frame.into_geometry()];
        }

        let width = bounds.width;
        let height = bounds.height;
        let bar_width = width / 256.0;

        let mut path_builder = canvas::path::Builder::new();

        for (i, &count) in self.data.iter().enumerate() {
            if count > 0 {
                let bar_height = count as f32 / max_value * height;
                let x = i as f32 * bar_width;

                path_builder.move_to(Point::new(x, height));
                path_builder.line_to(Point::new(x, height - bar_height));
            }
        }

        let path: Path = path_builder.build();
        frame.stroke(
            &path,
            Stroke::default()
                .with_color(Color::from_rgba(0.85, 0.85, 0.85, 0.8))
                .with_width(bar_width.max(1.0)),
        );

        vec![frame.into_geometry()]
    }
}
