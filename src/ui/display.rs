use iced::widget::image::Handle;
use image::GrayImage;

/// Something that can turn a grayscale buffer into a renderable handle.
///
/// The session only ever talks to this trait, so it has no idea which GUI
/// toolkit is drawing the result.
pub trait DisplaySurface {
    type Handle: Clone;

    /// Build a fresh handle for `image`
    fn render(&self, image: &GrayImage) -> Self::Handle;
}

/// iced image widget backend
#[derive(Debug, Clone, Copy, Default)]
pub struct IcedSurface;

impl DisplaySurface for IcedSurface {
    type Handle = Handle;

    fn render(&self, image: &GrayImage) -> Handle {
        Handle::from_rgba(image.width(), image.height(), gray_to_rgba(image))
    }
}

/// Expand luma pixels into opaque RGBA bytes
pub fn gray_to_rgba(image: &GrayImage) -> Vec<u8> {
    image
        .as_raw()
        .iter()
        .flat_map(|&v| [v, v, v, 255])
        .collect()
}
