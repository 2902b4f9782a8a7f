/// Non-destructive edit parameters for the working image
///
/// The working image is never edited in place. Each change re-applies the
/// full parameter set to the untouched original, so resetting is simply
/// going back to the defaults.

use image::imageops;
use image::GrayImage;
use serde::{Deserialize, Serialize};

/// All edit parameters for an opened image
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct EditParams {
    /// Brightness offset (-100 to +100)
    /// - Mapped onto the full 8-bit range, +100 = +255
    /// - 0 = no adjustment
    pub brightness: i32,

    /// Contrast adjustment in percent (-100.0 to +100.0)
    /// - 0.0 = no adjustment
    pub contrast: f32,

    /// Gaussian blur sigma (0.0 to 10.0)
    /// - 0.0 = no blur
    pub blur: f32,

    /// Invert luminance (negative)
    pub invert: bool,
}

impl Default for EditParams {
    fn default() -> Self {
        Self {
            brightness: 0,
            contrast: 0.0,
            blur: 0.0,
            invert: false,
        }
    }
}

impl EditParams {
    pub const BRIGHTNESS_RANGE: std::ops::RangeInclusive<i32> = -100..=100;
    pub const CONTRAST_RANGE: std::ops::RangeInclusive<f32> = -100.0..=100.0;
    pub const BLUR_RANGE: std::ops::RangeInclusive<f32> = 0.0..=10.0;

    /// Check if this represents an unedited image (all values at default)
    pub fn is_unedited(&self) -> bool {
        *self == Self::default()
    }

    /// Reset all adjustments to default (no edits)
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Clamp every value into its slider range
    pub fn clamped(self) -> Self {
        Self {
            brightness: self.brightness.clamp(-100, 100),
            contrast: self.contrast.clamp(-100.0, 100.0),
            blur: self.blur.clamp(0.0, 10.0),
            invert: self.invert,
        }
    }

    /// Derive a working image from `original`
    ///
    /// Order: brightness, contrast, blur, invert. Default parameters return
    /// an exact copy.
    pub fn apply(&self, original: &GrayImage) -> GrayImage {
        let params = self.clamped();
        let mut out = original.clone();

        if params.brightness != 0 {
            out = imageops::brighten(&out, params.brightness * 255 / 100);
        }
        if params.contrast != 0.0 {
            out = imageops::contrast(&out, params.contrast);
        }
        if params.blur > 0.0 {
            out = imageops::blur(&out, params.blur);
        }
        if params.invert {
            imageops::invert(&mut out);
        }

        out
    }
}
