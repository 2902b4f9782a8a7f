/// Display side of the application
///
/// - `display.rs` - Toolkit-neutral surface trait and the iced backend
/// - `histogram.rs` - Luminance histogram canvas

pub mod display;
pub mod histogram;
