/// Image session
///
/// Owns the original image, the working image derived from it and the
/// display handle rendered from the working image. Every operation either
/// completes fully or leaves all three exactly as they were.

use image::GrayImage;
use std::path::{Path, PathBuf};

use super::edit::EditParams;
use crate::error::{Result, SessionError};
use crate::imaging::{Canvas, LoadedImage};
use crate::ui::display::DisplaySurface;

/// Original/working image pair plus its rendered projection
pub struct ImageSession<S: DisplaySurface> {
    surface: S,
    canvas: Canvas,
    /// Snapshot as opened, never mutated
    original: Option<GrayImage>,
    /// What gets displayed and saved
    working: Option<GrayImage>,
    edits: EditParams,
    display: Option<S::Handle>,
    source: Option<PathBuf>,
}

impl<S: DisplaySurface> ImageSession<S> {
    /// Create an empty session rendering through `surface`
    pub fn new(surface: S, canvas: Canvas) -> Self {
        Self {
            surface,
            canvas,
            original: None,
            working: None,
            edits: EditParams::default(),
            display: None,
            source: None,
        }
    }

    /// Install an image decoded by the loader, replacing both images.
    ///
    /// Unsaved edits are discarded.
    pub fn publish(&mut self, loaded: LoadedImage) {
        self.edits = EditParams::default();
        self.working = Some(loaded.image.clone());
        self.original = Some(loaded.image);
        self.source = Some(loaded.path);
        self.render();
    }

    /// Restore the working image to the original
    pub fn reset(&mut self) -> Result<()> {
        let original = self.original.as_ref().ok_or(SessionError::NoImageLoaded)?;
        self.working = Some(original.clone());
        self.edits.reset();
        self.render();
        Ok(())
    }

    /// Re-derive the working image from the original with `params`
    pub fn apply_edits(&mut self, params: EditParams) -> Result<()> {
        let original = self.original.as_ref().ok_or(SessionError::NoImageLoaded)?;
        let params = params.clamped();
        self.working = Some(params.apply(original));
        self.edits = params;
        self.render();
        Ok(())
    }

    /// Copy of the working image for the saver
    pub fn snapshot(&self) -> Result<GrayImage> {
        self.working.clone().ok_or(SessionError::NoImageLoaded)
    }

    fn render(&mut self) {
        self.display = self.working.as_ref().map(|img| self.surface.render(img));
    }

    pub fn is_loaded(&self) -> bool {
        self.original.is_some()
    }

    pub fn working(&self) -> Option<&GrayImage> {
        self.working.as_ref()
    }

    pub fn display(&self) -> Option<&S::Handle> {
        self.display.as_ref()
    }

    pub fn edits(&self) -> EditParams {
        self.edits
    }

    /// File the current image was opened from
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn canvas(&self) -> Canvas {
        self.canvas
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::{loader, saver};
    use image::{Rgb, RgbImage};
    use std::cell::Cell;

    /// Surface whose handle is a copy of the rendered pixels
    #[derive(Default)]
    struct RecordingSurface {
        renders: Cell<usize>,
    }

    impl DisplaySurface for RecordingSurface {
        type Handle = GrayImage;

        fn render(&self, image: &GrayImage) -> GrayImage {
            self.renders.set(self.renders.get() + 1);
            image.clone()
        }
    }

    fn session() -> ImageSession<RecordingSurface> {
        ImageSession::new(RecordingSurface::default(), Canvas::default())
    }

    /// 500x400 RGB PNG with smooth gradients
    fn rgb_fixture(dir: &Path) -> PathBuf {
        let img = RgbImage::from_fn(500, 400, |x, y| {
            Rgb([(x / 2) as u8, (y / 2) as u8, ((x + y) / 4) as u8])
        });
        let path = dir.join("photo.png");
        img.save(&path).unwrap();
        path
    }

    /// Decode on the calling thread, then publish
    fn open(s: &mut ImageSession<RecordingSurface>, path: &Path) -> Result<()> {
        let loaded = loader::load_normalized(path, s.canvas())?;
        s.publish(loaded);
        Ok(())
    }

    fn save(s: &ImageSession<RecordingSurface>, path: &Path) -> Result<()> {
        saver::encode_to_path(&s.snapshot()?, path)
    }

    fn assert_state_in_sync(s: &ImageSession<RecordingSurface>) {
        assert_eq!(s.display(), s.working());
    }

    #[test]
    fn test_open_normalizes_and_renders() {
        let dir = tempfile::tempdir().unwrap();
        let path = rgb_fixture(dir.path());
        let mut s = session();

        open(&mut s, &path).unwrap();

        let working = s.working().unwrap();
        assert_eq!(working.dimensions(), (300, 300));
        assert_eq!(s.original.as_ref(), s.working());
        assert_eq!(s.source(), Some(path.as_path()));
        assert_state_in_sync(&s);
        assert_eq!(s.surface.renders.get(), 1);
    }

    #[test]
    fn test_open_twice_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = rgb_fixture(dir.path());
        let mut s = session();

        open(&mut s, &path).unwrap();
        let first = s.working().cloned();
        open(&mut s, &path).unwrap();

        assert_eq!(s.working().cloned(), first);
        assert_eq!(s.original.clone(), first);
        assert_state_in_sync(&s);
    }

    #[test]
    fn test_cancelled_open_leaves_state() {
        let dir = tempfile::tempdir().unwrap();
        let mut s = session();
        open(&mut s, &rgb_fixture(dir.path())).unwrap();
        s.apply_edits(EditParams { invert: true, ..EditParams::default() }).unwrap();
        let before = s.working().cloned();
        let renders = s.surface.renders.get();

        let result = open(&mut s, Path::new(""));

        assert!(matches!(result, Err(SessionError::UnreadableFile { .. })));
        assert_eq!(s.working().cloned(), before);
        assert!(s.edits().invert);
        assert_eq!(s.surface.renders.get(), renders);
    }

    #[test]
    fn test_cancelled_open_on_empty_session() {
        let mut s = session();
        assert!(open(&mut s, Path::new("")).is_err());
        assert!(!s.is_loaded());
        assert!(s.display().is_none());
    }

    #[test]
    fn test_corrupt_file_keeps_previous_image() {
        let dir = tempfile::tempdir().unwrap();
        let mut s = session();
        open(&mut s, &rgb_fixture(dir.path())).unwrap();
        let before = s.original.clone();

        let corrupt = dir.path().join("corrupt.png");
        std::fs::write(&corrupt, [0x89, b'P', b'N', b'G', 0, 1, 2]).unwrap();

        assert!(matches!(open(&mut s, &corrupt), Err(SessionError::UnreadableFile { .. })));
        assert_eq!(s.original.clone(), before);
        assert_state_in_sync(&s);
    }

    #[test]
    fn test_reset_without_image() {
        let mut s = session();
        assert_eq!(s.reset(), Err(SessionError::NoImageLoaded));
        assert!(s.display().is_none());
    }

    #[test]
    fn test_snapshot_follows_working_image() {
        let dir = tempfile::tempdir().unwrap();
        let mut s = session();
        assert_eq!(s.snapshot(), Err(SessionError::NoImageLoaded));

        open(&mut s, &rgb_fixture(dir.path())).unwrap();
        s.apply_edits(EditParams { brightness: -30, ..EditParams::default() }).unwrap();

        assert_eq!(Some(&s.snapshot().unwrap()), s.working());
        assert_ne!(Some(&s.snapshot().unwrap()), s.original.as_ref());
    }

    #[test]
    fn test_edits_without_image() {
        let mut s = session();
        assert_eq!(s.apply_edits(EditParams::default()), Err(SessionError::NoImageLoaded));
    }

    #[test]
    fn test_reset_after_edits_restores_original() {
        let dir = tempfile::tempdir().unwrap();
        let mut s = session();
        open(&mut s, &rgb_fixture(dir.path())).unwrap();

        s.apply_edits(EditParams { brightness: 40, contrast: 30.0, blur: 2.0, invert: true })
            .unwrap();
        assert_ne!(s.working(), s.original.as_ref());
        assert_state_in_sync(&s);

        s.reset().unwrap();

        assert_eq!(s.working(), s.original.as_ref());
        assert!(s.edits().is_unedited());
        assert_state_in_sync(&s);
    }

    #[test]
    fn test_open_discards_edits() {
        let dir = tempfile::tempdir().unwrap();
        let path = rgb_fixture(dir.path());
        let mut s = session();
        open(&mut s, &path).unwrap();
        s.apply_edits(EditParams { invert: true, ..EditParams::default() }).unwrap();

        open(&mut s, &path).unwrap();

        assert!(s.edits().is_unedited());
        assert_eq!(s.working(), s.original.as_ref());
    }

    #[test]
    fn test_save_without_image_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("out.png");

        assert_eq!(save(&session(), &target), Err(SessionError::NoImageLoaded));
        assert!(!target.exists());
    }

    #[test]
    fn test_png_round_trip_matches_direct_load() {
        let dir = tempfile::tempdir().unwrap();
        let source = rgb_fixture(dir.path());
        let target = dir.path().join("saved.png");

        let mut s = session();
        open(&mut s, &source).unwrap();
        save(&s, &target).unwrap();

        let mut reopened = session();
        open(&mut reopened, &target).unwrap();

        let direct = loader::load_normalized(&source, Canvas::default()).unwrap();
        assert_eq!(reopened.working(), Some(&direct.image));
    }

    #[test]
    fn test_jpg_round_trip_within_tolerance() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("saved.jpg");

        let mut s = session();
        open(&mut s, &rgb_fixture(dir.path())).unwrap();
        save(&s, &target).unwrap();

        let reread = image::open(&target).unwrap();
        assert_eq!(reread.color(), image::ColorType::L8);
        let reread = reread.to_luma8();
        assert_eq!(reread.dimensions(), (300, 300));

        let working = s.working().unwrap();
        let total: u64 = working
            .pixels()
            .zip(reread.pixels())
            .map(|(a, b)| (a.0[0] as i32 - b.0[0] as i32).unsigned_abs() as u64)
            .sum();
        let mean = total as f64 / (300.0 * 300.0);
        assert!(mean < 4.0, "mean abs error {mean}");
    }

    #[test]
    fn test_save_writes_edited_image() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("edited.png");

        let mut s = session();
        open(&mut s, &rgb_fixture(dir.path())).unwrap();
        s.apply_edits(EditParams { invert: true, ..EditParams::default() }).unwrap();
        save(&s, &target).unwrap();

        let reread = image::open(&target).unwrap().to_luma8();
        assert_eq!(Some(&reread), s.working());
        assert_ne!(Some(&reread), s.original.as_ref());
    }

    #[test]
    fn test_unwritable_target_keeps_state() {
        let dir = tempfile::tempdir().unwrap();
        let mut s = session();
        open(&mut s, &rgb_fixture(dir.path())).unwrap();
        let before = s.working().cloned();

        let result = save(&s, &dir.path().join("image.unknownext"));

        assert!(matches!(result, Err(SessionError::UnwritableTarget { .. })));
        assert_eq!(s.working().cloned(), before);
    }

    #[test]
    fn test_publish_replaces_wholesale() {
        let mut s = session();
        let loaded = LoadedImage {
            path: PathBuf::from("memory.png"),
            image: GrayImage::from_pixel(300, 300, image::Luma([7])),
            source_dimensions: (10, 10),
        };

        s.publish(loaded.clone());

        assert_eq!(s.original.as_ref(), Some(&loaded.image));
        assert_eq!(s.working(), Some(&loaded.image));
        assert_state_in_sync(&s);
    }
}
