use iced::widget::canvas::Canvas;
use iced::widget::image::{Handle, Image};
use iced::widget::{button, checkbox, column, container, row, slider, text, Column};
use iced::{Alignment, Element, Length, Task, Theme};
use rfd::FileDialog;
use std::path::PathBuf;

mod error;
mod imaging;
mod state;
mod ui;

use error::SessionError;
use imaging::{loader, saver, LoadedImage};
use state::edit::EditParams;
use state::session::ImageSession;
use state::settings::Settings;
use ui::display::IcedSurface;
use ui::histogram::Histogram;

/// Which of the two independent image sessions an action targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Primary,
    Secondary,
}

impl Slot {
    fn label(self) -> &'static str {
        match self {
            Slot::Primary => "image",
            Slot::Secondary => "PNG",
        }
    }
}

/// Main application state
struct Viewer {
    primary: ImageSession<IcedSurface>,
    secondary: ImageSession<IcedSurface>,
    /// Luminance histogram of the primary working image
    histogram: Option<Histogram>,
    settings: Settings,
    settings_path: Option<PathBuf>,
    /// An open or save is running on a worker
    busy: bool,
    /// Status message to display to the user
    status: String,
}

/// Application messages (events)
#[derive(Debug, Clone)]
enum Message {
    /// User clicked an open button
    Open(Slot),
    /// Background decode finished
    Loaded(Slot, Result<LoadedImage, SessionError>),
    /// User clicked a save button
    Save(Slot),
    /// Background encode finished
    Saved(Result<PathBuf, SessionError>),
    /// User clicked a reset button
    Reset(Slot),
    BrightnessChanged(i32),
    ContrastChanged(f32),
    BlurChanged(f32),
    InvertToggled(bool),
    DarkThemeToggled(bool),
}

impl Viewer {
    /// Create a new instance of the application
    fn new() -> (Self, Task<Message>) {
        let settings_path = match Settings::default_path() {
            Ok(path) => Some(path),
            Err(e) => {
                log::warn!("Settings will not be persisted: {}", e);
                None
            }
        };

        let settings = match settings_path.as_deref().map(Settings::load_from) {
            Some(Ok(settings)) => settings,
            Some(Err(e)) => {
                log::warn!("Ignoring unreadable settings: {}", e);
                Settings::default()
            }
            None => Settings::default(),
        };

        (Viewer::with_settings(settings, settings_path), Task::none())
    }

    /// Build the initial state from already-loaded settings
    fn with_settings(settings: Settings, settings_path: Option<PathBuf>) -> Self {
        let canvas = settings.canvas();
        log::info!("Grayscale viewer ready, canvas {}x{}", canvas.width, canvas.height);

        Viewer {
            primary: ImageSession::new(IcedSurface, canvas),
            secondary: ImageSession::new(IcedSurface, canvas),
            histogram: None,
            settings,
            settings_path,
            busy: false,
            status: "Ready. Open an image to begin.".to_string(),
        }
    }

    fn session_mut(&mut self, slot: Slot) -> &mut ImageSession<IcedSurface> {
        match slot {
            Slot::Primary => &mut self.primary,
            Slot::Secondary => &mut self.secondary,
        }
    }

    fn session(&self, slot: Slot) -> &ImageSession<IcedSurface> {
        match slot {
            Slot::Primary => &self.primary,
            Slot::Secondary => &self.secondary,
        }
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::Open(slot) => {
                if self.busy {
                    return Task::none();
                }

                let mut dialog = FileDialog::new().set_title(match slot {
                    Slot::Primary => "Open Image",
                    Slot::Secondary => "Open PNG",
                });
                dialog = match slot {
                    Slot::Primary => dialog
                        .add_filter(
                            "Images",
                            &["png", "jpg", "jpeg", "bmp", "gif", "tif", "tiff", "webp"],
                        )
                        .add_filter("All Files", &["*"]),
                    Slot::Secondary => dialog.add_filter("PNG file", &["png"]),
                };
                if let Some(dir) = &self.settings.last_directory {
                    dialog = dialog.set_directory(dir);
                }

                // Cancelling the dialog changes nothing
                let Some(path) = dialog.pick_file() else {
                    return Task::none();
                };

                self.busy = true;
                self.status = format!("Opening {}...", path.display());

                Task::perform(
                    loader::load_image(path, self.session(slot).canvas()),
                    move |result| Message::Loaded(slot, result),
                )
            }
            Message::Loaded(slot, result) => {
                self.busy = false;
                match result {
                    Ok(loaded) => {
                        let (w, h) = loaded.source_dimensions;
                        self.status = format!(
                            "✅ Opened {} ({}x{})",
                            loaded.path.display(),
                            w,
                            h
                        );
                        self.settings.remember_directory_of(&loaded.path);
                        self.persist_settings();

                        self.session_mut(slot).publish(loaded);
                        if slot == Slot::Primary {
                            self.refresh_histogram();
                        }
                    }
                    Err(e) => self.report(e),
                }
                Task::none()
            }
            Message::Save(slot) => {
                if self.busy {
                    return Task::none();
                }

                let image = match self.session(slot).snapshot() {
                    Ok(image) => image,
                    Err(e) => {
                        self.report(e);
                        return Task::none();
                    }
                };

                let mut dialog = FileDialog::new()
                    .set_title("Save Image")
                    .set_file_name(saver::suggested_file_name());
                for (name, extensions) in saver::SAVE_FILTERS {
                    dialog = dialog.add_filter(name, extensions);
                }
                if let Some(dir) = &self.settings.last_directory {
                    dialog = dialog.set_directory(dir);
                }

                let Some(path) = dialog.save_file() else {
                    return Task::none();
                };

                self.busy = true;
                self.status = format!("Saving {}...", path.display());

                Task::perform(saver::save_image(image, path), Message::Saved)
            }
            Message::Saved(result) => {
                self.busy = false;
                match result {
                    Ok(path) => {
                        self.status = format!("✅ Saved {}", path.display());
                        self.settings.remember_directory_of(&path);
                        self.persist_settings();
                    }
                    Err(e) => self.report(e),
                }
                Task::none()
            }
            Message::Reset(slot) => {
                if self.busy {
                    return Task::none();
                }

                match self.session_mut(slot).reset() {
                    Ok(()) => {
                        let name = self
                            .session(slot)
                            .source()
                            .and_then(|p| p.file_name())
                            .map(|n| n.to_string_lossy().to_string())
                            .unwrap_or_else(|| slot.label().to_string());
                        self.status = format!("Reset {} to original", name);
                        if slot == Slot::Primary {
                            self.refresh_histogram();
                        }
                    }
                    Err(e) => self.report(e),
                }
                Task::none()
            }
            Message::BrightnessChanged(value) => self.edit(|p| p.brightness = value),
            Message::ContrastChanged(value) => self.edit(|p| p.contrast = value),
            Message::BlurChanged(value) => self.edit(|p| p.blur = value),
            Message::InvertToggled(value) => self.edit(|p| p.invert = value),
            Message::DarkThemeToggled(dark) => {
                self.settings.dark_theme = dark;
                self.persist_settings();
                Task::none()
            }
        }
    }

    /// Apply one parameter change to the primary session
    fn edit(&mut self, change: impl FnOnce(&mut EditParams)) -> Task<Message> {
        if self.busy {
            return Task::none();
        }

        let mut params = self.primary.edits();
        change(&mut params);

        match self.primary.apply_edits(params) {
            Ok(()) => self.refresh_histogram(),
            Err(e) => self.report(e),
        }
        Task::none()
    }

    fn refresh_histogram(&mut self) {
        self.histogram = self.primary.working().map(Histogram::from_image);
    }

    /// Surface a failed operation without touching session state
    fn report(&mut self, error: SessionError) {
        log::warn!("{}", error);
        self.status = format!("⚠️  {}", error);
    }

    fn persist_settings(&self) {
        if let Some(path) = &self.settings_path {
            if let Err(e) = self.settings.save_to(path) {
                log::warn!("Failed to save settings to {}: {}", path.display(), e);
            }
        }
    }

    /// Build the user interface
    fn view(&self) -> Element<Message> {
        let idle = |message: Message| (!self.busy).then_some(message);

        let controls: Column<Message> = column![
            button("open")
                .on_press_maybe(idle(Message::Open(Slot::Primary)))
                .padding(10)
                .width(Length::Fixed(120.0)),
            button("save")
                .on_press_maybe(idle(Message::Save(Slot::Primary)))
                .padding(10)
                .width(Length::Fixed(120.0)),
            button("reset")
                .on_press_maybe(idle(Message::Reset(Slot::Primary)))
                .padding(10)
                .width(Length::Fixed(120.0)),
            button("open PNG")
                .on_press_maybe(idle(Message::Open(Slot::Secondary)))
                .padding(10)
                .width(Length::Fixed(120.0)),
            button("save PNG slot")
                .on_press_maybe(idle(Message::Save(Slot::Secondary)))
                .padding(10)
                .width(Length::Fixed(120.0)),
            button("reset PNG slot")
                .on_press_maybe(idle(Message::Reset(Slot::Secondary)))
                .padding(10)
                .width(Length::Fixed(120.0)),
            checkbox("Dark theme", self.settings.dark_theme).on_toggle(Message::DarkThemeToggled),
        ]
        .spacing(12);

        let edits = self.primary.edits();
        let adjustments: Column<Message> = column![
            text(if edits.is_unedited() { "Adjustments" } else { "Adjustments (edited)" }).size(18),
            text(format!("Brightness {}", edits.brightness)),
            slider(EditParams::BRIGHTNESS_RANGE, edits.brightness, Message::BrightnessChanged),
            text(format!("Contrast {:.0}", edits.contrast)),
            slider(EditParams::CONTRAST_RANGE, edits.contrast, Message::ContrastChanged),
            text(format!("Blur {:.1}", edits.blur)),
            slider(EditParams::BLUR_RANGE, edits.blur, Message::BlurChanged).step(0.1_f32),
            checkbox("Invert", edits.invert).on_toggle(Message::InvertToggled),
        ]
        .spacing(6)
        .width(Length::Fixed(300.0));

        let histogram: Element<Message> = match &self.histogram {
            Some(histogram) => Canvas::new(histogram.clone())
                .width(Length::Fixed(300.0))
                .height(Length::Fixed(100.0))
                .into(),
            None => container(text("")).height(Length::Fixed(100.0)).into(),
        };

        let adjustments: Element<Message> = if self.primary.is_loaded() {
            adjustments.into()
        } else {
            text("Open an image to adjust it").into()
        };

        let primary = column![
            picture(self.primary.display(), self.primary.canvas().width, self.primary.canvas().height),
            histogram,
            adjustments,
        ]
        .spacing(12);

        let secondary = picture(
            self.secondary.display(),
            self.secondary.canvas().width,
            self.secondary.canvas().height,
        );

        let content = column![
            row![controls, primary, secondary]
                .spacing(30)
                .align_y(Alignment::Start),
            text(&self.status).size(16),
        ]
        .spacing(20)
        .padding(20);

        container(content)
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        if self.settings.dark_theme {
            Theme::Dark
        } else {
            Theme::Light
        }
    }
}

/// Fixed-size image area, or an empty placeholder before anything is opened
fn picture<'a>(handle: Option<&Handle>, width: u32, height: u32) -> Element<'a, Message> {
    let width = Length::Fixed(width as f32);
    let height = Length::Fixed(height as f32);

    match handle {
        Some(handle) => Image::new(handle.clone()).width(width).height(height).into(),
        None => container(text("No image"))
            .width(width)
            .height(height)
            .center_x(width)
            .center_y(height)
            .into(),
    }
}

fn main() -> iced::Result {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    iced::application("Grayscale Viewer", Viewer::update, Viewer::view)
        .theme(Viewer::theme)
        .centered()
        .run_with(Viewer::new)
}
