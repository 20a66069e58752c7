// SPDX-License-Identifier: MPL-2.0
//! Application root: wires the viewer state machine to the Iced runtime,
//! the open-file dialog, keyboard/mouse input, and window placement.
//!
//! Policy decisions (input map, toolbar layout, when the window hops to
//! another display) live here so user-facing behavior is easy to audit;
//! the viewer module stays free of host concerns.

use crate::config::{self, Config};
use crate::display;
use crate::error::Error;
use crate::i18n::I18n;
use crate::media::{self, ImageData};
use crate::viewer::{self, ImagePane, LoadRequest, Phase};
use iced::widget::{button, canvas, Column, Container, Row, Text};
use iced::{
    event, keyboard, mouse, time, window, Element, Length, Point, Size, Subscription, Task, Theme,
};
use std::path::PathBuf;
use std::time::Instant;

pub const WINDOW_DEFAULT_WIDTH: u32 = 800;
pub const WINDOW_DEFAULT_HEIGHT: u32 = 600;

/// Height reserved for the toolbar row above the canvas.
const TOOLBAR_HEIGHT: f32 = 48.0;

/// How often the smoothing tick fires while an upgrade is pending.
const SMOOTHING_TICK_MS: u64 = 30;

/// Root Iced application state.
pub struct App {
    i18n: I18n,
    viewer: viewer::State,
    config: Config,
    window_id: Option<window::Id>,
    fullscreen: bool,
}

/// Runtime flags passed in from the CLI launcher.
#[derive(Debug, Default)]
pub struct Flags {
    /// Optional locale override in BCP-47 form (e.g. `zh-CN`).
    pub lang: Option<String>,
    /// Image paths to preload on startup.
    pub file_paths: Vec<PathBuf>,
}

/// Top-level messages consumed by [`App::update`].
#[derive(Debug, Clone)]
pub enum Message {
    /// Native events routed through the subscription.
    RawEvent {
        window: window::Id,
        event: iced::Event,
    },
    OpenPressed,
    ExitPressed,
    /// Result of the startup window-id query.
    LatestWindow(Option<window::Id>),
    /// Dialog closed; `None` means the user cancelled.
    OpenDialogResult(Option<Vec<PathBuf>>),
    /// A decode finished for the load tagged `seq`.
    ImageLoaded {
        seq: u64,
        result: Result<ImageData, Error>,
    },
    /// Periodic tick while a smoothing upgrade is pending.
    Tick(Instant),
}

/// Builds the window settings.
pub fn window_settings() -> window::Settings {
    window::Settings {
        size: Size::new(WINDOW_DEFAULT_WIDTH as f32, WINDOW_DEFAULT_HEIGHT as f32),
        ..window::Settings::default()
    }
}

/// Entry point used by `main.rs` to launch the Iced application loop.
pub fn run(flags: Flags) -> iced::Result {
    use std::cell::RefCell;

    // Wrap flags in RefCell<Option<_>> to satisfy the Fn trait requirement
    // while only consuming flags once (iced 0.14 requires Fn, not FnOnce).
    let boot_state = RefCell::new(Some(flags));
    let boot = move || {
        let flags = boot_state
            .borrow_mut()
            .take()
            .expect("Boot function called more than once");
        App::new(flags)
    };

    iced::application(boot, App::update, App::view)
        .title(App::title)
        .theme(App::theme)
        .window(window_settings())
        .subscription(App::subscription)
        .run()
}

impl App {
    /// Initializes application state and optionally kicks off asynchronous
    /// image loading for paths given on the command line.
    fn new(flags: Flags) -> (Self, Task<Message>) {
        let config = config::load().unwrap_or_default();
        let i18n = I18n::new(flags.lang, &config);

        let mut viewer = viewer::State::new(config.smoothing_delay());
        viewer.viewport_resized(Size::new(
            f64::from(WINDOW_DEFAULT_WIDTH),
            f64::from(WINDOW_DEFAULT_HEIGHT) - f64::from(TOOLBAR_HEIGHT),
        ));

        let mut app = App {
            i18n,
            viewer,
            config,
            window_id: None,
            fullscreen: false,
        };

        let load = match app.viewer.open_images(flags.file_paths) {
            Some(request) => load_task(request),
            None => Task::none(),
        };

        // Query the window id up front; waiting for the first routed event
        // could lose the auto-move for images preloaded from the CLI.
        let task = Task::batch([window::latest().map(Message::LatestWindow), load]);

        (app, task)
    }

    fn title(&self) -> String {
        match self.viewer.current_file_name() {
            Some(name) => format!("{name} - {}", self.i18n.tr("app-title")),
            None => self.i18n.tr("app-title"),
        }
    }

    fn theme(&self) -> Theme {
        Theme::Dark
    }

    fn subscription(&self) -> Subscription<Message> {
        let events = event::listen_with(|event, status, window_id| {
            // Wheel scroll always reaches the viewer so zooming works even
            // while the cursor hovers other widgets.
            if matches!(
                event,
                event::Event::Mouse(mouse::Event::WheelScrolled { .. })
            ) {
                return Some(Message::RawEvent {
                    window: window_id,
                    event: event.clone(),
                });
            }

            match status {
                event::Status::Ignored => Some(Message::RawEvent {
                    window: window_id,
                    event: event.clone(),
                }),
                event::Status::Captured => None,
            }
        });

        // Drive the deferred smoothing upgrade only while one is pending.
        let ticks = if self.viewer.smoothing_pending() {
            time::every(std::time::Duration::from_millis(SMOOTHING_TICK_MS)).map(Message::Tick)
        } else {
            Subscription::none()
        };

        Subscription::batch([events, ticks])
    }

    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::RawEvent { window, event } => {
                self.window_id = Some(window);
                self.handle_event(event)
            }
            Message::OpenPressed => open_dialog_task(),
            Message::ExitPressed => {
                if let Err(err) = config::save(&self.config) {
                    eprintln!("Failed to save settings: {err}");
                }
                iced::exit()
            }
            Message::LatestWindow(id) => {
                self.window_id = self.window_id.or(id);
                Task::none()
            }
            Message::OpenDialogResult(paths) => {
                let Some(paths) = paths else {
                    // Dialog cancelled; not an error, nothing changes.
                    return Task::none();
                };
                match self.viewer.open_images(paths) {
                    Some(request) => load_task(request),
                    None => Task::none(),
                }
            }
            Message::ImageLoaded { seq, result } => {
                let applied = self.viewer.load_finished(seq, result);
                if applied && self.viewer.phase() == Phase::Ready && self.config.auto_move() {
                    self.reposition_to_best_display()
                } else {
                    Task::none()
                }
            }
            Message::Tick(now) => {
                self.viewer.tick(now);
                Task::none()
            }
        }
    }

    fn handle_event(&mut self, event: iced::Event) -> Task<Message> {
        match event {
            iced::Event::Window(window::Event::Resized(size)) => {
                self.viewer.viewport_resized(Size::new(
                    f64::from(size.width),
                    f64::from((size.height - TOOLBAR_HEIGHT).max(1.0)),
                ));
                Task::none()
            }
            iced::Event::Mouse(mouse_event) => self.handle_mouse_event(mouse_event),
            iced::Event::Keyboard(keyboard::Event::KeyPressed { key, modifiers, .. }) => {
                self.handle_key_press(key, modifiers)
            }
            _ => Task::none(),
        }
    }

    fn handle_mouse_event(&mut self, event: mouse::Event) -> Task<Message> {
        match event {
            mouse::Event::CursorMoved { position } => {
                self.viewer.cursor_moved(to_canvas_coords(position));
            }
            mouse::Event::ButtonPressed(mouse::Button::Left) => {
                self.viewer.drag_started();
            }
            mouse::Event::ButtonReleased(mouse::Button::Left) => {
                self.viewer.drag_ended();
            }
            mouse::Event::CursorLeft => {
                self.viewer.drag_ended();
            }
            mouse::Event::WheelScrolled { delta } => {
                let vertical = match delta {
                    mouse::ScrollDelta::Lines { y, .. } => y,
                    mouse::ScrollDelta::Pixels { y, .. } => y,
                };
                if vertical != 0.0 {
                    let step = self.config.wheel_zoom_factor();
                    let factor = if vertical > 0.0 { step } else { 1.0 / step };
                    self.viewer.zoom_at_cursor(factor, Instant::now());
                }
            }
            _ => {}
        }
        Task::none()
    }

    fn handle_key_press(
        &mut self,
        key: keyboard::Key,
        modifiers: keyboard::Modifiers,
    ) -> Task<Message> {
        use keyboard::key::Named;

        match key.as_ref() {
            keyboard::Key::Named(Named::ArrowRight) => match self.viewer.navigate_next() {
                Some(request) => load_task(request),
                None => Task::none(),
            },
            keyboard::Key::Named(Named::ArrowLeft) => match self.viewer.navigate_previous() {
                Some(request) => load_task(request),
                None => Task::none(),
            },
            keyboard::Key::Named(Named::Space) => {
                self.viewer.fit_to_screen();
                Task::none()
            }
            keyboard::Key::Named(Named::Enter) => self.reposition_to_best_display(),
            keyboard::Key::Character("f") | keyboard::Key::Character("F") => {
                self.toggle_fullscreen()
            }
            keyboard::Key::Character("0") => {
                self.viewer.fit_to_screen();
                Task::none()
            }
            keyboard::Key::Character("1") => {
                self.viewer.set_scale(1.0);
                Task::none()
            }
            keyboard::Key::Character("2") => {
                self.viewer.set_scale(2.0);
                Task::none()
            }
            keyboard::Key::Character("o") | keyboard::Key::Character("O")
                if modifiers.command() =>
            {
                open_dialog_task()
            }
            _ => Task::none(),
        }
    }

    fn toggle_fullscreen(&mut self) -> Task<Message> {
        let Some(window_id) = self.window_id else {
            return Task::none();
        };
        self.fullscreen = !self.fullscreen;
        let mode = if self.fullscreen {
            window::Mode::Fullscreen
        } else {
            window::Mode::Windowed
        };
        window::set_mode::<Message>(window_id, mode)
    }

    /// Moves and resizes the window onto the display that best matches the
    /// current bitmap. Fire-and-forget: failures are invisible to the
    /// viewer, and with no display available the window stays put.
    fn reposition_to_best_display(&mut self) -> Task<Message> {
        let Some(window_id) = self.window_id else {
            return Task::none();
        };
        let Some((width, height)) = self.viewer.image_dimensions() else {
            return Task::none();
        };
        if width == 0 || height == 0 {
            return Task::none();
        }

        let displays = display::connected_displays();
        let Some(target) = display::select_best_display(width, height, &displays) else {
            return Task::none();
        };
        let work_area = target.work_area;

        let mut tasks = Vec::new();
        if self.fullscreen {
            self.fullscreen = false;
            tasks.push(window::set_mode::<Message>(
                window_id,
                window::Mode::Windowed,
            ));
        }
        tasks.push(window::move_to(
            window_id,
            Point::new(work_area.x as f32, work_area.y as f32),
        ));
        tasks.push(window::resize(
            window_id,
            Size::new(work_area.width as f32, work_area.height as f32),
        ));
        Task::batch(tasks)
    }

    fn view(&self) -> Element<'_, Message> {
        let toolbar = Row::new()
            .spacing(8)
            .padding(8)
            .align_y(iced::alignment::Vertical::Center)
            .push(
                button(Text::new(self.i18n.tr("open-button")))
                    .on_press(Message::OpenPressed),
            )
            .push(
                button(Text::new(self.i18n.tr("exit-button")))
                    .on_press(Message::ExitPressed),
            )
            .push(Text::new(self.viewer.status_line(&self.i18n)).size(14));

        let toolbar = Container::new(toolbar)
            .width(Length::Fill)
            .height(Length::Fixed(TOOLBAR_HEIGHT));

        let content: Element<'_, Message> = match self.viewer.image() {
            Some(image) => canvas::Canvas::new(ImagePane {
                image,
                transform: &self.viewer.transform,
                filter: self.viewer.filter(),
            })
            .width(Length::Fill)
            .height(Length::Fill)
            .into(),
            None => Container::new(Text::new(""))
                .width(Length::Fill)
                .height(Length::Fill)
                .into(),
        };

        Column::new().push(toolbar).push(content).into()
    }
}

/// Converts a window-space cursor position to canvas coordinates.
fn to_canvas_coords(position: Point) -> Point<f64> {
    Point::new(
        f64::from(position.x),
        f64::from(position.y - TOOLBAR_HEIGHT),
    )
}

/// Starts the asynchronous decode for a tagged load request.
fn load_task(request: LoadRequest) -> Task<Message> {
    let LoadRequest { seq, path } = request;
    Task::perform(async move { media::load_image(&path) }, move |result| {
        Message::ImageLoaded { seq, result }
    })
}

/// Shows the multi-select open dialog, filtered to recognized image types.
fn open_dialog_task() -> Task<Message> {
    Task::perform(
        async {
            rfd::AsyncFileDialog::new()
                .set_title("Open Images")
                .add_filter("Images", &media::IMAGE_EXTENSIONS)
                .pick_files()
                .await
                .map(|handles| {
                    handles
                        .into_iter()
                        .map(|handle| handle.path().to_path_buf())
                        .collect()
                })
        },
        Message::OpenDialogResult,
    )
}
