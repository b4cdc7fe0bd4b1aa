//! GUI Rendering using egui/eframe
//!
//! Renders the feedback window: prompt, option grid, free-text field,
//! pasted image strip and the submit button.

use eframe::egui::{self, RichText, Stroke, Vec2};
use egui_commonmark::{CommonMarkCache, CommonMarkViewer};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use tracing::{debug, info, warn};

use crate::feedback::{grid_columns, grid_position, FeedbackRequest, FeedbackResult};
use crate::images::{ImageStore, PastedImage, IMPORTABLE_EXTENSIONS};
use crate::session::{FeedbackSession, Toast, ToastLevel};
use crate::settings::{SettingsStore, WindowGeometry, WindowState};
use crate::theme::Palette;

const WINDOW_TITLE: &str = "Interactive Feedback";
const DEFAULT_SIZE: [f32; 2] = [800.0, 600.0];
const OPTIONS_MAX_HEIGHT: f32 = 200.0;
const PROMPT_MAX_HEIGHT: f32 = 200.0;
const THUMBNAIL_SIZE: Vec2 = Vec2::new(200.0, 150.0);
const TOAST_DURATION_MS: u64 = 2500;

/// Window icon files looked up beside the executable, first match wins
const ICON_CANDIDATES: [&str; 2] = ["icon.ico", "images/feedback.png"];

const MOON: &str = "🌙";
const SUN: &str = "☀";

/// GUI Application state
pub struct FeedbackApp {
    session: FeedbackSession,
    settings: SettingsStore,
    images: ImageStore,
    dark_mode: bool,
    palette: Palette,
    markdown_cache: CommonMarkCache,
    toasts: Vec<Toast>,
    /// Modal error message (failed paste, failed attach)
    notice: Option<String>,
    /// Thumbnail waiting for delete confirmation
    pending_removal: Option<PathBuf>,
    /// Receives the final result once, at close
    result_tx: Option<mpsc::Sender<FeedbackResult>>,
}

impl FeedbackApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        request: FeedbackRequest,
        settings: SettingsStore,
        images: ImageStore,
        result_tx: mpsc::Sender<FeedbackResult>,
    ) -> Self {
        egui_extras::install_image_loaders(&cc.egui_ctx);

        let dark_mode = settings.dark_mode();
        let palette = Palette::for_mode(dark_mode);
        palette.apply(&cc.egui_ctx, dark_mode);

        Self {
            session: FeedbackSession::new(request),
            settings,
            images,
            dark_mode,
            palette,
            markdown_cache: CommonMarkCache::default(),
            toasts: Vec::new(),
            notice: None,
            pending_removal: None,
            result_tx: Some(result_tx),
        }
    }

    fn toggle_theme(&mut self, ctx: &egui::Context) {
        match self.settings.toggle_dark_mode() {
            Ok(dark) => self.dark_mode = dark,
            Err(e) => {
                warn!("Failed to persist theme: {}", e);
                self.dark_mode = !self.dark_mode;
            }
        }
        self.palette = Palette::for_mode(self.dark_mode);
        self.palette.apply(ctx, self.dark_mode);
        debug!("Theme switched, dark_mode={}", self.dark_mode);
    }

    fn submit(&mut self, ctx: &egui::Context) {
        let result = self.session.submit();
        info!(
            "Feedback submitted ({} chars, {} images)",
            result.interactive_feedback.len(),
            result.image_paths.len()
        );
        self.finalize(ctx);
        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
    }

    /// Try to pull an image off the clipboard. Text pastes are left to the
    /// text field.
    fn paste_from_clipboard(&mut self, explicit: bool) {
        match PastedImage::from_clipboard() {
            Ok(Some(image)) => match self.session.paste_image(&self.images, image) {
                Ok(path) => {
                    debug!("Pasted image added: {}", path.display());
                    self.toasts.push(Toast::new(
                        "Screenshot added to feedback",
                        ToastLevel::Success,
                        TOAST_DURATION_MS,
                    ));
                }
                Err(e) => {
                    warn!("Failed to save pasted image: {}", e);
                    self.notice = Some(format!("Could not save the image: {}", e));
                }
            },
            Ok(None) => {
                if explicit {
                    self.toasts.push(Toast::new(
                        "The clipboard does not contain an image",
                        ToastLevel::Info,
                        TOAST_DURATION_MS,
                    ));
                }
            }
            Err(e) => {
                warn!("Clipboard unavailable: {}", e);
                if explicit {
                    self.notice = Some(e.to_string());
                }
            }
        }
    }

    fn attach_from_files(&mut self) {
        let Some(paths) = rfd::FileDialog::new()
            .add_filter("Images", &IMPORTABLE_EXTENSIONS)
            .pick_files()
        else {
            return;
        };

        for source in paths {
            match self.images.import_file(&source) {
                Ok(path) => self.session.add_image(path),
                Err(e) => {
                    warn!("Failed to attach {}: {}", source.display(), e);
                    self.notice = Some(format!("Could not attach {}: {}", source.display(), e));
                }
            }
        }
    }

    /// Persist geometry and hand the result to `main`. Runs once.
    fn finalize(&mut self, ctx: &egui::Context) {
        let Some(tx) = self.result_tx.take() else {
            return;
        };

        let (outer, inner, maximized) = ctx.input(|i| {
            let vp = i.viewport();
            (vp.outer_rect, vp.inner_rect, vp.maximized)
        });
        let geometry = match (outer, inner) {
            (Some(outer), Some(inner)) => Some(WindowGeometry {
                x: outer.min.x,
                y: outer.min.y,
                width: inner.width(),
                height: inner.height(),
            }),
            _ => None,
        };
        let state = WindowState {
            maximized: maximized.unwrap_or(false),
        };
        if let Err(e) = self.settings.save_window(geometry, state) {
            warn!("Failed to save window settings: {}", e);
        }

        let _ = tx.send(self.session.result());
    }
}

impl eframe::App for FeedbackApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if ctx.input(|i| i.viewport().close_requested()) {
            self.finalize(ctx);
            return;
        }

        // Ctrl+V arrives either as a paste event or, when the clipboard holds
        // no text, as a bare key press
        let paste_requested = ctx.input(|i| {
            i.events.iter().any(|e| match e {
                egui::Event::Paste(_) => true,
                egui::Event::Key {
                    key: egui::Key::V,
                    pressed: true,
                    modifiers,
                    ..
                } => modifiers.command,
                _ => false,
            })
        });
        if paste_requested && self.pending_removal.is_none() && self.notice.is_none() {
            self.paste_from_clipboard(false);
        }

        self.toasts.retain(|t| !t.is_expired());

        let mut submit = false;
        egui::CentralPanel::default()
            .frame(egui::Frame::new().fill(self.palette.window).inner_margin(12.0))
            .show(ctx, |ui| {
                submit = self.render_feedback_group(ui);
            });

        self.render_toasts(ctx);
        self.render_removal_confirm(ctx);
        self.render_notice(ctx);

        if submit {
            self.submit(ctx);
        }

        if !self.toasts.is_empty() {
            ctx.request_repaint();
        }
    }
}

impl FeedbackApp {
    /// Render the main group; returns true when the user submitted
    fn render_feedback_group(&mut self, ui: &mut egui::Ui) -> bool {
        let mut submit = false;

        egui::Frame::group(ui.style())
            .fill(self.palette.window)
            .inner_margin(10.0)
            .show(ui, |ui| {
                ui.set_width(ui.available_width());

                // Title bar: prompt + theme toggle
                ui.horizontal_top(|ui| {
                    let prompt_width = (ui.available_width() - 44.0).max(100.0);
                    ui.vertical(|ui| {
                        ui.set_width(prompt_width);
                        egui::ScrollArea::vertical()
                            .id_salt("prompt_scroll")
                            .max_height(PROMPT_MAX_HEIGHT)
                            .auto_shrink([false, true])
                            .show(ui, |ui| {
                                CommonMarkViewer::new().show(
                                    ui,
                                    &mut self.markdown_cache,
                                    self.session.prompt(),
                                );
                            });
                    });

                    let (icon, tip) = if self.dark_mode {
                        (SUN, "Switch to light theme")
                    } else {
                        (MOON, "Switch to dark theme")
                    };
                    if ui
                        .add(
                            egui::Button::new(RichText::new(icon).size(16.0))
                                .min_size(Vec2::splat(32.0)),
                        )
                        .on_hover_text(tip)
                        .clicked()
                    {
                        self.toggle_theme(ui.ctx());
                    }
                });

                if !self.session.options().is_empty() {
                    ui.add_space(10.0);
                    self.render_option_grid(ui);
                    ui.add_space(6.0);
                    ui.separator();
                }

                ui.add_space(6.0);
                submit |= self.render_text_field(ui);

                if self.session.has_images() {
                    ui.add_space(6.0);
                    self.render_image_strip(ui);
                }

                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    if ui
                        .button("📋 Paste image")
                        .on_hover_text("Attach the image currently on the clipboard")
                        .clicked()
                    {
                        self.paste_from_clipboard(true);
                    }
                    if ui
                        .button("📎 Attach image…")
                        .on_hover_text("Pick image files from disk")
                        .clicked()
                    {
                        self.attach_from_files();
                    }

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui
                            .add(
                                egui::Button::new(
                                    RichText::new("Send feedback")
                                        .color(self.palette.highlighted_text),
                                )
                                .fill(self.palette.highlight)
                                .min_size(Vec2::new(140.0, 32.0)),
                            )
                            .clicked()
                        {
                            submit = true;
                        }
                    });
                });
            });

        submit
    }

    fn render_option_grid(&mut self, ui: &mut egui::Ui) {
        let options = self.session.options().to_vec();
        let columns = grid_columns(options.len());

        egui::ScrollArea::vertical()
            .id_salt("options_scroll")
            .max_height(OPTIONS_MAX_HEIGHT)
            .auto_shrink([false, true])
            .show(ui, |ui| {
                egui::Grid::new("options_grid")
                    .num_columns(columns)
                    .spacing([10.0, 10.0])
                    .show(ui, |ui| {
                        for (index, option) in options.iter().enumerate() {
                            if let Some(checked) = self.session.checked_mut(index) {
                                ui.checkbox(checked, option.as_str());
                            }
                            let (_, col) = grid_position(index, columns);
                            if col + 1 == columns {
                                ui.end_row();
                            }
                        }
                    });
            });
    }

    /// Free-text field. Ctrl+Enter submits.
    fn render_text_field(&mut self, ui: &mut egui::Ui) -> bool {
        let text_id = egui::Id::new("feedback_text");

        // Consume the shortcut before the editor sees it, or it becomes a newline
        let shortcut = ui.ctx().memory(|m| m.has_focus(text_id))
            && ui
                .ctx()
                .input_mut(|i| i.consume_key(egui::Modifiers::COMMAND, egui::Key::Enter));

        let row_height = ui.text_style_height(&egui::TextStyle::Body);
        egui::ScrollArea::vertical()
            .id_salt("feedback_scroll")
            .min_scrolled_height(row_height * 5.0 + 10.0)
            .max_height(ui.available_height() * 0.6)
            .auto_shrink([false, true])
            .show(ui, |ui| {
                ui.add(
                    egui::TextEdit::multiline(&mut self.session.text)
                        .id(text_id)
                        .text_color(self.palette.text)
                        .hint_text(
                            RichText::new(
                                "Type your feedback here (Ctrl+Enter to submit)\n\
                                 Paste screenshots directly with Ctrl+V",
                            )
                            .color(self.palette.placeholder),
                        )
                        .desired_rows(5)
                        .desired_width(f32::INFINITY),
                );
            });

        shortcut
    }

    fn render_image_strip(&mut self, ui: &mut egui::Ui) {
        egui::ScrollArea::horizontal()
            .id_salt("image_strip")
            .auto_shrink([false, true])
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    for path in self.session.images() {
                        let uri = format!("file://{}", path.display());
                        let response = egui::Frame::new()
                            .stroke(Stroke::new(1.0, self.palette.text_disabled))
                            .inner_margin(2.0)
                            .show(ui, |ui| {
                                ui.add(
                                    egui::Image::new(uri)
                                        .max_size(THUMBNAIL_SIZE)
                                        .sense(egui::Sense::click()),
                                )
                            })
                            .inner
                            .on_hover_text("Click to remove image");

                        if response.clicked() {
                            self.pending_removal = Some(path.clone());
                        }
                    }
                });
            });
    }

    fn render_removal_confirm(&mut self, ctx: &egui::Context) {
        let Some(path) = self.pending_removal.clone() else {
            return;
        };

        let mut decision: Option<bool> = None;
        let modal = egui::Modal::new(egui::Id::new("confirm_remove_image")).show(ctx, |ui| {
            ui.set_width(280.0);
            ui.heading("Remove image");
            ui.add_space(6.0);
            ui.label("Remove this image from the feedback?");
            ui.add_space(10.0);
            ui.horizontal(|ui| {
                if ui.button("Yes").clicked() {
                    decision = Some(true);
                }
                if ui.button("No").clicked() {
                    decision = Some(false);
                }
            });
        });
        if modal.should_close() && decision.is_none() {
            decision = Some(false);
        }

        match decision {
            Some(true) => {
                self.session.remove_image(&path);
                debug!("Removed image {}", path.display());
                self.pending_removal = None;
            }
            Some(false) => self.pending_removal = None,
            None => {}
        }
    }

    fn render_notice(&mut self, ctx: &egui::Context) {
        let Some(message) = self.notice.clone() else {
            return;
        };

        let mut dismissed = false;
        let modal = egui::Modal::new(egui::Id::new("error_notice")).show(ctx, |ui| {
            ui.set_width(320.0);
            ui.label(RichText::new("Error").strong().color(self.palette.danger));
            ui.add_space(6.0);
            ui.label(&message);
            ui.add_space(10.0);
            if ui.button("OK").clicked() {
                dismissed = true;
            }
        });
        if dismissed || modal.should_close() {
            self.notice = None;
        }
    }

    fn render_toasts(&mut self, ctx: &egui::Context) {
        if self.toasts.is_empty() {
            return;
        }

        let mut to_dismiss: Option<usize> = None;
        egui::Area::new(egui::Id::new("toast_area"))
            .fixed_pos(egui::pos2(ctx.screen_rect().right() - 300.0, 16.0))
            .order(egui::Order::Foreground)
            .show(ctx, |ui| {
                ui.set_width(280.0);
                for (index, toast) in self.toasts.iter().enumerate() {
                    if self.render_toast(ui, toast) {
                        to_dismiss = Some(index);
                    }
                    ui.add_space(8.0);
                }
            });

        if let Some(index) = to_dismiss {
            self.toasts.remove(index);
        }
    }

    /// Render a single toast; returns true when its close button was clicked
    fn render_toast(&self, ui: &mut egui::Ui, toast: &Toast) -> bool {
        let (icon, border_color) = match toast.level {
            ToastLevel::Info => ("ℹ", self.palette.highlight),
            ToastLevel::Success => ("✓", self.palette.success),
        };

        let mut dismissed = false;
        egui::Frame::new()
            .fill(self.palette.base)
            .corner_radius(egui::CornerRadius::same(8))
            .stroke(Stroke::new(1.0, border_color))
            .inner_margin(10.0)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    ui.label(RichText::new(icon).size(16.0).color(border_color));
                    ui.label(RichText::new(&toast.message).size(13.0));
                    if ui
                        .add(egui::Button::new(RichText::new("×").size(14.0)).frame(false))
                        .clicked()
                    {
                        dismissed = true;
                    }
                });

                // Progress bar for auto-dismiss
                if !toast.duration.is_zero() {
                    ui.add_space(4.0);
                    let bar_rect = ui.available_rect_before_wrap();
                    let progress_rect = egui::Rect::from_min_size(
                        bar_rect.min,
                        Vec2::new(bar_rect.width() * toast.time_remaining_ratio(), 2.0),
                    );
                    ui.painter().rect_filled(
                        progress_rect,
                        egui::CornerRadius::same(1),
                        border_color.linear_multiply(0.7),
                    );
                }
            });
        dismissed
    }
}

/// Decode an image file into window icon pixels
fn load_icon(path: &Path) -> Result<egui::IconData, image::ImageError> {
    let image = image::open(path)?.to_rgba8();
    let (width, height) = image.dimensions();
    Ok(egui::IconData {
        rgba: image.into_raw(),
        width,
        height,
    })
}

/// First icon in `dir` that decodes; broken files are skipped
fn window_icon(dir: &Path) -> Option<egui::IconData> {
    ICON_CANDIDATES
        .iter()
        .map(|name| dir.join(name))
        .filter(|path| path.is_file())
        .find_map(|path| match load_icon(&path) {
            Ok(icon) => Some(icon),
            Err(e) => {
                warn!("Failed to load window icon {}: {}", path.display(), e);
                None
            }
        })
}

/// Window options restored from the settings store
fn native_options(settings: &SettingsStore) -> eframe::NativeOptions {
    let mut viewport = egui::ViewportBuilder::default()
        .with_title(WINDOW_TITLE)
        .with_min_inner_size([400.0, 300.0])
        .with_always_on_top()
        .with_active(true);

    let geometry = settings.geometry();
    viewport = match geometry {
        Some(g) => viewport
            .with_position([g.x, g.y])
            .with_inner_size([g.width, g.height]),
        None => viewport.with_inner_size(DEFAULT_SIZE),
    };
    if settings.window_state().maximized {
        viewport = viewport.with_maximized(true);
    }
    let exe_dir = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf));
    if let Some(icon) = exe_dir.as_deref().and_then(window_icon) {
        viewport = viewport.with_icon(icon);
    }

    eframe::NativeOptions {
        viewport,
        centered: geometry.is_none(),
        ..Default::default()
    }
}

/// Run the feedback window on the current thread until it closes.
///
/// Returns the submitted result, or an empty one when the window was
/// closed without submitting.
pub fn run_feedback_ui(
    request: FeedbackRequest,
    settings: SettingsStore,
    images: ImageStore,
) -> Result<FeedbackResult, eframe::Error> {
    let options = native_options(&settings);
    let (result_tx, result_rx) = mpsc::channel();

    eframe::run_native(
        WINDOW_TITLE,
        options,
        Box::new(move |cc| {
            Ok(Box::new(FeedbackApp::new(
                cc, request, settings, images, result_tx,
            )))
        }),
    )?;

    Ok(result_rx.try_recv().unwrap_or_else(|_| FeedbackResult::empty()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_png(path: &Path, size: u32) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        image::RgbaImage::from_pixel(size, size, image::Rgba([42, 130, 218, 255]))
            .save_with_format(path, image::ImageFormat::Png)
            .unwrap();
    }

    #[test]
    fn test_no_icon_files() {
        let dir = tempfile::tempdir().unwrap();
        assert!(window_icon(dir.path()).is_none());
    }

    #[test]
    fn test_icon_from_images_dir() {
        let dir = tempfile::tempdir().unwrap();
        write_png(&dir.path().join("images").join("feedback.png"), 4);

        let icon = window_icon(dir.path()).unwrap();
        assert_eq!((icon.width, icon.height), (4, 4));
        assert_eq!(icon.rgba.len(), 4 * 4 * 4);
        assert_eq!(&icon.rgba[..4], &[42, 130, 218, 255]);
    }

    #[test]
    fn test_broken_ico_falls_back_to_png() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("icon.ico"), b"garbage").unwrap();
        write_png(&dir.path().join("images").join("feedback.png"), 2);

        let icon = window_icon(dir.path()).unwrap();
        assert_eq!(icon.width, 2);
    }
}
