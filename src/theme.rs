//! Light and dark palettes for the feedback dialog

use eframe::egui::{self, Color32, Stroke};

#[derive(Clone, Copy, Debug)]
pub struct Palette {
    pub window: Color32,
    pub window_text: Color32,
    pub base: Color32,
    pub alternate_base: Color32,
    pub text: Color32,
    pub text_disabled: Color32,
    pub button: Color32,
    pub dark: Color32,
    pub shadow: Color32,
    pub highlight: Color32,
    pub highlighted_text: Color32,
    pub link: Color32,
    pub danger: Color32,
    pub success: Color32,
    pub placeholder: Color32,
}

impl Palette {
    pub fn dark() -> Self {
        Self {
            window: Color32::from_rgb(53, 53, 53),
            window_text: Color32::WHITE,
            base: Color32::from_rgb(42, 42, 42),
            alternate_base: Color32::from_rgb(66, 66, 66),
            text: Color32::WHITE,
            text_disabled: Color32::from_rgb(127, 127, 127),
            button: Color32::from_rgb(53, 53, 53),
            dark: Color32::from_rgb(35, 35, 35),
            shadow: Color32::from_rgb(20, 20, 20),
            highlight: Color32::from_rgb(42, 130, 218),
            highlighted_text: Color32::WHITE,
            link: Color32::from_rgb(42, 130, 218),
            danger: Color32::from_rgb(239, 68, 68),
            success: Color32::from_rgb(34, 197, 94),
            placeholder: Color32::from_rgb(127, 127, 127),
        }
    }

    /// Visual Studio style light theme
    pub fn light() -> Self {
        Self {
            window: Color32::from_rgb(240, 240, 240),
            window_text: Color32::from_rgb(30, 30, 30),
            base: Color32::from_rgb(255, 255, 255),
            alternate_base: Color32::from_rgb(245, 245, 245),
            text: Color32::from_rgb(30, 30, 30),
            text_disabled: Color32::from_rgb(180, 180, 180),
            button: Color32::from_rgb(240, 240, 240),
            dark: Color32::from_rgb(220, 220, 220),
            shadow: Color32::from_rgb(200, 200, 200),
            highlight: Color32::from_rgb(0, 120, 215),
            highlighted_text: Color32::WHITE,
            link: Color32::from_rgb(0, 120, 215),
            danger: Color32::from_rgb(200, 0, 0),
            success: Color32::from_rgb(22, 163, 74),
            placeholder: Color32::from_rgb(180, 180, 180),
        }
    }

    pub fn for_mode(dark_mode: bool) -> Self {
        if dark_mode {
            Self::dark()
        } else {
            Self::light()
        }
    }

    /// egui visuals matching this palette
    pub fn visuals(&self, dark_mode: bool) -> egui::Visuals {
        let mut visuals = if dark_mode {
            egui::Visuals::dark()
        } else {
            egui::Visuals::light()
        };
        visuals.override_text_color = Some(self.window_text);
        visuals.panel_fill = self.window;
        visuals.window_fill = self.window;
        visuals.extreme_bg_color = self.base;
        visuals.faint_bg_color = self.alternate_base;
        visuals.hyperlink_color = self.link;
        visuals.error_fg_color = self.danger;
        visuals.window_stroke = Stroke::new(1.0, self.dark);
        visuals.widgets.noninteractive.bg_fill = self.window;
        visuals.widgets.noninteractive.bg_stroke = Stroke::new(1.0, self.dark);
        visuals.widgets.inactive.bg_fill = self.button;
        visuals.widgets.inactive.weak_bg_fill = self.button;
        visuals.widgets.inactive.bg_stroke = Stroke::new(1.0, self.shadow);
        visuals.widgets.hovered.bg_stroke = Stroke::new(1.0, self.highlight);
        visuals.widgets.active.bg_fill = self.highlight;
        visuals.selection.bg_fill = self.highlight;
        visuals.selection.stroke = Stroke::new(1.0, self.highlighted_text);
        visuals
    }

    /// Apply to the whole context
    pub fn apply(&self, ctx: &egui::Context, dark_mode: bool) {
        ctx.set_visuals(self.visuals(dark_mode));
    }
}
