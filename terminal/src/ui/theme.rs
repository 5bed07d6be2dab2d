//! # GUI Theme
//!
//! Dark and light palettes for the swap terminal. The active mode is a
//! persisted setting ([`ThemeMode`]); [`Theme::apply`] pushes the matching
//! visuals into egui whenever it changes.

use crate::services::ThemeMode;
use egui::{Color32, Context, Stroke, Visuals};

/// Raw palette for one mode
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub background: Color32,
    pub panel: Color32,
    pub text: Color32,
    pub accent: Color32,
    pub border: Color32,
    pub muted: Color32,
    pub green: Color32,
    pub red: Color32,
    pub yellow: Color32,
    pub blue: Color32,
}

impl Palette {
    pub fn dark() -> Self {
        Palette {
            background: Color32::from_rgb(11, 13, 22),   // #0B0D16
            panel: Color32::from_rgb(20, 23, 36),        // #141724
            text: Color32::from_rgb(236, 238, 245),
            accent: Color32::from_rgb(128, 90, 245),     // Phoenix purple
            border: Color32::from_rgb(45, 49, 68),
            muted: Color32::from_rgb(140, 146, 170),
            green: Color32::from_rgb(60, 200, 120),
            red: Color32::from_rgb(235, 80, 80),
            yellow: Color32::from_rgb(245, 180, 40),
            blue: Color32::from_rgb(100, 150, 255),
        }
    }

    pub fn light() -> Self {
        Palette {
            background: Color32::from_rgb(248, 248, 252),
            panel: Color32::from_rgb(255, 255, 255),
            text: Color32::from_rgb(20, 22, 34),
            accent: Color32::from_rgb(105, 65, 220),
            border: Color32::from_rgb(215, 218, 230),
            muted: Color32::from_rgb(105, 110, 130),
            green: Color32::from_rgb(20, 150, 80),
            red: Color32::from_rgb(200, 40, 40),
            yellow: Color32::from_rgb(190, 130, 0),
            blue: Color32::from_rgb(40, 95, 210),
        }
    }
}

/// Semantic colors used by screens and widgets
#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub mode: ThemeMode,
    pub colors: Palette,
    /// Normal text color
    pub normal: Color32,
    /// Selected/highlighted items
    pub selected: Color32,
    pub border: Color32,
    /// Dimmed/secondary text
    pub dim: Color32,
    pub success: Color32,
    pub error: Color32,
    pub warning: Color32,
    pub info: Color32,
    /// Bid side of the book, buy fills
    pub bid: Color32,
    /// Ask side of the book, sell fills
    pub ask: Color32,
    pub background: Color32,
}

impl Default for Theme {
    fn default() -> Self {
        Self::for_mode(ThemeMode::default())
    }
}

impl Theme {
    pub fn for_mode(mode: ThemeMode) -> Self {
        let colors = match mode {
            ThemeMode::Dark => Palette::dark(),
            ThemeMode::Light => Palette::light(),
        };
        Theme {
            mode,
            colors,
            normal: colors.text,
            selected: colors.accent,
            border: colors.border,
            dim: colors.muted,
            success: colors.green,
            error: colors.red,
            warning: colors.yellow,
            info: colors.blue,
            bid: colors.green,
            ask: colors.red,
            background: colors.background,
        }
    }

    /// Color for a network TPS reading: text when unknown, error below the
    /// degraded threshold, success above it.
    pub fn tps_color(&self, reading: crate::services::TpsReading) -> Color32 {
        use crate::services::TpsReading;
        match reading {
            TpsReading::Unavailable => self.normal,
            TpsReading::Degraded(_) => self.error,
            TpsReading::Healthy(_) => self.success,
        }
    }

    /// egui visuals for this theme
    pub fn visuals(&self) -> Visuals {
        let c = &self.colors;
        let mut visuals = match self.mode {
            ThemeMode::Dark => Visuals::dark(),
            ThemeMode::Light => Visuals::light(),
        };

        visuals.override_text_color = Some(c.text);
        visuals.panel_fill = c.background;
        visuals.window_fill = c.panel;
        visuals.window_stroke = Stroke::new(1.0, c.border);
        visuals.faint_bg_color = c.panel;
        visuals.extreme_bg_color = c.panel;

        visuals.widgets.noninteractive.bg_fill = c.panel;
        visuals.widgets.noninteractive.bg_stroke = Stroke::new(1.0, c.border);
        visuals.widgets.noninteractive.fg_stroke = Stroke::new(1.0, c.text);

        visuals.widgets.inactive.bg_stroke = Stroke::new(1.0, c.border);
        visuals.widgets.hovered.bg_stroke = Stroke::new(1.5, c.accent);
        visuals.widgets.active.bg_stroke = Stroke::new(2.0, c.accent);
        visuals.widgets.open.bg_stroke = Stroke::new(1.5, c.accent);

        visuals.selection.bg_fill = c.accent.gamma_multiply(0.35);
        visuals.selection.stroke = Stroke::new(1.5, c.accent);
        visuals.hyperlink_color = c.blue;
        visuals.slider_trailing_fill = true;
        visuals
    }

    /// Switch egui to `mode`. Cheap to call every frame; only does work on a change.
    pub fn apply(ctx: &Context, mode: ThemeMode) {
        let applied_id = egui::Id::new("applied_theme_mode");
        let applied: Option<ThemeMode> = ctx.data_mut(|d| d.get_temp(applied_id));
        if applied == Some(mode) {
            return;
        }

        let theme = Self::for_mode(mode);
        let egui_theme = match mode {
            ThemeMode::Dark => egui::Theme::Dark,
            ThemeMode::Light => egui::Theme::Light,
        };
        ctx.style_mut_of(egui_theme, |style| {
            style.visuals = theme.visuals();
            style.spacing.item_spacing = egui::Vec2::new(6.0, 4.0);
            style.spacing.button_padding = egui::Vec2::new(10.0, 5.0);
            style.spacing.window_margin = egui::Margin::same(12);
        });
        ctx.set_theme(egui_theme);
        ctx.data_mut(|d| d.insert_temp(applied_id, mode));
        tracing::debug!(mode = ?mode, "Applied theme");
    }
}
