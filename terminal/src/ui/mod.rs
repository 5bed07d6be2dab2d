//! # GUI Rendering Framework
//!
//! [`TerminalApp`] is the `eframe::App`. Each frame it applies the theme,
//! runs [`App::on_tick`], moves queued notices into toasts, then draws the
//! nav bar, the current screen and any open modals from a state snapshot.

pub mod modals;
pub mod screens;
pub mod theme;
pub mod widgets;

use crate::app::{App, Screen};
use std::time::{Duration, Instant};
use theme::Theme;
use tracing::warn;
use widgets::notifications::NotificationManager;

/// Repaint cadence while idle, so provider updates show without input.
const REPAINT_INTERVAL: Duration = Duration::from_millis(100);
const SLOW_FRAME: Duration = Duration::from_millis(50);

pub struct TerminalApp {
    app: App,
    notifications: NotificationManager,
}

impl TerminalApp {
    pub fn new(app: App) -> Self {
        Self {
            app,
            notifications: NotificationManager::new(),
        }
    }
}

impl eframe::App for TerminalApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let frame_start = Instant::now();
        let mode = self.app.services.settings.theme_mode();
        Theme::apply(ctx, mode);
        let theme = Theme::for_mode(mode);

        self.app.on_tick();

        // Snapshot; no lock is held while the frame is built
        let state = {
            let mut guard = self.app.state.write();
            for notice in guard.take_notices() {
                self.notifications.push(notice);
            }
            guard.clone()
        };

        egui::TopBottomPanel::top("nav_bar").show(ctx, |ui| {
            widgets::nav_bar::render_nav_bar(ui, &state, &mut self.app, &theme);
        });

        egui::CentralPanel::default().show(ctx, |ui| match state.current_screen {
            Screen::Landing => screens::landing::render(ui, &state, &mut self.app, &theme),
            Screen::Swap => screens::swap::render(ui, &state, &mut self.app, &theme),
            Screen::Data => screens::data::render(ui, &state, &mut self.app, &theme),
        });

        modals::render(ctx, &state, &mut self.app, &theme);
        self.notifications.show(ctx);

        let elapsed = frame_start.elapsed();
        if elapsed > SLOW_FRAME {
            warn!(
                frame_ms = elapsed.as_millis() as u64,
                screen = ?state.current_screen,
                active_tasks = crate::debug::active_task_count(),
                "Slow frame"
            );
        }
        ctx.request_repaint_after(REPAINT_INTERVAL);
    }
}
