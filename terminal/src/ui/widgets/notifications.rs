//! # Notifications Widget
//!
//! Toasts via egui-notify. Notices queued on [`AppState`](crate::app::AppState)
//! are drained into the manager once per frame.
//!
//! A notice carrying the same id as the toast shown just before it replaces
//! that toast (the swap flow's loading, then result). A notice link is shown
//! as a hyperlink under the toasts for as long as its toast lives.

use crate::app::{Notice, NoticeKind};
use egui_notify::Toasts;
use std::time::{Duration, Instant};
use tracing::warn;

pub const DEFAULT_DURATION: Duration = Duration::from_secs(8);
pub const SHORT_DURATION: Duration = Duration::from_secs(4);

/// How long a notice stays up. Loading toasts stay until replaced.
pub fn duration_for(notice: &Notice) -> Option<Duration> {
    match (notice.kind, notice.short) {
        (NoticeKind::Loading, _) => None,
        (_, true) => Some(SHORT_DURATION),
        (_, false) => Some(DEFAULT_DURATION),
    }
}

struct ActiveLink {
    url: String,
    until: Instant,
}

/// Notification manager for the application
pub struct NotificationManager {
    pub toasts: Toasts,
    /// Id of the most recent toast, if it had one
    last_id: Option<String>,
    link: Option<ActiveLink>,
}

impl Default for NotificationManager {
    fn default() -> Self {
        Self {
            toasts: Toasts::default().with_anchor(egui_notify::Anchor::BottomRight),
            last_id: None,
            link: None,
        }
    }
}

impl NotificationManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, notice: Notice) {
        if notice.id.is_some() && notice.id == self.last_id {
            self.toasts.dismiss_latest_toast();
        }
        self.last_id = notice.id.clone();

        let duration = duration_for(&notice);
        let toast = match notice.kind {
            NoticeKind::Success => self.toasts.success(notice.message),
            NoticeKind::Error => self.toasts.error(notice.message),
            NoticeKind::Loading => self.toasts.info(notice.message),
            NoticeKind::Plain => self.toasts.basic(notice.message),
        };
        toast.duration(duration);

        self.link = notice.link.map(|url| ActiveLink {
            url,
            until: Instant::now() + duration.unwrap_or(DEFAULT_DURATION),
        });
    }

    /// Render notifications in the UI context
    pub fn show(&mut self, ctx: &egui::Context) {
        self.toasts.show(ctx);

        if self.link.as_ref().is_some_and(|l| l.until <= Instant::now()) {
            self.link = None;
        }
        if let Some(link) = &self.link {
            egui::Area::new(egui::Id::new("notification_link"))
                .anchor(egui::Align2::RIGHT_BOTTOM, egui::vec2(-16.0, -4.0))
                .show(ctx, |ui| {
                    if ui.link("View transaction ↗").clicked() {
                        if let Err(e) = open::that(&link.url) {
                            warn!(url = %link.url, error = %e, "Failed to open browser");
                        }
                    }
                });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_durations() {
        assert_eq!(duration_for(&Notice::success("ok")), Some(DEFAULT_DURATION));
        assert_eq!(duration_for(&Notice::plain("cancelled").short()), Some(SHORT_DURATION));
        assert_eq!(duration_for(&Notice::loading("Preparing transaction...")), None);
    }
}
