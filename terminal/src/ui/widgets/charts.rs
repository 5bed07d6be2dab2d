//! # Analytics Charts
//!
//! Volume bars and price history line, drawn with `egui_plot`. The API
//! returns both series newest first.

use crate::ui::theme::Theme;
use egui_plot::{Bar, BarChart, Line, Plot, PlotPoints};
use lib_solana::data_api::types::{PricePoint, VolumePoint};
use lib_utils::{abbreviate_total, format_date};

/// Hourly buckets in a day.
pub const HOURS_PER_DAY: usize = 24;

/// Price history comes in 30s snapshots; the chart keeps one per 15 minutes.
pub const PRICE_SAMPLE_EVERY: usize = 30;

/// `(24H, TOTAL)` volume in quote units.
pub fn volume_totals(points: &[VolumePoint]) -> (f64, f64) {
    let day = points.iter().take(HOURS_PER_DAY).map(VolumePoint::volume).sum();
    let total = points.iter().map(VolumePoint::volume).sum();
    (day, total)
}

/// Unix seconds of a bucket's `time`, which is RFC 3339.
fn bucket_secs(point: &VolumePoint) -> Option<i64> {
    chrono::DateTime::parse_from_rfc3339(&point.time)
        .ok()
        .map(|t| t.timestamp())
}

pub fn sample_prices(points: &[PricePoint]) -> Vec<&PricePoint> {
    points.iter().step_by(PRICE_SAMPLE_EVERY).collect()
}

/// Newest price at or above the oldest one shown.
pub fn price_is_up(sampled: &[&PricePoint]) -> bool {
    match (sampled.first(), sampled.last()) {
        (Some(newest), Some(oldest)) => newest.price() >= oldest.price(),
        _ => false,
    }
}

fn date_span(from_secs: i64, to_secs: i64) -> String {
    let (from, _) = format_date(from_secs);
    let (to, _) = format_date(to_secs);
    if from == to {
        from
    } else {
        format!("{} - {}", from, to)
    }
}

fn stat(ui: &mut egui::Ui, label: &str, value: String, theme: &Theme) {
    ui.vertical(|ui| {
        ui.colored_label(theme.dim, egui::RichText::new(label).small());
        ui.label(egui::RichText::new(value).size(18.0));
    });
}

/// Volume bars with 24H and TOTAL figures.
pub fn render_volume(ui: &mut egui::Ui, id: &str, points: &[VolumePoint], quote_symbol: Option<&str>, theme: &Theme) {
    ui.horizontal(|ui| {
        ui.strong("Volume");
        ui.colored_label(theme.dim, format!("({})", quote_symbol.unwrap_or("N/A")));
        if !points.is_empty() {
            let (day, total) = volume_totals(points);
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Min), |ui| {
                stat(ui, "TOTAL", abbreviate_total(total, false), theme);
                ui.add_space(12.0);
                stat(ui, "24H", abbreviate_total(day, false), theme);
            });
        }
    });

    if points.is_empty() {
        super::tables::render_empty_state(ui, "No volume in range", None, theme);
        return;
    }

    let bars: Vec<Bar> = points
        .iter()
        .enumerate()
        .map(|(i, point)| {
            // Oldest bucket on the left
            let x = (points.len() - 1 - i) as f64;
            Bar::new(x, point.volume()).width(0.8).fill(theme.selected)
        })
        .collect();

    Plot::new(id.to_string())
        .height(180.0)
        .allow_scroll(false)
        .allow_drag(false)
        .show_axes([false, true])
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new("Volume", bars));
        });

    let span = match (points.last().and_then(bucket_secs), points.first().and_then(bucket_secs)) {
        (Some(oldest), Some(newest)) => date_span(oldest, newest),
        _ => String::new(),
    };
    ui.colored_label(theme.dim, egui::RichText::new(span).small());
}

/// Price history line, colored by direction over the window.
pub fn render_price(ui: &mut egui::Ui, points: &[PricePoint], quote_symbol: Option<&str>, theme: &Theme) {
    ui.horizontal(|ui| {
        ui.strong("Price");
        ui.colored_label(theme.dim, format!("({})", quote_symbol.unwrap_or("N/A")));
    });

    let sampled = sample_prices(points);
    if sampled.is_empty() {
        super::tables::render_empty_state(ui, "No price history", None, theme);
        return;
    }

    let color = if price_is_up(&sampled) { theme.success } else { theme.error };
    let line: Vec<[f64; 2]> = sampled
        .iter()
        .rev()
        .map(|p| [p.timestamp() as f64, p.price()])
        .collect();

    Plot::new("price_history")
        .height(180.0)
        .allow_scroll(false)
        .allow_drag(false)
        .show_axes([false, true])
        .show(ui, |plot_ui| {
            plot_ui.line(Line::new("Price", PlotPoints::from(line)).color(color).width(2.0));
        });

    if let (Some(newest), Some(oldest)) = (sampled.first(), sampled.last()) {
        ui.colored_label(
            theme.dim,
            egui::RichText::new(date_span(oldest.timestamp(), newest.timestamp())).small(),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn volume(v: f64) -> VolumePoint {
        VolumePoint {
            time: "2024-01-01T00:00:00Z".to_string(),
            volume_in_quote_units: v.to_string(),
        }
    }

    fn price(ts: i64, p: f64) -> PricePoint {
        PricePoint {
            price: p.to_string(),
            unix_timestamp: ts.to_string(),
        }
    }

    #[test]
    fn test_volume_totals_use_first_day() {
        let points: Vec<VolumePoint> = (0..30).map(|_| volume(2.0)).collect();
        assert_eq!(volume_totals(&points), (48.0, 60.0));
        assert_eq!(volume_totals(&[]), (0.0, 0.0));
        assert_eq!(bucket_secs(&points[0]), Some(1_704_067_200));
    }

    #[test]
    fn test_price_sampling_and_direction() {
        let points: Vec<PricePoint> = (0..61).map(|i| price(1_000 - i, 100.0 - i as f64)).collect();
        let sampled = sample_prices(&points);
        assert_eq!(sampled.len(), 3);
        assert_eq!(sampled[1].price(), 70.0);
        // Newest first, and the newest is the highest
        assert!(price_is_up(&sampled));
        assert!(!price_is_up(&[]));
    }
}
