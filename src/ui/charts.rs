use std::ops::RangeInclusive;

use chrono::{Duration, NaiveDate};
use eframe::egui::Ui;
use egui_plot::{Bar, BarChart, GridMark, Legend, Line, Plot, PlotPoints};

use crate::color;
use crate::data::analysis::{self, CustomerRfm};
use crate::data::model::OrderDataset;
use crate::state::{AppState, Section};

const TOP_N: usize = 10;
const TOP_CUSTOMERS: usize = 5;

// ---------------------------------------------------------------------------
// Central panel – section dispatch
// ---------------------------------------------------------------------------

/// Render the active analysis section in the central panel.
pub fn central_panel(ui: &mut Ui, state: &AppState) {
    let Some(dataset) = &state.dataset else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open an orders file to start  (File → Open…)");
        });
        return;
    };

    ui.heading(state.section.label());
    ui.separator();

    if state.visible_indices.is_empty() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("No orders in the selected date range.");
        });
        return;
    }

    match state.section {
        Section::SalesAnalysis => sales_analysis(ui, dataset, &state.visible_indices),
        Section::ProductInsights => product_insights(ui, dataset, &state.visible_indices),
        Section::GeographicAnalysis => geographic_analysis(ui, dataset, &state.visible_indices),
        Section::CustomerSegmentation => customer_segmentation(ui, dataset, &state.visible_indices),
    }
}

// ---------------------------------------------------------------------------
// Sales Analysis – monthly revenue line
// ---------------------------------------------------------------------------

fn sales_analysis(ui: &mut Ui, dataset: &OrderDataset, indices: &[usize]) {
    let trend = analysis::monthly_sales_trend(dataset, indices);
    let total: f64 = trend.iter().map(|m| m.total).sum();

    ui.label(format!(
        "Total revenue: {:.2} across {} months",
        total,
        trend.len()
    ));
    ui.add_space(4.0);

    let points: PlotPoints = trend
        .iter()
        .map(|m| [date_to_x(m.month), m.total])
        .collect();

    Plot::new("monthly_sales")
        .legend(Legend::default())
        .x_axis_label("Month")
        .y_axis_label("Total sales")
        .x_axis_formatter(month_axis_formatter)
        .show(ui, |plot_ui| {
            let line = Line::new(points)
                .name("Monthly revenue")
                .color(color::ACCENT)
                .width(2.0);
            plot_ui.line(line);
        });
}

/// Months are plotted as days since the Unix epoch.
fn date_to_x(date: NaiveDate) -> f64 {
    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap_or(date);
    (date - epoch).num_days() as f64
}

fn month_axis_formatter(mark: GridMark, _range: &RangeInclusive<f64>) -> String {
    let epoch = match NaiveDate::from_ymd_opt(1970, 1, 1) {
        Some(d) => d,
        None => return String::new(),
    };
    let date = epoch + Duration::days(mark.value.round() as i64);
    date.format("%b %Y").to_string()
}

// ---------------------------------------------------------------------------
// Product Insights – top categories by order-line count
// ---------------------------------------------------------------------------

fn product_insights(ui: &mut Ui, dataset: &OrderDataset, indices: &[usize]) {
    let top = analysis::top_categories_by_count(dataset, indices, TOP_N);
    if top.is_empty() {
        ui.label("No categorised order lines in the selection.");
        return;
    }

    ui.label(format!("Top {} product categories by order lines", top.len()));
    ui.add_space(4.0);

    let palette = color::generate_palette(top.len());
    let bars: Vec<Bar> = top
        .iter()
        .zip(palette)
        .enumerate()
        .map(|(i, (cat, fill))| {
            Bar::new(i as f64, cat.count as f64)
                .name(&cat.category)
                .fill(fill)
                .width(0.7)
        })
        .collect();

    let labels: Vec<String> = top.iter().map(|c| c.category.clone()).collect();

    Plot::new("top_categories")
        .y_axis_label("Order lines")
        .x_axis_formatter(category_formatter(labels))
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).name("Categories"));
        });
}

// ---------------------------------------------------------------------------
// Geographic Analysis – revenue per state
// ---------------------------------------------------------------------------

fn geographic_analysis(ui: &mut Ui, dataset: &OrderDataset, indices: &[usize]) {
    let mut ranked = analysis::sales_by_state(dataset, indices);
    ranked.truncate(TOP_N);

    ui.label(format!("Top {} states by total sales", ranked.len()));
    ui.add_space(4.0);

    // Dark-to-light shades, best state darkest.
    let palette = color::sequential_palette(ranked.len());
    let bars: Vec<Bar> = ranked
        .iter()
        .zip(palette)
        .enumerate()
        .map(|(i, (s, fill))| {
            Bar::new(i as f64, s.total)
                .name(&s.state)
                .fill(fill)
                .width(0.7)
        })
        .collect();

    let labels: Vec<String> = ranked.iter().map(|s| s.state.clone()).collect();

    Plot::new("state_sales")
        .x_axis_label("State")
        .y_axis_label("Total sales")
        .x_axis_formatter(category_formatter(labels))
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).name("States"));
        });
}

// ---------------------------------------------------------------------------
// Customer Segmentation – RFM rankings and value segments
// ---------------------------------------------------------------------------

fn customer_segmentation(ui: &mut Ui, dataset: &OrderDataset, indices: &[usize]) {
    let metrics = analysis::customer_rfm(dataset, indices);

    ui.label(format!(
        "Best customers by RFM parameters ({} customers in range)",
        metrics.len()
    ));
    ui.add_space(4.0);

    let chart_height = ui.available_height() * 0.45;
    ui.columns(3, |cols: &mut [Ui]| {
        rfm_ranking_chart(
            &mut cols[0],
            "rfm_recency",
            "By Recency (days)",
            &analysis::top_by_recency(&metrics, TOP_CUSTOMERS),
            |m| m.recency_days as f64,
            chart_height,
        );
        rfm_ranking_chart(
            &mut cols[1],
            "rfm_frequency",
            "By Frequency",
            &analysis::top_by_frequency(&metrics, TOP_CUSTOMERS),
            |m| m.frequency as f64,
            chart_height,
        );
        rfm_ranking_chart(
            &mut cols[2],
            "rfm_monetary",
            "By Monetary",
            &analysis::top_by_monetary(&metrics, TOP_CUSTOMERS),
            |m| m.monetary,
            chart_height,
        );
    });

    ui.add_space(8.0);
    ui.label("Customer value segments (by total spend)");

    let segments = analysis::value_segments(&metrics);
    let palette = color::generate_palette(segments.len());
    let bars: Vec<Bar> = segments
        .iter()
        .zip(palette)
        .enumerate()
        .map(|(i, (seg, fill))| {
            Bar::new(i as f64, seg.count as f64)
                .name(seg.segment.to_string())
                .fill(fill)
                .width(0.5)
        })
        .collect();
    let labels: Vec<String> = segments.iter().map(|s| s.segment.to_string()).collect();

    Plot::new("value_segments")
        .y_axis_label("Customers")
        .x_axis_formatter(category_formatter(labels))
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).name("Segments"));
        });
}

/// One of the three top-customer bar charts.  `value` picks the ranked
/// metric for the y axis.
fn rfm_ranking_chart(
    ui: &mut Ui,
    id: &str,
    title: &str,
    ranked: &[CustomerRfm],
    value: impl Fn(&CustomerRfm) -> f64,
    height: f32,
) {
    ui.strong(title);

    let bars: Vec<Bar> = ranked
        .iter()
        .enumerate()
        .map(|(i, m)| {
            Bar::new(i as f64, value(m))
                .name(m.label())
                .fill(color::ACCENT)
                .width(0.7)
        })
        .collect();

    let labels: Vec<String> = ranked.iter().map(|m| m.label().to_string()).collect();

    Plot::new(id.to_string())
        .height(height)
        .x_axis_formatter(category_formatter(labels))
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars));
        });
}

// ---------------------------------------------------------------------------
// Axis helpers
// ---------------------------------------------------------------------------

/// Axis formatter mapping integer bar positions back to category labels.
fn category_formatter(
    labels: Vec<String>,
) -> impl Fn(GridMark, &RangeInclusive<f64>) -> String {
    move |mark: GridMark, _range: &RangeInclusive<f64>| {
        let idx = mark.value.round();
        if (mark.value - idx).abs() > 1e-6 || idx < 0.0 {
            return String::new();
        }
        labels
            .get(idx as usize)
            .cloned()
            .unwrap_or_default()
    }
}
