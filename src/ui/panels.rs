use eframe::egui::{self, Color32, RichText, Ui};
use egui_extras::DatePickerButton;

use crate::data::filter::DateFilter;
use crate::state::{AppState, Section};

// ---------------------------------------------------------------------------
// Left side panel – date range and section selector
// ---------------------------------------------------------------------------

/// Render the left sidebar: date-range picker plus the section radio.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Dashboard");
    ui.separator();

    let Some(dataset) = &state.dataset else {
        ui.label("No dataset loaded.");
        ui.label("Use File → Open to load an orders file.");
        return;
    };

    let (min_date, max_date) = dataset.date_range();
    let current = state
        .date_filter
        .unwrap_or(DateFilter::full_range(dataset));

    // ---- Date range ----
    ui.strong("Date range");
    ui.add_space(2.0);

    let mut start = current.start;
    let mut end = current.end;
    let mut changed = false;

    ui.horizontal(|ui: &mut Ui| {
        ui.label("From");
        changed |= ui
            .add(DatePickerButton::new(&mut start).id_salt("start_date"))
            .changed();
    });
    ui.horizontal(|ui: &mut Ui| {
        ui.label("To");
        changed |= ui
            .add(DatePickerButton::new(&mut end).id_salt("end_date"))
            .changed();
    });

    if changed {
        state.set_date_filter(DateFilter { start, end });
    }

    if ui.small_button("Full range").clicked() {
        state.reset_date_range();
    }
    ui.label(
        RichText::new(format!("Data covers {min_date} – {max_date}"))
            .small()
            .weak(),
    );

    ui.separator();

    // ---- Section selector ----
    ui.strong("Sections");
    ui.add_space(2.0);
    for section in Section::ALL {
        if ui
            .radio(state.section == section, section.label())
            .clicked()
        {
            state.set_section(section);
        }
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{} order lines loaded, {} in range",
                ds.len(),
                state.visible_indices.len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open order data")
        .add_filter("Supported files", &["csv", "json"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .pick_file();

    if let Some(path) = file {
        state.loading = true;
        match crate::data::loader::load_file(&path) {
            Ok(dataset) => {
                log::info!(
                    "Loaded {} order lines covering {} – {}",
                    dataset.len(),
                    dataset.min_date,
                    dataset.max_date
                );
                state.set_dataset(dataset);
            }
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
                state.loading = false;
            }
        }
    }
}
