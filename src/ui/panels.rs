use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::DatePickerButton;

use crate::config::Dashboard;
use crate::data::filter::DateRange;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – selector widgets
// ---------------------------------------------------------------------------

/// Render the selectors of the active dashboard.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading(state.dashboard.label());
    ui.separator();

    if state.dataset.is_empty() {
        ui.label("The trajectory table is empty.");
        return;
    }

    let dataset = state.dataset.clone();
    let mut changed = false;

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| match state.dashboard {
            Dashboard::Trajectory => {
                changed |= dropdown(ui, "Targets", "target_filter", dataset.targets(), &mut state.trajectory.target);
                changed |= dropdown(ui, "Path", "path_filter", dataset.paths(), &mut state.trajectory.path);
                let picked = date_range(ui, "trajectory", state.trajectory.dates);
                if let Some(range) = picked {
                    state.trajectory.dates = state.clamp_dates(range);
                    changed = true;
                }
            }
            Dashboard::Capability => {
                let vehicles = state.vehicles.names().to_vec();
                changed |= dropdown(ui, "Launch Vehicle", "vehicle_filter", &vehicles, &mut state.capability.vehicle);
                changed |= dropdown(ui, "Path", "cap_path_filter", dataset.paths(), &mut state.capability.path);
                let picked = date_range(ui, "capability", state.capability.dates);
                if let Some(range) = picked {
                    state.capability.dates = state.clamp_dates(range);
                    changed = true;
                }
            }
        });

    if changed {
        state.refilter();
    }
}

/// A labelled single-choice dropdown. Returns whether the choice changed.
fn dropdown(ui: &mut Ui, title: &str, id: &str, options: &[String], current: &mut Option<String>) -> bool {
    ui.strong(title);
    let before = current.clone();
    egui::ComboBox::from_id_salt(id)
        .selected_text(current.as_deref().unwrap_or("–"))
        .width(ui.available_width())
        .show_ui(ui, |ui: &mut Ui| {
            for option in options {
                ui.selectable_value(current, Some(option.clone()), option);
            }
        });
    ui.add_space(8.0);
    *current != before
}

/// "Launch Date" start/end pickers. Returns the new range if either end moved.
fn date_range(ui: &mut Ui, id: &str, range: DateRange) -> Option<DateRange> {
    ui.strong("Launch Date");
    let mut start = range.start;
    let mut end = range.end;

    ui.horizontal(|ui: &mut Ui| {
        ui.label("From");
        ui.add(
            DatePickerButton::new(&mut start)
                .id_salt(&format!("{id}_start")),
        );
    });
    ui.horizontal(|ui: &mut Ui| {
        ui.label("To");
        ui.add(
            DatePickerButton::new(&mut end)
                .id_salt(&format!("{id}_end")),
        );
    });

    let picked = DateRange::new(start, end);
    if picked.start > picked.end {
        ui.label(RichText::new("Start is after end; nothing matches.").color(Color32::YELLOW));
    }
    (picked != range).then_some(picked)
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
            if ui.button("Export charts…").clicked() {
                export_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        for dashboard in [Dashboard::Trajectory, Dashboard::Capability] {
            if ui
                .selectable_label(state.dashboard == dashboard, dashboard.label())
                .clicked()
            {
                state.set_dashboard(dashboard);
            }
        }

        ui.separator();

        let (total, visible) = state.counts();
        ui.label(format!("{total} trajectories loaded, {visible} visible"))
            .on_hover_text(state.dataset_path.display().to_string());

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open trajectory table")
        .add_filter("Supported files", &["csv", "parquet", "pq", "json"])
        .add_filter("CSV", &["csv"])
        .add_filter("Parquet", &["parquet", "pq"])
        .add_filter("JSON", &["json"])
        .pick_file();

    if let Some(path) = file {
        match crate::data::loader::load_file(&path) {
            Ok(dataset) => state.set_dataset(dataset, &path),
            Err(e) => {
                log::error!("Failed to load file: {e}");
                state.status_message = Some(format!("Error: {e}"));
            }
        }
    }
}

pub fn export_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Export charts")
        .add_filter("JSON", &["json"])
        .set_file_name("charts.json")
        .save_file();

    if let Some(path) = file {
        if let Err(e) = crate::data::project::export_figures(&path, &state.charts.charts) {
            log::error!("Failed to export charts: {e:#}");
            state.status_message = Some(format!("Error: {e:#}"));
        }
    }
}
