use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::filter::{MultiSelect, SexFilter};
use crate::state::{AppState, LoadStatus};

// ---------------------------------------------------------------------------
// Left side panel – data source and filter widgets
// ---------------------------------------------------------------------------

/// Render the left panel: logo, data source controls, filters.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    // ---- Logo (centered, only when one was found on disk) ----
    if let Some(uri) = state.logo_uri.clone() {
        ui.vertical_centered(|ui: &mut Ui| {
            ui.add(
                egui::Image::from_uri(uri)
                    .max_width(ui.available_width() * 0.8)
                    .max_height(120.0),
            );
        });
        ui.add_space(4.0);
    }

    // ---- Data source ----
    ui.heading("Data");
    ui.separator();
    ui.text_edit_singleline(&mut state.data_path);
    ui.horizontal(|ui: &mut Ui| {
        if ui.button("Browse…").clicked() {
            pick_data_file(state);
        }
        if ui.button("Load").clicked() {
            state.load_current();
        }
        if ui.button("Reload").clicked() {
            state.reload_current();
        }
    });
    ui.add_space(8.0);

    ui.heading("Filters");
    ui.separator();

    if state.table.is_none() {
        ui.label("No dataset loaded.");
        return;
    }

    let mut changed = false;

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Sex selector ----
            ui.strong("Sex");
            egui::ComboBox::from_id_salt("sex_filter")
                .selected_text(state.filters.sex.label())
                .show_ui(ui, |ui: &mut Ui| {
                    for variant in SexFilter::VARIANTS {
                        if ui
                            .selectable_label(state.filters.sex == variant, variant.label())
                            .clicked()
                            && state.filters.sex != variant
                        {
                            state.filters.sex = variant;
                            changed = true;
                        }
                    }
                });
            ui.separator();

            // ---- Multi-select filters (collapsible) ----
            multi_select_widget(ui, "Age group", &mut state.filters.age_groups, &mut changed);
            multi_select_widget(ui, "Job", &mut state.filters.jobs, &mut changed);
        });

    if changed {
        state.recompute_summaries();
    }
}

/// One collapsible multi-select. Absent columns render an explanatory
/// label instead of an empty widget.
fn multi_select_widget(
    ui: &mut Ui,
    title: &str,
    select: &mut Option<MultiSelect>,
    changed: &mut bool,
) {
    let Some(select) = select.as_mut() else {
        ui.weak(format!("{title}: column not in dataset"));
        ui.separator();
        return;
    };

    let n_selected = select.selected_count();
    let n_total = select.options().len();
    let header_text = format!("{title}  ({n_selected}/{n_total})");

    egui::CollapsingHeader::new(RichText::new(header_text).strong())
        .id_salt(title)
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            ui.horizontal(|ui: &mut Ui| {
                if ui.small_button("All").clicked() {
                    select.select_all();
                    *changed = true;
                }
                if ui.small_button("None").clicked() {
                    select.select_none();
                    *changed = true;
                }
            });

            let options = select.options().to_vec();
            for option in &options {
                let mut checked = select.is_selected(option);
                if ui.checkbox(&mut checked, option).changed() {
                    select.toggle(option);
                    *changed = true;
                }
            }
        });
    ui.separator();
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar with the load status.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                pick_data_file(state);
                ui.close_menu();
            }
            if ui.button("Reload").clicked() {
                state.reload_current();
                ui.close_menu();
            }
        });

        ui.separator();

        match &state.status {
            LoadStatus::Loaded { rows, columns } => {
                ui.label(format!("Loaded {rows} rows × {columns} columns"));
            }
            LoadStatus::Failed { message, .. } => {
                ui.label(RichText::new(message).color(Color32::RED));
            }
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

/// Ask for a data file and load it through the cache on confirmation.
pub fn pick_data_file(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open welfare survey data")
        .add_filter("Supported files", &["csv", "tsv", "json"])
        .add_filter("CSV", &["csv"])
        .add_filter("TSV", &["tsv"])
        .add_filter("JSON", &["json"])
        .pick_file();

    if let Some(path) = file {
        state.data_path = path.display().to_string();
        state.load_current();
    }
}
