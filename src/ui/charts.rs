use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};
use egui_plot::{Bar, BarChart, GridMark, Line, Plot, PlotPoints};

use crate::color::CategoryColors;
use crate::data::summary::GroupMean;
use crate::state::{AppState, LoadStatus, TOP_JOBS_LIMIT};

/// Where to get the survey extract when it is missing locally.
const DOWNLOAD_URL: &str =
    "https://raw.githubusercontent.com/dswoorisam/data/master/welfare_2015.csv";

/// How many ages the value table next to the age chart previews.
const AGE_TABLE_PREVIEW: usize = 10;

// ---------------------------------------------------------------------------
// Central panel – the three summary sections
// ---------------------------------------------------------------------------

/// Render the central panel: charts when a table is loaded, otherwise the
/// error screen for the last failed load.
pub fn central_panel(ui: &mut Ui, state: &AppState) {
    if let LoadStatus::Failed { message, not_found } = &state.status {
        error_screen(ui, message, *not_found);
        return;
    }

    let Some(table) = &state.table else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("No dataset loaded  (File → Open…)");
        });
        return;
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading("Korea Welfare Panel Study, 2015");
            ui.add_space(8.0);

            // ---- Mean income by sex ----
            ui.strong("Mean monthly income by sex");
            if !(table.has_column("sex") && table.has_column("income")) {
                ui.weak("Sex or income data unavailable in this dataset.");
            } else if state.summaries.by_sex.is_empty() {
                ui.weak("No rows match the current filters.");
            } else {
                sex_section(ui, state);
            }
            ui.add_space(12.0);
            ui.separator();

            // ---- Mean income by age ----
            ui.strong("Mean monthly income by age");
            if !(table.has_column("age") && table.has_column("income")) {
                ui.weak("Age or income data unavailable in this dataset.");
            } else if state.summaries.by_age.is_empty() {
                ui.weak("No rows match the current filters.");
            } else {
                age_section(ui, state);
            }
            ui.add_space(12.0);
            ui.separator();

            // ---- Top jobs by mean income ----
            ui.strong(format!("Top {TOP_JOBS_LIMIT} jobs by mean monthly income"));
            if !(table.has_column("job") && table.has_column("income")) {
                ui.weak("Job data unavailable in this dataset.");
            } else if state.summaries.top_jobs.is_empty() {
                ui.weak("No rows match the current filters.");
            } else {
                jobs_section(ui, state);
            }
            ui.add_space(12.0);
            ui.separator();

            tips_section(ui);
        });
}

fn sex_section(ui: &mut Ui, state: &AppState) {
    let means = &state.summaries.by_sex;
    let labels: Vec<String> = means.iter().map(|g| g.label.clone()).collect();
    let colors = CategoryColors::new(labels.clone());

    ui.columns(2, |cols: &mut [Ui]| {
        let bars: Vec<Bar> = means
            .iter()
            .enumerate()
            .map(|(i, g)| {
                Bar::new(i as f64, g.mean_income)
                    .name(&g.label)
                    .fill(colors.color_for(&g.label))
                    .width(0.6)
            })
            .collect();

        Plot::new("sex_income_plot")
            .height(240.0)
            .x_axis_label("Sex")
            .y_axis_label("Mean income")
            .x_axis_formatter(move |mark, _range| category_tick(&labels, mark))
            .allow_boxed_zoom(false)
            .allow_drag(false)
            .allow_scroll(false)
            .allow_zoom(false)
            .show(&mut cols[0], |plot_ui| {
                plot_ui.bar_chart(BarChart::new(bars));
            });

        summary_table(&mut cols[1], "sex_income_table", "Sex", &mean_rows(means));
    });
}

fn age_section(ui: &mut Ui, state: &AppState) {
    let means = &state.summaries.by_age;

    ui.columns(2, |cols: &mut [Ui]| {
        let points: PlotPoints = means
            .iter()
            .map(|a| [a.age as f64, a.mean_income])
            .collect();

        Plot::new("age_income_plot")
            .height(240.0)
            .x_axis_label("Age")
            .y_axis_label("Mean income")
            .show(&mut cols[0], |plot_ui| {
                plot_ui.line(
                    Line::new(points)
                        .name("mean income")
                        .color(Color32::LIGHT_BLUE)
                        .width(1.5),
                );
            });

        let preview: Vec<(String, String)> = means
            .iter()
            .take(AGE_TABLE_PREVIEW)
            .map(|a| (a.age.to_string(), format!("{:.1}", a.mean_income)))
            .collect();
        summary_table(&mut cols[1], "age_income_table", "Age", &preview);
        if means.len() > AGE_TABLE_PREVIEW {
            cols[1].weak(format!(
                "showing first {AGE_TABLE_PREVIEW} of {} ages",
                means.len()
            ));
        }
    });
}

fn jobs_section(ui: &mut Ui, state: &AppState) {
    let top = &state.summaries.top_jobs;
    let n = top.len();
    let colors = CategoryColors::new(top.iter().map(|g| g.label.clone()));

    // Highest mean at the top, so bar i sits at argument n-1-i.
    let axis_labels: Vec<String> = top.iter().rev().map(|g| g.label.clone()).collect();

    ui.columns(2, |cols: &mut [Ui]| {
        let bars: Vec<Bar> = top
            .iter()
            .enumerate()
            .map(|(i, g)| {
                Bar::new((n - 1 - i) as f64, g.mean_income)
                    .name(&g.label)
                    .fill(colors.color_for(&g.label))
                    .width(0.6)
            })
            .collect();

        Plot::new("job_income_plot")
            .height((n as f32 * 28.0).max(160.0))
            .x_axis_label("Mean income")
            .y_axis_formatter(move |mark, _range| category_tick(&axis_labels, mark))
            .allow_boxed_zoom(false)
            .allow_drag(false)
            .allow_scroll(false)
            .allow_zoom(false)
            .show(&mut cols[0], |plot_ui| {
                plot_ui.bar_chart(BarChart::new(bars).horizontal());
            });

        summary_table(&mut cols[1], "job_income_table", "Job", &mean_rows(top));
    });
}

// ---------------------------------------------------------------------------
// Shared pieces
// ---------------------------------------------------------------------------

/// Category label for an integer grid position, empty for the in-between
/// marks a continuous axis also generates.
fn category_tick(labels: &[String], mark: GridMark) -> String {
    let nearest = mark.value.round();
    if (mark.value - nearest).abs() > 0.05 {
        return String::new();
    }
    let idx = nearest as i64;
    if idx < 0 || idx as usize >= labels.len() {
        return String::new();
    }
    labels[idx as usize].clone()
}

fn mean_rows(means: &[GroupMean]) -> Vec<(String, String)> {
    means
        .iter()
        .map(|g| (g.label.clone(), format!("{:.1}", g.mean_income)))
        .collect()
}

/// Two-column value table next to each chart.
fn summary_table(ui: &mut Ui, id: &str, key_header: &str, rows: &[(String, String)]) {
    ui.push_id(id, |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .column(Column::remainder())
            .column(Column::auto())
            .header(18.0, |mut header| {
                header.col(|ui: &mut Ui| {
                    ui.strong(key_header);
                });
                header.col(|ui: &mut Ui| {
                    ui.strong("Mean income");
                });
            })
            .body(|mut body| {
                for (key, value) in rows {
                    body.row(16.0, |mut row| {
                        row.col(|ui: &mut Ui| {
                            ui.label(key);
                        });
                        row.col(|ui: &mut Ui| {
                            ui.label(value);
                        });
                    });
                }
            });
    });
}

fn tips_section(ui: &mut Ui) {
    egui::CollapsingHeader::new(RichText::new("Analysis tips").strong())
        .id_salt("analysis_tips")
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            ui.label("• Use the age group filter to compare young, middle and old cohorts.");
            ui.label("• The region_code column supports regional breakdowns of the same summaries.");
            ui.label("• Narrow the job filter to a handful of occupations to compare them directly.");
        });
}

fn error_screen(ui: &mut Ui, message: &str, not_found: bool) {
    ui.vertical_centered(|ui: &mut Ui| {
        ui.add_space(40.0);
        if not_found {
            ui.heading("Missing the dataset?");
            ui.add_space(8.0);
            ui.label(RichText::new(message).color(Color32::RED));
            ui.add_space(8.0);
            ui.label("Download the 2015 survey extract and place it at data/welfare_2015.csv:");
            ui.hyperlink(DOWNLOAD_URL);
        } else {
            ui.heading("Could not load the dataset");
            ui.add_space(8.0);
            ui.label(RichText::new(message).color(Color32::RED));
            ui.add_space(8.0);
            ui.label("Fix the file or pick another one  (File → Open…).");
        }
    });
}
