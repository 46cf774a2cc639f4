use eframe::egui;
use koweps_dash::app::KowepsDashApp;
use koweps_dash::state;

fn main() -> eframe::Result {
    env_logger::init();

    let mut viewport = egui::ViewportBuilder::default()
        .with_inner_size([1200.0, 800.0])
        .with_min_inner_size([600.0, 400.0]);
    if let Some(icon) = load_window_icon() {
        viewport = viewport.with_icon(icon);
    }
    let options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    eframe::run_native(
        "KOWEPS Dashboard – Korea Welfare Panel Study",
        options,
        Box::new(|cc| {
            // Install image loaders so egui can render the sidebar logo.
            egui_extras::install_image_loaders(&cc.egui_ctx);
            Ok(Box::new(KowepsDashApp::new()))
        }),
    )
}

/// Window icon from the same optional logo file the sidebar uses.
fn load_window_icon() -> Option<egui::IconData> {
    let path = state::find_logo_path()?;
    let image = image::open(path).ok()?.into_rgba8();
    let (width, height) = image.dimensions();
    Some(egui::IconData {
        rgba: image.into_raw(),
        width,
        height,
    })
}
