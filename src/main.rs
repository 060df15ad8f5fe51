// Roadmap Calendar
// Main entry point

use roadmap_calendar::ui_egui::RoadmapApp;

fn main() -> eframe::Result {
    env_logger::init();

    log::info!("Starting Roadmap Calendar");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Roadmap Calendar")
            .with_inner_size([900.0, 760.0])
            .with_min_inner_size([360.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Roadmap Calendar",
        options,
        Box::new(|cc| Ok(Box::new(RoadmapApp::new(cc)?))),
    )
}
