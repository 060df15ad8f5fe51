mod app;
pub mod surface;
mod views;

pub use app::RoadmapApp;
pub use surface::EguiScrollSurface;
