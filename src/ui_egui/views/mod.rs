pub mod day_grid;
mod palette;

pub use day_grid::{DayGridView, GridAction};
pub(crate) use palette::exam_legend;
