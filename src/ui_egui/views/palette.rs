use egui::{vec2, Color32, RichText, Sense};

use crate::models::schedule_block::{BlockType, ScheduleBlock};
use crate::services::grid::ExamEntry;

pub(crate) fn with_alpha(color: Color32, alpha: u8) -> Color32 {
    Color32::from_rgba_unmultiplied(color.r(), color.g(), color.b(), alpha)
}

fn blend(a: Color32, b: Color32, t: f32) -> Color32 {
    let t = t.clamp(0.0, 1.0);
    let lerp = |c1: u8, c2: u8| -> u8 { ((c1 as f32 * (1.0 - t)) + (c2 as f32 * t)).round() as u8 };
    Color32::from_rgb(lerp(a.r(), b.r()), lerp(a.g(), b.g()), lerp(a.b(), b.b()))
}

/// Accent colours cycled per exam so blocks of one exam share a stripe.
const EXAM_ACCENTS: [Color32; 6] = [
    Color32::from_rgb(107, 71, 245),
    Color32::from_rgb(46, 196, 160),
    Color32::from_rgb(240, 180, 41),
    Color32::from_rgb(236, 92, 120),
    Color32::from_rgb(64, 156, 255),
    Color32::from_rgb(255, 128, 64),
];

pub(crate) fn exam_accent(index: usize) -> Color32 {
    EXAM_ACCENTS[index % EXAM_ACCENTS.len()]
}

/// Swatch and name for every exam, in colour-slot order.
pub(crate) fn exam_legend(ui: &mut egui::Ui, exams: &[ExamEntry]) {
    for (index, exam) in exams.iter().enumerate() {
        let (swatch, _) = ui.allocate_exact_size(vec2(10.0, 10.0), Sense::hover());
        ui.painter().rect_filled(swatch, 2.0, exam_accent(index));
        ui.label(RichText::new(exam.label()).small());
    }
}

#[derive(Clone, Copy)]
pub(crate) struct DayGridPalette {
    pub background: Color32,
    pub hour_line: Color32,
    pub half_hour_line: Color32,
    pub label: Color32,
    pub now_line: Color32,
    pub block_text: Color32,
    pub delayed_badge: Color32,
    pub delete_action: Color32,
    pub drag_outline: Color32,
    dark: bool,
}

impl DayGridPalette {
    pub fn for_visuals(visuals: &egui::Visuals) -> Self {
        let dark = visuals.dark_mode;
        if dark {
            Self {
                background: Color32::from_gray(30),
                hour_line: Color32::from_gray(60),
                half_hour_line: Color32::from_gray(42),
                label: Color32::from_gray(140),
                now_line: Color32::from_rgb(255, 100, 100),
                block_text: Color32::WHITE,
                delayed_badge: Color32::from_rgb(255, 200, 80),
                delete_action: Color32::from_rgb(180, 60, 60),
                drag_outline: Color32::from_rgb(120, 200, 120),
                dark,
            }
        } else {
            Self {
                background: Color32::from_rgb(248, 248, 250),
                hour_line: Color32::from_rgb(210, 210, 210),
                half_hour_line: Color32::from_rgb(232, 232, 232),
                label: Color32::GRAY,
                now_line: Color32::from_rgb(230, 70, 70),
                block_text: Color32::from_rgb(25, 25, 35),
                delayed_badge: Color32::from_rgb(170, 110, 0),
                delete_action: Color32::from_rgb(180, 60, 60),
                drag_outline: Color32::from_rgb(60, 160, 60),
                dark,
            }
        }
    }

    /// Fill for a block's body.
    pub fn block_fill(&self, block: &ScheduleBlock) -> Color32 {
        let base = match block.block_type {
            BlockType::Study => Color32::from_rgb(70, 90, 160),
            BlockType::Break => Color32::from_rgb(90, 110, 100),
            BlockType::Hobby => Color32::from_rgb(150, 90, 170),
            BlockType::Exam => Color32::from_rgb(190, 140, 40),
        };
        let fill = if self.dark {
            blend(base, Color32::from_gray(30), 0.35)
        } else {
            blend(base, Color32::WHITE, 0.7)
        };
        if block.completed {
            with_alpha(fill, 110)
        } else {
            fill
        }
    }

    /// Left stripe: the exam's colour when the block belongs to one.
    pub fn block_accent(&self, block: &ScheduleBlock, exam_index: Option<usize>) -> Color32 {
        match exam_index {
            Some(index) => exam_accent(index),
            None => self.block_fill(block).linear_multiply(0.7),
        }
    }
}
