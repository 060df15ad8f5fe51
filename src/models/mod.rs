// Module exports for models

pub mod schedule_block;
pub mod settings;
