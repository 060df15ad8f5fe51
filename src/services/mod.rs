// Service module exports
// Headless core of the day grid: geometry, layout, gestures and persistence

pub mod collision;
pub mod database;
pub mod gesture;
pub mod grid;
pub mod mapper;
pub mod schedule;
pub mod settings;
pub mod timers;
pub mod view_state;
