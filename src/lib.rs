pub mod app;
pub mod braille;
pub mod dashboard;
pub mod data;
pub mod map;
pub mod news;
pub mod stats;
pub mod ui;
