//! Cartography engine: sitemap parsing, per-page class counting, and the census driver.

pub mod census;
pub mod class_counter;
pub mod sitemap;
