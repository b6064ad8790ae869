//! eatery-dash: a restaurant operations survey dashboard.
//!
//! The [`data`] module is a self-contained tabular summarization library
//! (loading, category explosion, frequency counts, five-number summaries,
//! Pearson correlation, view routing).  The remaining modules are the egui
//! shell that renders its payloads.

pub mod app;
pub mod color;
pub mod data;
pub mod state;
pub mod ui;
