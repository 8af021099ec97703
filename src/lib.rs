//! Painter library crate.
//!
//! A single worker thread applies drawing operations to one surface and hands
//! it to a receiver whenever an operation marks it presentable. Operations
//! come from direct posts or from scripts turned into batches by `lang`.

pub mod color;
pub mod config;
pub mod display;
pub mod event_loop;
pub mod lang;
pub mod ops;
pub mod state;
pub mod surface;
