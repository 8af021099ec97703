// src/display/mod.rs
//! Receivers that consume presentable surfaces.
//!
//! - `HeadlessDisplay`: keeps the latest presented frame in memory
//! - `ppm`: binary PPM (P6) encoding for dumping frames to disk

pub mod headless;
pub mod ppm;

pub use headless::HeadlessDisplay;
pub use ppm::encode_ppm;
