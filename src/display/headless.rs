// src/display/headless.rs
//! Headless receiver: records presented frames instead of showing them.

use super::ppm::encode_ppm;
use crate::event_loop::Receiver;
use crate::surface::{PixelBuffer, Surface};
use anyhow::{Context, Result};
use log::{debug, info};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

#[derive(Debug, Default)]
pub struct HeadlessDisplay {
    latest: Mutex<Option<PixelBuffer>>,
    presented: AtomicUsize,
}

impl HeadlessDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the most recently presented frame, if any.
    pub fn latest_frame(&self) -> Option<PixelBuffer> {
        self.latest
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn frames_presented(&self) -> usize {
        self.presented.load(Ordering::SeqCst)
    }

    /// Writes the latest frame to `path` as PPM. Returns `false` when nothing
    /// has been presented yet.
    pub fn write_ppm(&self, path: impl AsRef<Path>) -> Result<bool> {
        let path = path.as_ref();
        let Some(frame) = self.latest_frame() else {
            return Ok(false);
        };
        std::fs::write(path, encode_ppm(&frame))
            .with_context(|| format!("Failed to write frame to {}", path.display()))?;
        info!(
            "HeadlessDisplay: Wrote {}x{} frame to {}",
            frame.size().width,
            frame.size().height,
            path.display()
        );
        Ok(true)
    }
}

impl Receiver for HeadlessDisplay {
    fn on_ready(&self, surface: &dyn Surface) {
        let frame = PixelBuffer::snapshot_of(surface);
        *self.latest.lock().unwrap_or_else(PoisonError::into_inner) = Some(frame);
        let n = self.presented.fetch_add(1, Ordering::SeqCst) + 1;
        debug!("HeadlessDisplay: Frame {} presented", n);
    }
}
