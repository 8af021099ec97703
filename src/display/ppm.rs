// src/display/ppm.rs
//! Binary PPM (P6) encoding. Alpha is dropped.

use crate::surface::{Point, Surface};

/// Encodes `surface` as `P6\n<w> <h>\n255\n` followed by RGB triples in
/// row-major order. Pixels the surface cannot report come out black.
pub fn encode_ppm(surface: &dyn Surface) -> Vec<u8> {
    let size = surface.size();
    let header = format!("P6\n{} {}\n255\n", size.width, size.height);
    let mut out = Vec::with_capacity(header.len() + size.area() * 3);
    out.extend_from_slice(header.as_bytes());
    for y in 0..size.height as i32 {
        for x in 0..size.width as i32 {
            let rgb = surface
                .pixel(Point::new(x, y))
                .map(|c| c.to_rgb_bytes())
                .unwrap_or([0, 0, 0]);
            out.extend_from_slice(&rgb);
        }
    }
    out
}
