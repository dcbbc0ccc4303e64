//! LED clock rendering
//!
//! Draws a recessed display: background fill, a dark double border, and the
//! time text centred over a faint glow halo.

use anyhow::{Context as _, Result};
use cairo::{Context, Format, ImageSurface};
use led_clock_core::ClockFrame;
use led_clock_types::Color;
use std::fs::File;
use std::path::Path;

use crate::pango_text::{font_description, show_text_at, text_extents};

/// Smallest font size used for the time text
pub const MIN_FONT_SIZE: f64 = 12.0;

/// Opacity of the glow copies (50 of 255)
pub const GLOW_ALPHA: f64 = 50.0 / 255.0;

const OUTER_BORDER_COLOR: Color = Color::new(60, 60, 60);
const INNER_BORDER_COLOR: Color = Color::new(40, 40, 40);

/// Font size that fits `text_len` characters into the surface
pub fn font_size(text_len: usize, width: f64, height: f64) -> f64 {
    let by_height = height * 0.5;
    let size = if text_len == 0 {
        by_height
    } else {
        by_height.min(width / (text_len as f64 * 0.7))
    };
    size.max(MIN_FONT_SIZE)
}

/// Offsets of the glow copies drawn under the main text
pub fn glow_offsets() -> impl Iterator<Item = (f64, f64)> {
    (1..=2).flat_map(|i| {
        let d = i as f64;
        [(-d, 0.0), (d, 0.0), (0.0, -d), (0.0, d)]
    })
}

/// Render one clock frame into a `width` x `height` area
pub fn render_led_clock(
    cr: &Context,
    frame: &ClockFrame,
    width: f64,
    height: f64,
) -> Result<(), cairo::Error> {
    cr.save()?;

    // Background
    frame.background_color.apply_to_cairo(cr, 1.0);
    cr.rectangle(0.0, 0.0, width, height);
    cr.fill()?;

    // Outer border
    OUTER_BORDER_COLOR.apply_to_cairo(cr, 1.0);
    cr.set_line_width(3.0);
    cr.rectangle(1.0, 1.0, width - 3.0, height - 3.0);
    cr.stroke()?;

    // Inner border for depth
    INNER_BORDER_COLOR.apply_to_cairo(cr, 1.0);
    cr.set_line_width(1.0);
    cr.rectangle(4.0, 4.0, width - 9.0, height - 9.0);
    cr.stroke()?;

    if !frame.text.is_empty() {
        draw_time_text(cr, frame, width, height)?;
    }

    cr.restore()?;
    Ok(())
}

fn draw_time_text(
    cr: &Context,
    frame: &ClockFrame,
    width: f64,
    height: f64,
) -> Result<(), cairo::Error> {
    let size = font_size(frame.text.chars().count(), width, height);
    let font = font_description(&frame.font_family, true, size);
    let te = text_extents(cr, &frame.text, &font);

    let x = (width - te.width) / 2.0 - te.x_bearing;
    let y = (height - te.height) / 2.0 - te.y_bearing;

    frame.led_color.apply_to_cairo(cr, GLOW_ALPHA);
    for (dx, dy) in glow_offsets() {
        show_text_at(cr, x + dx, y + dy, &frame.text, &font);
    }

    frame.led_color.apply_to_cairo(cr, 1.0);
    show_text_at(cr, x, y, &frame.text, &font);

    cr.status()
}

/// Render a frame headlessly and write it as a PNG file
pub fn render_to_png(frame: &ClockFrame, width: i32, height: i32, path: &Path) -> Result<()> {
    let surface = ImageSurface::create(Format::ARgb32, width, height)
        .context("Failed to create image surface")?;
    {
        let cr = Context::new(&surface).context("Failed to create Cairo context")?;
        render_led_clock(&cr, frame, width as f64, height as f64)
            .context("Failed to render clock frame")?;
    }
    surface.flush();

    let mut file = File::create(path)
        .with_context(|| format!("Failed to create snapshot file {}", path.display()))?;
    surface
        .write_to_png(&mut file)
        .with_context(|| format!("Failed to write PNG to {}", path.display()))?;
    log::info!("Wrote {}x{} snapshot to {}", width, height, path.display());
    Ok(())
}
