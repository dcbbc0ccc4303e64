//! Pango-based text measurement and drawing
//!
//! Cairo's toy font API (select_font_face, show_text, text_extents) keeps
//! internal font caches that grow unboundedly. Pango manages font resources
//! properly and integrates with fontconfig, so all clock text goes through here.

use cairo::Context;
use pango::{FontDescription, Weight as PangoWeight};
use pangocairo::functions::{create_layout, show_layout};
use std::cell::RefCell;
use std::collections::HashMap;

/// Text extents in Cairo conventions
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TextExtents {
    pub width: f64,
    pub height: f64,
    pub x_bearing: f64,
    /// Baseline to ink top, negative for ascending text
    pub y_bearing: f64,
}

#[derive(Hash, Eq, PartialEq, Clone, Debug)]
struct FontKey {
    family: String,
    bold: bool,
    size_pango: i32, // Size in Pango units (points * PANGO_SCALE)
}

/// Cache for FontDescription objects to avoid an allocation per frame
struct FontDescriptionCache {
    cache: HashMap<FontKey, FontDescription>,
    max_entries: usize,
}

impl FontDescriptionCache {
    fn new() -> Self {
        Self {
            cache: HashMap::new(),
            max_entries: 32,
        }
    }

    fn get_or_create(&mut self, family: &str, bold: bool, size: f64) -> FontDescription {
        let key = FontKey {
            family: family.to_string(),
            bold,
            size_pango: (size * pango::SCALE as f64) as i32,
        };

        if let Some(desc) = self.cache.get(&key) {
            return desc.clone();
        }

        // Font size tracks the widget size, so resizing fills the cache quickly
        if self.cache.len() >= self.max_entries {
            log::debug!("Font description cache full, clearing");
            self.cache.clear();
        }

        let mut desc = FontDescription::new();
        desc.set_family(family);
        desc.set_weight(if bold {
            PangoWeight::Bold
        } else {
            PangoWeight::Normal
        });
        desc.set_absolute_size(size * pango::SCALE as f64);

        self.cache.insert(key, desc.clone());
        desc
    }
}

thread_local! {
    static FONT_DESC_CACHE: RefCell<FontDescriptionCache> = RefCell::new(FontDescriptionCache::new());
}

/// Clear the thread-local font cache
pub fn clear_pango_caches() {
    FONT_DESC_CACHE.with(|cache| cache.borrow_mut().cache.clear());
    log::debug!("Pango caches cleared");
}

/// Get a cached FontDescription. `size` is in device pixels.
pub fn font_description(family: &str, bold: bool, size: f64) -> FontDescription {
    FONT_DESC_CACHE.with(|cache| cache.borrow_mut().get_or_create(family, bold, size))
}

/// Measure text (replaces cr.text_extents)
pub fn text_extents(cr: &Context, text: &str, font_desc: &FontDescription) -> TextExtents {
    let layout = create_layout(cr);
    layout.set_font_description(Some(font_desc));
    layout.set_text(text);

    let (ink_rect, _logical_rect) = layout.extents();
    let baseline = layout.baseline();
    let scale = pango::SCALE as f64;

    // Pango measures from the logical top, Cairo from the baseline
    TextExtents {
        width: ink_rect.width() as f64 / scale,
        height: ink_rect.height() as f64 / scale,
        x_bearing: ink_rect.x() as f64 / scale,
        y_bearing: (ink_rect.y() - baseline) as f64 / scale,
    }
}

/// Draw text with its baseline at (x, y) (replaces cr.move_to + cr.show_text)
pub fn show_text_at(cr: &Context, x: f64, y: f64, text: &str, font_desc: &FontDescription) {
    let layout = create_layout(cr);
    layout.set_font_description(Some(font_desc));
    layout.set_text(text);

    let baseline = layout.baseline() as f64 / pango::SCALE as f64;
    cr.move_to(x, y - baseline);
    show_layout(cr, &layout);
}
