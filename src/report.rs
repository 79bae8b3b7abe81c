//! Plain-text rendering of a recommendation

use std::io::{self, Write};

use crate::models::{Category, ProductRecord, WardrobeRecommendation};

pub fn write_request<W: Write>(out: &mut W, prompt: &str) -> io::Result<()> {
    writeln!(out, "=== WARDROBE REQUEST ===")?;
    writeln!(out, "Prompt: {}", prompt)
}

fn write_item<W: Write>(out: &mut W, item: &ProductRecord) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "* {}", item.name)?;
    writeln!(out, "  Price: {}", item.price)?;
    if let Some(description) = item.description.as_deref().filter(|d| !d.is_empty()) {
        writeln!(out, "  Description: {}", description)?;
    }
    writeln!(out, "  Product URL: {}", item.product_url)?;
    writeln!(out, "  Image URL: {}", item.image_url)
}

pub fn write_recommendation<W: Write>(out: &mut W, rec: &WardrobeRecommendation) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "=== WARDROBE RECOMMENDATION ===")?;
    writeln!(out, "Theme: {}", rec.theme)?;
    writeln!(out, "Styling Tips: {}", rec.styling_tips)?;

    for category in Category::ALL {
        writeln!(out)?;
        writeln!(out, "=== {} ===", category.key().to_uppercase())?;
        let items = rec.items(category);
        if items.is_empty() {
            writeln!(out, "No items found")?;
        }
        for item in items {
            write_item(out, item)?;
        }
    }
    Ok(())
}
