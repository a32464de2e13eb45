use serde::Serialize;

use crate::recipe::IngredientScalingInfo;
use crate::scaling::ServingContext;

const QUARTER_TOLERANCE: f64 = 0.01;
const THIRD_TOLERANCE: f64 = 0.1;

/// Fraction glyphs checked in order against the fractional remainder.
const FRACTION_GLYPHS: &[(f64, f64, &str)] = &[
    (0.25, QUARTER_TOLERANCE, "¼"),
    (0.5, QUARTER_TOLERANCE, "½"),
    (0.75, QUARTER_TOLERANCE, "¾"),
    (1.0 / 3.0, THIRD_TOLERANCE, "⅓"),
    (2.0 / 3.0, THIRD_TOLERANCE, "⅔"),
];

/// Renders an amount the way a home cook reads it: snapped to the nearest
/// quarter, whole numbers without a decimal point, remainders as fraction
/// glyphs ("1 ½", "¾").
///
/// A missing amount renders as an empty string.
pub fn format_amount(amount: Option<f64>) -> String {
    let Some(amount) = amount else {
        return String::new();
    };

    let rounded = (amount * 4.0).round() / 4.0;
    if rounded == rounded.floor() {
        return rounded.to_string();
    }

    let whole = rounded.floor();
    let fraction = rounded - whole;

    let glyph = FRACTION_GLYPHS
        .iter()
        .find(|(target, tolerance, _)| (fraction - target).abs() < *tolerance)
        .map(|(_, _, glyph)| *glyph);

    // Only reachable through float artifacts once the value is quarter-snapped.
    let Some(glyph) = glyph else {
        return format!("{:.1}", rounded);
    };

    if whole > 0.0 {
        format!("{} {}", whole, glyph)
    } else {
        glyph.to_string()
    }
}

/// One ingredient as it should be shown for a given serving context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IngredientLine {
    pub text: String,
    /// The context is scaled but this ingredient kept its original amount.
    pub unscaled_note: bool,
}

impl std::fmt::Display for IngredientLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.unscaled_note {
            write!(f, "{} (unscaled from original)", self.text)
        } else {
            f.write_str(&self.text)
        }
    }
}

/// Builds the display line for an ingredient: the formatted (possibly scaled)
/// amount followed by unit and item, or the raw text when no amount was parsed.
pub fn render_ingredient_line(info: &IngredientScalingInfo, ctx: &ServingContext) -> IngredientLine {
    if info.amount.is_none() {
        return IngredientLine {
            text: info.raw_text.clone(),
            unscaled_note: false,
        };
    }

    let amount = if ctx.is_scaled() { ctx.scale(info) } else { info.amount };

    let mut text = format_amount(amount);
    for part in [&info.unit, &info.item].into_iter().flatten() {
        if !part.is_empty() {
            text.push(' ');
            text.push_str(part);
        }
    }

    IngredientLine {
        text,
        unscaled_note: ctx.is_scaled() && !info.scalable,
    }
}
