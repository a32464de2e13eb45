use crate::recipe::IngredientScalingInfo;

/// Scales an ingredient amount from `original` servings to `target` servings.
///
/// Non-scalable ingredients (a bay leaf, a cinnamon stick) keep their amount
/// whatever the serving count. No rounding happens here; that is left to
/// [`crate::amount_format::format_amount`].
///
/// `original` must be at least 1. A zero is a caller bug: debug builds panic,
/// release builds return the amount unscaled.
pub fn scale_amount(amount: Option<f64>, original: u32, target: u32, scalable: bool) -> Option<f64> {
    let amount = amount?;
    if !scalable {
        return Some(amount);
    }
    debug_assert!(original >= 1, "original servings must be at least 1");
    if original == 0 {
        return Some(amount);
    }
    Some(amount * f64::from(target) / f64::from(original))
}

/// The stored serving count of a recipe and the count the user currently wants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServingContext {
    original: u32,
    target: u32,
}

impl ServingContext {
    /// Starts unscaled. A stored serving count of 0 is treated as 1.
    pub fn new(original: u32) -> Self {
        let original = original.max(1);
        Self { original, target: original }
    }

    pub fn with_target(mut self, target: u32) -> Self {
        self.target = target.max(1);
        self
    }

    pub fn original(&self) -> u32 {
        self.original
    }

    pub fn target(&self) -> u32 {
        self.target
    }

    pub fn increment(&mut self) {
        self.target = self.target.saturating_add(1);
    }

    /// Never goes below one serving.
    pub fn decrement(&mut self) {
        self.target = self.target.saturating_sub(1).max(1);
    }

    pub fn reset(&mut self) {
        self.target = self.original;
    }

    pub fn is_scaled(&self) -> bool {
        self.target != self.original
    }

    pub fn factor(&self) -> f64 {
        f64::from(self.target) / f64::from(self.original)
    }

    pub fn scale(&self, info: &IngredientScalingInfo) -> Option<f64> {
        scale_amount(info.amount, self.original, self.target, info.scalable)
    }
}
