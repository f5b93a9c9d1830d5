//! Recipe aggregation - turns a cart of sold dishes into per-ingredient deductions.
//!
//! Everything here is pure: no I/O, no database. The resulting [`DeductionMap`] is
//! handed to [`crate::core::stock`] which applies it inside one transaction.

use crate::errors::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One ingredient requirement of a dish, per serving.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RecipeEntry {
    /// Inventory item consumed
    pub ingredient_id: i64,
    /// Amount consumed per serving, in the ingredient's stock unit
    pub quantity: f64,
}

impl RecipeEntry {
    /// Creates a recipe entry.
    #[must_use]
    pub const fn new(ingredient_id: i64, quantity: f64) -> Self {
        Self {
            ingredient_id,
            quantity,
        }
    }
}

/// A sellable dish as seen at checkout. The recipe may be empty.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Dish {
    /// Dish ID
    pub id: i64,
    /// Menu name
    pub name: String,
    /// Price per serving
    pub price: f64,
    /// Ingredients consumed per serving
    #[serde(default)]
    pub recipe: Vec<RecipeEntry>,
}

/// One entry of a checkout: a dish and how many servings were sold.
#[derive(Clone, Debug, PartialEq)]
pub struct CartLine {
    dish: Dish,
    quantity: u32,
}

impl CartLine {
    /// Creates a cart line, rejecting a quantity of zero.
    pub fn new(dish: Dish, quantity: u32) -> Result<Self> {
        if quantity == 0 {
            return Err(Error::InvalidQuantity { quantity });
        }
        Ok(Self { dish, quantity })
    }

    /// The dish sold.
    #[must_use]
    pub const fn dish(&self) -> &Dish {
        &self.dish
    }

    /// Servings sold, always at least one.
    #[must_use]
    pub const fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Price snapshot times quantity.
    #[must_use]
    pub fn subtotal(&self) -> f64 {
        self.dish.price * f64::from(self.quantity)
    }
}

/// Total quantity to subtract per ingredient for one sale.
///
/// Keys are unique; iteration is in ascending ingredient ID order.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct DeductionMap {
    totals: BTreeMap<i64, f64>,
}

impl DeductionMap {
    /// An empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `quantity` to the running total for `ingredient_id`.
    pub fn add(&mut self, ingredient_id: i64, quantity: f64) {
        *self.totals.entry(ingredient_id).or_insert(0.0) += quantity;
    }

    /// Folds every total of `other` into this map.
    pub fn merge(&mut self, other: &Self) {
        for (&ingredient_id, &quantity) in &other.totals {
            self.add(ingredient_id, quantity);
        }
    }

    /// Total for one ingredient, `None` if the sale does not touch it.
    #[must_use]
    pub fn get(&self, ingredient_id: i64) -> Option<f64> {
        self.totals.get(&ingredient_id).copied()
    }

    /// Number of distinct ingredients.
    #[must_use]
    pub fn len(&self) -> usize {
        self.totals.len()
    }

    /// True when the sale touches no tracked ingredient.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }

    /// Distinct ingredient IDs, ascending.
    #[must_use]
    pub fn ingredient_ids(&self) -> Vec<i64> {
        self.totals.keys().copied().collect()
    }

    /// `(ingredient_id, total)` pairs, ascending by ID.
    pub fn iter(&self) -> impl Iterator<Item = (i64, f64)> + '_ {
        self.totals.iter().map(|(&id, &quantity)| (id, quantity))
    }
}

impl FromIterator<(i64, f64)> for DeductionMap {
    fn from_iter<I: IntoIterator<Item = (i64, f64)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (ingredient_id, quantity) in iter {
            map.add(ingredient_id, quantity);
        }
        map
    }
}

/// Computes the deduction for every ingredient touched by `lines`.
///
/// Each recipe entry contributes `entry.quantity * line.quantity`. Dishes without a
/// recipe contribute nothing; an empty cart yields an empty map.
#[must_use]
pub fn aggregate(lines: &[CartLine]) -> DeductionMap {
    lines
        .iter()
        .flat_map(|line| {
            let servings = f64::from(line.quantity);
            line.dish
                .recipe
                .iter()
                .map(move |entry| (entry.ingredient_id, entry.quantity * servings))
        })
        .collect()
}
