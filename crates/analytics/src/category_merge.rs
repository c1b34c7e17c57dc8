//! Order-preserving per-category accumulation.
//!
//! Folds `(category, amount)` pairs into one total per distinct category.
//! Output order is the order in which each category was first seen. A
//! category → position index keeps the merge linear in the input length.

use std::collections::HashMap;
use std::hash::Hash;

use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryTotal<K> {
    pub category: K,
    pub amount: Decimal,
}

/// Insertion-ordered running totals keyed by category.
#[derive(Debug, Clone)]
pub struct CategoryAccumulator<K> {
    totals: Vec<CategoryTotal<K>>,
    index: HashMap<K, usize>,
}

impl<K> Default for CategoryAccumulator<K> {
    fn default() -> Self {
        Self {
            totals: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<K> CategoryAccumulator<K>
where
    K: Clone + Eq + Hash,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `amount` to the category's running total; `None` on overflow.
    #[must_use]
    pub fn add(&mut self, category: K, amount: Decimal) -> Option<()> {
        match self.index.get(&category) {
            Some(&pos) => {
                let total = &mut self.totals[pos].amount;
                *total = total.checked_add(amount)?;
            }
            None => {
                self.index.insert(category.clone(), self.totals.len());
                self.totals.push(CategoryTotal { category, amount });
            }
        }
        Some(())
    }

    pub fn into_totals(self) -> Vec<CategoryTotal<K>> {
        self.totals
    }
}

/// Merge `(category, amount)` pairs; see module docs for ordering.
///
/// `None` if a category total overflows.
pub fn merge_category_totals<K, I>(pairs: I) -> Option<Vec<CategoryTotal<K>>>
where
    K: Clone + Eq + Hash,
    I: IntoIterator<Item = (K, Decimal)>,
{
    let mut acc = CategoryAccumulator::new();
    for (category, amount) in pairs {
        acc.add(category, amount)?;
    }
    Some(acc.into_totals())
}
