use std::collections::HashMap;

use anyhow::Result;

use crate::warehouse::{Warehouse, CATEGORIES};

/// Bulk operations on one category's selection flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulkOp {
    SelectAll,
    ClearAll,
    /// Flip every flag's current value. Applying it twice restores the
    /// original state.
    Invert,
}

/// Derived snapshot of the keywords currently eligible for sampling, per
/// category, in warehouse order. Categories with zero selected keywords
/// map to empty lists.
pub type ActivePool = HashMap<&'static str, Vec<String>>;

/// Per-category keyword inclusion flags.
///
/// This map is the canonical selection state. Anything displayed to the
/// user is recomputed from it via [`SelectionSet::project`]; there is no
/// separately mutable display copy to drift out of sync.
#[derive(Debug, Default, Clone)]
pub struct SelectionSet {
    flags: HashMap<&'static str, HashMap<String, bool>>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a flag for every keyword the warehouse currently holds,
    /// defaulting to included. Flags the user already changed this
    /// session are left alone, so calling this again is a no-op for them.
    pub fn init(&mut self, warehouse: &mut Warehouse) -> Result<()> {
        for spec in CATEGORIES {
            let words = warehouse.load(spec.name)?.to_vec();
            let entry = self.flags.entry(spec.name).or_default();
            for word in words {
                entry.entry(word).or_insert(true);
            }
        }
        tracing::debug!("Selection flags seeded");
        Ok(())
    }

    /// Set one keyword's flag directly.
    pub fn set(&mut self, category: &'static str, keyword: &str, included: bool) {
        tracing::trace!(category, keyword, included, "Setting selection flag");
        self.flags
            .entry(category)
            .or_default()
            .insert(keyword.to_string(), included);
    }

    pub fn is_included(&self, category: &str, keyword: &str) -> bool {
        self.flags
            .get(category)
            .and_then(|m| m.get(keyword))
            .copied()
            .unwrap_or(false)
    }

    /// Apply a bulk operation to a single category. Other categories are
    /// never touched.
    pub fn bulk(&mut self, category: &'static str, op: BulkOp) {
        tracing::debug!(category, ?op, "Applying bulk selection op");
        let entry = self.flags.entry(category).or_default();
        for flag in entry.values_mut() {
            *flag = match op {
                BulkOp::SelectAll => true,
                BulkOp::ClearAll => false,
                BulkOp::Invert => !*flag,
            };
        }
    }

    /// Project the active pool: per category, exactly the keywords whose
    /// flag is true, in the warehouse's insertion order. A category with
    /// nothing selected projects to an empty list, deliberately not to
    /// the full warehouse.
    ///
    /// Iterating the warehouse lists also prunes orphans: flags for
    /// removed keywords simply never surface again.
    pub fn project(&self, warehouse: &mut Warehouse) -> Result<ActivePool> {
        let mut pool = ActivePool::new();
        for spec in CATEGORIES {
            let words = warehouse.load(spec.name)?;
            let selected: Vec<String> = words
                .iter()
                .filter(|w| self.is_included(spec.name, w))
                .cloned()
                .collect();
            pool.insert(spec.name, selected);
        }
        Ok(pool)
    }

    /// Snapshot of one category's flags in warehouse order, for display.
    pub fn category_flags(
        &self,
        warehouse: &mut Warehouse,
        category: &str,
    ) -> Result<Vec<(String, bool)>> {
        let words = warehouse.load(category)?;
        Ok(words
            .iter()
            .map(|w| (w.clone(), self.is_included(category, w)))
            .collect())
    }
}
