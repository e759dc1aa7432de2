//! The category filter.
//!
//! Filtering borrows from the dataset: a `WorkingSubset` is just the selected
//! records in their original order. An unknown category is not an error, it
//! selects nothing.

use crate::domain::{CategoryFilter, Dataset, Transaction};

/// Records selected by a filter, in dataset order.
#[derive(Debug, Clone)]
pub struct WorkingSubset<'a> {
    pub filter: CategoryFilter,
    pub records: Vec<&'a Transaction>,
}

impl<'a> WorkingSubset<'a> {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a Transaction> + '_ {
        self.records.iter().copied()
    }
}

/// Select the records matching `filter`.
pub fn apply_filter<'a>(dataset: &'a Dataset, filter: &CategoryFilter) -> WorkingSubset<'a> {
    let records = dataset
        .records
        .iter()
        .filter(|r| filter.matches(&r.category))
        .collect();

    WorkingSubset {
        filter: filter.clone(),
        records,
    }
}

/// The selector values offered to a user: `All` followed by each observed category.
pub fn filter_choices(dataset: &Dataset) -> Vec<CategoryFilter> {
    std::iter::once(CategoryFilter::All)
        .chain(dataset.categories().into_iter().map(CategoryFilter::Category))
        .collect()
}
