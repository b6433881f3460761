//! A metric family: a collection of metrics sharing one name but distinguished by label
//! combination.
//!
//! Each label combination a family is observed with interns its own cell on first use; cells
//! live as long as the family itself. See [`Family`].

use std::sync::Arc;

use parking_lot::RwLock;

use crate::{
    error::Result,
    raw::{
        labels::{reject_reserved_names, Labels},
        MetricType, TypedMetric,
    },
    snapshot::{Cell, DataRecord, Metric},
};

type Factory<C> = Arc<dyn Fn() -> C + Send + Sync>;

cfg_if::cfg_if! {
    if #[cfg(feature = "foldhash")] {
        type LabelIndex = std::collections::HashMap<Labels, usize, foldhash::fast::RandomState>;
    } else {
        type LabelIndex = std::collections::HashMap<Labels, usize>;
    }
}

struct Inner<C> {
    // Insertion-ordered storage: `index` maps a label combination to its position in `cells`,
    // which collection walks in registration order so writers never need to sort.
    cells: Vec<(Labels, C)>,
    index: LabelIndex,
}

/// A collection of metric cells of the same kind, keyed by label combination.
///
/// Label combinations are interned lazily: the first call for a given [`Labels`] value creates a
/// cell via the family's factory; subsequent calls reuse it. Collection walks cells in the order
/// they were first interned.
///
/// # Example
///
/// ```rust
/// # use expomet::{metrics::{counter::Counter, family::Family}, raw::labels::Labels};
/// let family = Family::<Counter>::default();
/// let labels = Labels::from_pairs([("method", "GET")]).unwrap();
/// family.with_or_new(&labels, |c| c.inc()).unwrap().unwrap();
/// assert_eq!(family.with(&labels, |c| c.total()), Some(1.0));
/// ```
pub struct Family<C> {
    inner: Arc<RwLock<Inner<C>>>,
    factory: Factory<C>,
}

impl<C> Clone for Family<C> {
    fn clone(&self) -> Self {
        Self { inner: self.inner.clone(), factory: self.factory.clone() }
    }
}

impl<C: Default + 'static> Default for Family<C> {
    fn default() -> Self {
        Self::new(C::default)
    }
}

impl<C> Family<C> {
    /// Creates a family that builds new cells with the given factory.
    pub fn new(factory: impl Fn() -> C + Send + Sync + 'static) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Inner { cells: Vec::new(), index: LabelIndex::default() })),
            factory: Arc::new(factory),
        }
    }

    /// Applies `func` to the cell for `labels`, if one has been interned yet.
    pub fn with<R>(&self, labels: &Labels, func: impl FnOnce(&C) -> R) -> Option<R> {
        let guard = self.inner.read();
        let idx = *guard.index.get(labels)?;
        Some(func(&guard.cells[idx].1))
    }

    /// Returns the number of distinct label combinations currently interned.
    pub fn len(&self) -> usize {
        self.inner.read().cells.len()
    }

    /// Returns `true` if no label combination has been interned yet.
    pub fn is_empty(&self) -> bool {
        self.inner.read().cells.is_empty()
    }
}

impl<C> Family<C> {
    /// Applies `func` to the cell for `labels`, interning a new cell via the factory first if
    /// none exists yet.
    ///
    /// Re-validates `labels` against the crate's reserved label names (`le`, `quantile`,
    /// `state`) the first time a given label combination is seen; an already-interned
    /// combination skips the check. Returns [`Error::invalid_label`](crate::error::Error) if the
    /// combination is new and declares a reserved name.
    pub fn with_or_new<R>(&self, labels: &Labels, func: impl FnOnce(&C) -> R) -> Result<R> {
        {
            let guard = self.inner.read();
            if let Some(&idx) = guard.index.get(labels) {
                return Ok(func(&guard.cells[idx].1));
            }
        }
        reject_reserved_names(labels, crate::validate::RESERVED_LABEL_NAMES)?;
        let mut guard = self.inner.write();
        // Another writer may have interned this combination while we waited for the lock.
        let idx = match guard.index.get(labels) {
            Some(&idx) => idx,
            None => {
                let idx = guard.cells.len();
                let cell = (self.factory)();
                guard.cells.push((labels.clone(), cell));
                guard.index.insert(labels.clone(), idx);
                idx
            },
        };
        Ok(func(&guard.cells[idx].1))
    }
}

impl<C: TypedMetric> TypedMetric for Family<C> {
    const TYPE: MetricType = <C as TypedMetric>::TYPE;
}

impl<C: Cell + TypedMetric> Metric for Family<C> {
    fn metric_type(&self) -> MetricType {
        <C as TypedMetric>::TYPE
    }

    fn collect(&self) -> Vec<DataRecord> {
        let guard = self.inner.read();
        guard.cells.iter().map(|(labels, cell)| DataRecord::new(labels.clone(), cell.collect_data())).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::counter::Counter;

    #[test]
    fn test_lazily_interns_cells() {
        let family = Family::<Counter>::default();
        let labels = Labels::from_pairs([("method", "GET")]).unwrap();
        assert_eq!(family.with(&labels, |c| c.total()), None);
        family.with_or_new(&labels, |c| c.inc().unwrap()).unwrap();
        assert_eq!(family.with(&labels, |c| c.total()), Some(1.0));
        assert_eq!(family.len(), 1);
    }

    #[test]
    fn test_collect_preserves_insertion_order() {
        let family = Family::<Counter>::default();
        let a = Labels::from_pairs([("method", "GET")]).unwrap();
        let b = Labels::from_pairs([("method", "POST")]).unwrap();
        family.with_or_new(&b, |c| c.inc().unwrap()).unwrap();
        family.with_or_new(&a, |c| c.inc().unwrap()).unwrap();

        let records = Metric::collect(&family);
        assert_eq!(records[0].labels, b);
        assert_eq!(records[1].labels, a);
    }

    #[test]
    fn test_reuses_existing_cell() {
        let family = Family::<Counter>::default();
        let labels = Labels::from_pairs([("a", "1")]).unwrap();
        family.with_or_new(&labels, |c| c.inc().unwrap()).unwrap();
        family.with_or_new(&labels, |c| c.inc().unwrap()).unwrap();
        assert_eq!(family.len(), 1);
        assert_eq!(family.with(&labels, |c| c.total()), Some(2.0));
    }

    #[test]
    fn test_rejects_reserved_label_on_new_combination() {
        use crate::metrics::histogram::Histogram;

        let family = Family::<Histogram>::default();
        let labels = Labels::from_pairs([("le", "1")]).unwrap();
        assert!(family.with_or_new(&labels, |h| h.observe(1.0)).is_err());
        assert_eq!(family.len(), 0);
    }
}
