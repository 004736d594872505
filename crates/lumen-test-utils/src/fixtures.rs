//! Instrumented source collections.

use std::sync::atomic::{AtomicUsize, Ordering};

use lumen_core::SourceCollection;

/// Wraps a `Vec<T>` and counts every [`SourceCollection::object`] lookup.
///
/// Lets tests tell apart a projection that reads live from one that
/// serves from its own storage.
#[derive(Debug, Default)]
pub struct CountingCollection<T> {
    items: Vec<T>,
    lookups: AtomicUsize,
}

impl<T> CountingCollection<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self {
            items,
            lookups: AtomicUsize::new(0),
        }
    }

    /// Lookups since construction or the last [`reset`](Self::reset).
    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::Relaxed)
    }

    pub fn reset(&self) {
        self.lookups.store(0, Ordering::Relaxed);
    }

    /// Mutable access to the wrapped items, as the simulation would have.
    pub fn items_mut(&mut self) -> &mut [T] {
        &mut self.items
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }
}

impl<T> SourceCollection for CountingCollection<T> {
    type Object = T;

    fn len(&self) -> usize {
        self.items.len()
    }

    fn object(&self, index: usize) -> &T {
        self.lookups.fetch_add(1, Ordering::Relaxed);
        &self.items[index]
    }
}
