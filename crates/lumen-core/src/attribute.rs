//! Attribute descriptors and the [`AttributeSet`] bitset.

use crate::id::AttributeId;

/// Classification of an attribute's shape.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AttributeType {
    /// A single value per object (diameter, age).
    Scalar,
    /// A fixed-width vector per object (position, tractor force).
    Vector {
        /// Number of components (e.g. 3 for a position).
        dims: u32,
    },
    /// A discrete state per object stored as a single index.
    Categorical {
        /// Number of possible categories.
        n_values: u32,
    },
}

impl AttributeType {
    /// Number of scalar components each object contributes.
    pub fn components(&self) -> u32 {
        match self {
            Self::Scalar => 1,
            Self::Vector { dims } => *dims,
            Self::Categorical { .. } => 1,
        }
    }
}

/// Description of an attribute exposed by a simulation object type.
///
/// Carries only what the visualization side needs to label and size a
/// column; how the value is reached lives in an
/// [`AttributeAccessor`](crate::AttributeAccessor).
#[derive(Clone, Debug, PartialEq)]
pub struct AttributeDef {
    /// Display name used for column labels and metadata.
    pub name: String,
    /// Shape of the attribute.
    pub attribute_type: AttributeType,
    /// Optional unit annotation (e.g. `"um"`).
    pub units: Option<String>,
}

impl AttributeDef {
    /// A scalar attribute without units.
    pub fn scalar(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attribute_type: AttributeType::Scalar,
            units: None,
        }
    }

    /// A vector attribute with `dims` components and no units.
    pub fn vector(name: impl Into<String>, dims: u32) -> Self {
        Self {
            name: name.into(),
            attribute_type: AttributeType::Vector { dims },
            units: None,
        }
    }

    /// Attach a unit annotation.
    pub fn with_units(mut self, units: impl Into<String>) -> Self {
        self.units = Some(units.into());
        self
    }
}

/// Attribute IDs chosen for export, packed one bit per ID.
///
/// A grid's registered columns are always the dense range `0..n`
/// ([`AttributeSet::first`]); a selection is checked against that range
/// with [`AttributeSet::difference`] before it is applied.
#[derive(Clone, Debug, Default)]
pub struct AttributeSet {
    words: Vec<u64>,
}

#[inline]
fn locate(attribute: AttributeId) -> (usize, u64) {
    let i = attribute.0 as usize;
    (i / 64, 1u64 << (i % 64))
}

impl AttributeSet {
    /// No attributes.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The IDs `0..count`, i.e. every column of a grid with `count` columns.
    pub fn first(count: usize) -> Self {
        let mut words = vec![u64::MAX; count / 64];
        if count % 64 != 0 {
            words.push((1u64 << (count % 64)) - 1);
        }
        Self { words }
    }

    /// Add `attribute`.
    pub fn insert(&mut self, attribute: AttributeId) {
        let (word, mask) = locate(attribute);
        if word >= self.words.len() {
            self.words.resize(word + 1, 0);
        }
        self.words[word] |= mask;
    }

    /// Whether `attribute` is selected.
    pub fn contains(&self, attribute: AttributeId) -> bool {
        let (word, mask) = locate(attribute);
        self.words.get(word).is_some_and(|w| w & mask != 0)
    }

    /// IDs in `self` that are absent from `other`.
    pub fn difference(&self, other: &Self) -> Self {
        let mut words: Vec<u64> = self
            .words
            .iter()
            .zip(other.words.iter().chain(std::iter::repeat(&0)))
            .map(|(a, b)| a & !b)
            .collect();
        while words.last() == Some(&0) {
            words.pop();
        }
        Self { words }
    }

    /// Whether nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|&w| w == 0)
    }

    /// Number of selected IDs.
    pub fn len(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Selected IDs, lowest first.
    pub fn iter(&self) -> AttributeSetIter<'_> {
        AttributeSetIter {
            words: &self.words,
            base: 0,
            pending: self.words.first().copied().unwrap_or(0),
        }
    }
}

impl PartialEq for AttributeSet {
    fn eq(&self, other: &Self) -> bool {
        self.difference(other).is_empty() && other.difference(self).is_empty()
    }
}

impl Eq for AttributeSet {}

impl FromIterator<AttributeId> for AttributeSet {
    fn from_iter<I: IntoIterator<Item = AttributeId>>(iter: I) -> Self {
        let mut set = Self::empty();
        iter.into_iter().for_each(|id| set.insert(id));
        set
    }
}

impl<'a> IntoIterator for &'a AttributeSet {
    type Item = AttributeId;
    type IntoIter = AttributeSetIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Ascending iterator over an [`AttributeSet`].
pub struct AttributeSetIter<'a> {
    words: &'a [u64],
    base: usize,
    pending: u64,
}

impl Iterator for AttributeSetIter<'_> {
    type Item = AttributeId;

    fn next(&mut self) -> Option<Self::Item> {
        while self.pending == 0 {
            self.base += 1;
            self.pending = *self.words.get(self.base)?;
        }
        let bit = self.pending.trailing_zeros() as usize;
        self.pending &= self.pending - 1;
        Some(AttributeId((self.base * 64 + bit) as u32))
    }
}
