use crate::bucket::Bucket;
use crate::conversion::{ConversionTable, Element, Rank};
use std::any::{type_name, Any, TypeId};
use std::fmt;

/// One declared type of a schema: its conversion table and its bucket
pub struct Slot<T: Element> {
    pub(crate) conversions: ConversionTable<T>,
    pub(crate) bucket: Bucket<T>,
}

impl<T: Element> Slot<T> {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            conversions: ConversionTable::build(),
            bucket: Bucket::with_capacity(capacity),
        }
    }

    /// The conversions this slot accepts
    pub fn conversions(&self) -> &ConversionTable<T> {
        &self.conversions
    }

    /// The values stored in this slot
    pub fn bucket(&self) -> &Bucket<T> {
        &self.bucket
    }
}

impl<T: Element + Clone> Clone for Slot<T> {
    fn clone(&self) -> Self {
        Self {
            conversions: self.conversions.clone(),
            bucket: self.bucket.clone(),
        }
    }
}

impl<T: Element> fmt::Debug for Slot<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Slot")
            .field("type", &type_name::<T>())
            .field("len", &self.bucket.len())
            .finish()
    }
}

/// A type-erased view of a [`Slot`] that preserves its type information
///
/// Lets the container route, append and locate entries by slot index
/// without knowing the declared type at compile time.
pub trait AnySlot {
    /// Name of the declared type
    fn element_name(&self) -> &'static str;

    /// `TypeId` of the declared type
    fn element_type(&self) -> TypeId;

    /// Rank at which `source` converts into the declared type, if it does
    fn rank_of(&self, source: TypeId) -> Option<Rank>;

    /// Converts the value held in an `&mut Option<S>` and appends it with `seq`
    ///
    /// Returns false, leaving both the slot and the option untouched, if
    /// `source` is not accepted.
    fn append(&mut self, seq: usize, source: TypeId, value: &mut dyn Any) -> bool;

    /// Number of stored entries
    fn len(&self) -> usize;

    /// Returns true if nothing is stored
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sequence number of the entry at `cursor`
    fn seq_at(&self, cursor: usize) -> Option<usize>;

    /// The value at `cursor`
    fn value_at(&self, cursor: usize) -> Option<&dyn Any>;

    /// The concrete `Slot<T>`, for downcasting
    fn as_any(&self) -> &dyn Any;
}

impl<T: Element> AnySlot for Slot<T> {
    fn element_name(&self) -> &'static str {
        type_name::<T>()
    }

    fn element_type(&self) -> TypeId {
        TypeId::of::<T>()
    }

    fn rank_of(&self, source: TypeId) -> Option<Rank> {
        self.conversions.rank_of(source)
    }

    fn append(&mut self, seq: usize, source: TypeId, value: &mut dyn Any) -> bool {
        match self.conversions.convert(source, value) {
            Some(converted) => {
                self.bucket.append(seq, converted);
                true
            }
            None => false,
        }
    }

    fn len(&self) -> usize {
        self.bucket.len()
    }

    fn seq_at(&self, cursor: usize) -> Option<usize> {
        self.bucket.seq_at(cursor)
    }

    fn value_at(&self, cursor: usize) -> Option<&dyn Any> {
        self.bucket.get(cursor).map(|value| value as &dyn Any)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
