use crate::bucket::Bucket;
use crate::conversion::Element;
use crate::cursor::{Cursor, Iter};
use crate::error::VarVecError;
use crate::resolve::{resolve, Candidate, Resolution};
use crate::schema::Schema;
use crate::slot::{AnySlot, Slot};
use crate::visit::Dispatch;
use smallvec::SmallVec;
use std::any::{type_name, Any, TypeId};
use std::fmt;

/// An append-only vector over a fixed list of declared types
///
/// Each inserted value is routed to the bucket of the declared type that
/// matches it most closely and stamped with a global sequence number.
/// Iteration replays all values, across all buckets, in insertion order.
///
/// # Examples
///
/// ```
/// use sovran_varvec::{VarVec, VarVecError};
///
/// let mut vec = VarVec::<(i32, String, f64)>::new();
///
/// vec.insert(2i16)?; // promoted into the i32 bucket
/// vec.insert(42)?;
/// vec.insert("Hello world!")?; // converted into the String bucket
/// vec.insert(42.5)?;
///
/// assert_eq!(vec.len(), 4);
/// assert_eq!(vec.bucket_len(0), Some(2));
///
/// let order: Vec<usize> = vec.iter().map(|entry| entry.slot()).collect();
/// assert_eq!(order, vec![0, 0, 1, 2]);
///
/// // Nothing accepts a u64 without loss
/// assert_eq!(
///     vec.insert(7u64),
///     Err(VarVecError::NoApplicableBucket { type_name: "u64" })
/// );
/// assert_eq!(vec.len(), 4);
/// # Ok::<(), VarVecError>(())
/// ```
pub struct VarVec<S: Schema> {
    slots: S::Slots,
    len: usize,
}

impl<S: Schema> VarVec<S> {
    /// Creates a new, empty VarVec
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates an empty VarVec with room for `capacity` values in every bucket
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: S::slots(capacity),
            len: 0,
        }
    }

    /// Inserts a value into the bucket of its closest declared type
    ///
    /// Routing uses the static type `V` only. A `Box<dyn Any>` is routed as a
    /// `Box<dyn Any>`, whatever it holds.
    ///
    /// # Errors
    ///
    /// - Returns `VarVecError::NoApplicableBucket` if no declared type accepts `V`
    /// - Returns `VarVecError::AmbiguousMatch` if several declared types tie
    ///
    /// On error nothing is stored and no sequence number is consumed.
    ///
    /// # Returns
    ///
    /// Returns the global sequence number assigned to the value.
    pub fn insert<V: Any>(&mut self, value: V) -> Result<usize, VarVecError> {
        let slot = self.route::<V>()?;
        let seq = self.len;
        let mut value = Some(value);

        let appended = S::slot_mut(&mut self.slots, slot)
            .is_some_and(|target| target.append(seq, TypeId::of::<V>(), &mut value));
        if !appended {
            log::debug!("slot {} refused a routed `{}`", slot, type_name::<V>());
            return Err(VarVecError::NoApplicableBucket {
                type_name: type_name::<V>(),
            });
        }

        self.len += 1;
        log::trace!("stored `{}` as #{} in slot {}", type_name::<V>(), seq, slot);
        Ok(seq)
    }

    /// Returns the slot index a value of type `V` would be inserted into
    ///
    /// # Errors
    ///
    /// Same as [`insert`](Self::insert), without touching the container.
    pub fn route<V: Any>(&self) -> Result<usize, VarVecError> {
        let source = TypeId::of::<V>();
        let candidates: SmallVec<[Candidate; 8]> = (0..S::LEN)
            .filter_map(|index| {
                let rank = self.slot(index)?.rank_of(source)?;
                Some(Candidate::declared(index, rank))
            })
            .collect();

        match resolve(&candidates) {
            Resolution::Unique(slot) => {
                log::trace!(
                    "routed `{}` to slot {} from {} candidate(s)",
                    type_name::<V>(),
                    slot,
                    candidates.len()
                );
                Ok(slot)
            }
            Resolution::Ambiguous(slots) => {
                log::debug!("`{}` is ambiguous between slots {:?}", type_name::<V>(), slots);
                Err(VarVecError::AmbiguousMatch {
                    type_name: type_name::<V>(),
                    slots: slots.into_vec(),
                })
            }
            Resolution::NoCandidate => {
                log::debug!("no slot accepts `{}`", type_name::<V>());
                Err(VarVecError::NoApplicableBucket {
                    type_name: type_name::<V>(),
                })
            }
        }
    }

    /// Returns the number of values ever inserted
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if nothing has been inserted
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of declared types
    pub fn slot_count(&self) -> usize {
        S::LEN
    }

    /// Returns the name of the declared type at `index`
    pub fn slot_name(&self, index: usize) -> Option<&'static str> {
        self.slot(index).map(|slot| slot.element_name())
    }

    /// Returns the number of values stored for the declared type at `index`
    pub fn bucket_len(&self, index: usize) -> Option<usize> {
        self.slot(index).map(|slot| slot.len())
    }

    /// Returns the bucket of declared type `T`
    ///
    /// Matches `T` exactly; returns `None` if `T` is not declared.
    pub fn bucket<T: Element>(&self) -> Option<&Bucket<T>> {
        (0..S::LEN)
            .filter_map(|index| self.slot(index))
            .find(|slot| slot.element_type() == TypeId::of::<T>())
            .and_then(|slot| slot.as_any().downcast_ref::<Slot<T>>())
            .map(Slot::bucket)
    }

    /// Returns a cursor at the first value
    pub fn begin(&self) -> Cursor<'_, S> {
        Cursor::begin(self)
    }

    /// Returns a cursor one past the last value
    pub fn end(&self) -> Cursor<'_, S> {
        Cursor::end(self)
    }

    /// Iterates over all values in insertion order
    pub fn iter(&self) -> Iter<'_, S> {
        Iter::new(self.begin())
    }

    /// Visits every value in insertion order, collecting the results
    pub fn visit_all<V>(&self, visitor: &mut V) -> Vec<V::Output>
    where
        V: Dispatch<S>,
    {
        self.iter().map(|entry| entry.visit(visitor)).collect()
    }

    /// Visits every value grouped by declared type
    ///
    /// All values of the first declared type come first, in insertion
    /// order, then those of the second, and so on.
    pub fn visit_by_slot<V>(&self, visitor: &mut V) -> Vec<V::Output>
    where
        V: Dispatch<S>,
    {
        let mut results = Vec::with_capacity(self.len);
        for index in 0..S::LEN {
            let len = self.bucket_len(index).unwrap_or(0);
            results.extend(
                (0..len).filter_map(|cursor| {
                    <V as Dispatch<S>>::dispatch(visitor, &self.slots, index, cursor)
                }),
            );
        }
        results
    }

    pub(crate) fn slots(&self) -> &S::Slots {
        &self.slots
    }

    pub(crate) fn slot(&self, index: usize) -> Option<&dyn AnySlot> {
        S::slot(&self.slots, index)
    }
}

impl<S: Schema> Default for VarVec<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Schema> Clone for VarVec<S>
where
    S::Slots: Clone,
{
    fn clone(&self) -> Self {
        Self {
            slots: self.slots.clone(),
            len: self.len,
        }
    }
}

impl<S: Schema> fmt::Debug for VarVec<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let buckets: Vec<(&'static str, usize)> = (0..S::LEN)
            .filter_map(|index| self.slot(index))
            .map(|slot| (slot.element_name(), slot.len()))
            .collect();
        f.debug_struct("VarVec")
            .field("len", &self.len)
            .field("buckets", &buckets)
            .finish()
    }
}

impl<'a, S: Schema> IntoIterator for &'a VarVec<S> {
    type Item = crate::cursor::Entry<'a, S>;
    type IntoIter = Iter<'a, S>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
