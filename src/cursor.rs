//! Replaying a [`VarVec`] in global insertion order.
//!
//! A [`Cursor`] keeps one sub-cursor per bucket plus the global position.
//! To serve position `p` it asks every bucket whether its next unread entry
//! carries sequence number `p`; exactly one does. Each step costs one probe
//! per declared type.
//!
//! Cursors borrow the container, so it cannot grow underneath them:
//!
//! ```compile_fail
//! use sovran_varvec::VarVec;
//!
//! let mut vec = VarVec::<(i32,)>::new();
//! vec.insert(1).unwrap();
//! let cursor = vec.begin();
//! vec.insert(2).unwrap();
//! cursor.position();
//! ```

use crate::error::VarVecError;
use crate::schema::Schema;
use crate::varvec::VarVec;
use crate::visit::Dispatch;
use smallvec::SmallVec;
use std::any::Any;
use std::cmp::Ordering;
use std::fmt;
use std::iter::FusedIterator;

/// A forward position in the global insertion order of a [`VarVec`]
///
/// Cursors compare by global position only.
pub struct Cursor<'a, S: Schema> {
    vec: &'a VarVec<S>,
    position: usize,
    heads: SmallVec<[usize; 8]>,
}

impl<'a, S: Schema> Cursor<'a, S> {
    pub(crate) fn begin(vec: &'a VarVec<S>) -> Self {
        Self {
            vec,
            position: 0,
            heads: SmallVec::from_elem(0, S::LEN),
        }
    }

    pub(crate) fn end(vec: &'a VarVec<S>) -> Self {
        Self {
            vec,
            position: vec.len(),
            heads: (0..S::LEN)
                .map(|index| vec.bucket_len(index).unwrap_or(0))
                .collect(),
        }
    }

    /// Returns the global position, equal to the sequence number it points at
    pub fn position(&self) -> usize {
        self.position
    }

    /// Returns true if the cursor is at the end
    pub fn is_end(&self) -> bool {
        self.position >= self.vec.len()
    }

    /// Returns the number of values from here to the end
    pub fn remaining(&self) -> usize {
        self.vec.len().saturating_sub(self.position)
    }

    /// Returns the value under the cursor
    ///
    /// # Errors
    ///
    /// Returns `VarVecError::IteratorOutOfBounds` at the end.
    pub fn entry(&self) -> Result<Entry<'a, S>, VarVecError> {
        let slot = self.locate().ok_or_else(|| self.out_of_bounds())?;
        Ok(Entry {
            vec: self.vec,
            seq: self.position,
            slot,
            cursor: self.heads[slot],
        })
    }

    /// Visits the value under the cursor with its declared type
    ///
    /// # Errors
    ///
    /// Returns `VarVecError::IteratorOutOfBounds` at the end.
    pub fn dispatch<V>(&self, visitor: &mut V) -> Result<V::Output, VarVecError>
    where
        V: Dispatch<S>,
    {
        self.entry().map(|entry| entry.visit(visitor))
    }

    /// Moves to the next value
    ///
    /// # Errors
    ///
    /// Returns `VarVecError::IteratorOutOfBounds` at the end; the cursor
    /// stays where it is.
    pub fn advance(&mut self) -> Result<(), VarVecError> {
        let slot = self.locate().ok_or_else(|| self.out_of_bounds())?;
        self.heads[slot] += 1;
        self.position += 1;
        Ok(())
    }

    /// Finds the bucket whose next unread entry carries the current position.
    fn locate(&self) -> Option<usize> {
        (0..S::LEN).find(|&index| {
            self.vec
                .slot(index)
                .and_then(|slot| slot.seq_at(self.heads[index]))
                == Some(self.position)
        })
    }

    fn out_of_bounds(&self) -> VarVecError {
        log::debug!(
            "cursor at {} used past the end ({})",
            self.position,
            self.vec.len()
        );
        VarVecError::IteratorOutOfBounds {
            position: self.position,
            len: self.vec.len(),
        }
    }
}

impl<S: Schema> Clone for Cursor<'_, S> {
    fn clone(&self) -> Self {
        Self {
            vec: self.vec,
            position: self.position,
            heads: self.heads.clone(),
        }
    }
}

impl<S: Schema> PartialEq for Cursor<'_, S> {
    fn eq(&self, other: &Self) -> bool {
        self.position == other.position
    }
}

impl<S: Schema> Eq for Cursor<'_, S> {}

impl<S: Schema> PartialOrd for Cursor<'_, S> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<S: Schema> Ord for Cursor<'_, S> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.position.cmp(&other.position)
    }
}

impl<S: Schema> fmt::Debug for Cursor<'_, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cursor")
            .field("position", &self.position)
            .field("heads", &self.heads.as_slice())
            .finish()
    }
}

/// One stored value, borrowed from its [`VarVec`]
pub struct Entry<'a, S: Schema> {
    vec: &'a VarVec<S>,
    seq: usize,
    slot: usize,
    cursor: usize,
}

impl<'a, S: Schema> Entry<'a, S> {
    /// Global sequence number of the value
    pub fn seq(&self) -> usize {
        self.seq
    }

    /// Index of the declared type the value was stored as
    pub fn slot(&self) -> usize {
        self.slot
    }

    /// Name of the declared type the value was stored as
    pub fn type_name(&self) -> &'static str {
        self.vec.slot_name(self.slot).unwrap_or("?")
    }

    /// Returns the value if it was stored as a `T`
    pub fn get<T: Any>(&self) -> Option<&'a T> {
        self.vec
            .slot(self.slot)?
            .value_at(self.cursor)?
            .downcast_ref::<T>()
    }

    /// Visits the value with its declared type
    pub fn visit<V>(&self, visitor: &mut V) -> V::Output
    where
        V: Dispatch<S>,
    {
        match <V as Dispatch<S>>::dispatch(visitor, self.vec.slots(), self.slot, self.cursor) {
            Some(output) => output,
            // Entries are only built for located values of a borrowed, append-only vec
            None => unreachable!("entry #{} missing from slot {}", self.seq, self.slot),
        }
    }
}

impl<S: Schema> Clone for Entry<'_, S> {
    fn clone(&self) -> Self {
        Self {
            vec: self.vec,
            seq: self.seq,
            slot: self.slot,
            cursor: self.cursor,
        }
    }
}

impl<S: Schema> fmt::Debug for Entry<'_, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entry")
            .field("seq", &self.seq)
            .field("slot", &self.slot)
            .field("type", &self.type_name())
            .finish()
    }
}

/// Iterator over the values of a [`VarVec`] in insertion order
pub struct Iter<'a, S: Schema> {
    cursor: Cursor<'a, S>,
}

impl<S: Schema> Clone for Iter<'_, S> {
    fn clone(&self) -> Self {
        Self {
            cursor: self.cursor.clone(),
        }
    }
}

impl<S: Schema> fmt::Debug for Iter<'_, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Iter").field("cursor", &self.cursor).finish()
    }
}

impl<'a, S: Schema> Iter<'a, S> {
    pub(crate) fn new(cursor: Cursor<'a, S>) -> Self {
        Self { cursor }
    }

    /// The cursor at the next value to be yielded
    pub fn cursor(&self) -> &Cursor<'a, S> {
        &self.cursor
    }
}

impl<'a, S: Schema> Iterator for Iter<'a, S> {
    type Item = Entry<'a, S>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.cursor.is_end() {
            return None;
        }
        let entry = self.cursor.entry().ok()?;
        self.cursor.advance().ok()?;
        Some(entry)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.cursor.remaining();
        (remaining, Some(remaining))
    }
}

impl<S: Schema> ExactSizeIterator for Iter<'_, S> {}

impl<S: Schema> FusedIterator for Iter<'_, S> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::visit::Visit;

    struct Show;

    impl Visit<i32> for Show {
        type Output = String;
        fn visit(&mut self, value: &i32) -> String {
            value.to_string()
        }
    }

    impl Visit<String> for Show {
        type Output = String;
        fn visit(&mut self, value: &String) -> String {
            value.clone()
        }
    }

    fn sample() -> Result<VarVec<(i32, String)>, VarVecError> {
        let mut vec = VarVec::new();
        vec.insert(42)?;
        vec.insert("hello")?;
        vec.insert(42)?;
        vec.insert("hello")?;
        Ok(vec)
    }

    #[test]
    fn test_walk_begin_to_end() -> Result<(), VarVecError> {
        let vec = sample()?;
        let mut cursor = vec.begin();
        let end = vec.end();
        let mut seen = Vec::new();

        while cursor != end {
            seen.push(cursor.dispatch(&mut Show)?);
            cursor.advance()?;
        }

        assert_eq!(seen, vec!["42", "hello", "42", "hello"]);
        Ok(())
    }

    #[test]
    fn test_end_sentinel() -> Result<(), VarVecError> {
        let vec = sample()?;
        let mut end = vec.end();

        let expected = VarVecError::IteratorOutOfBounds { position: 4, len: 4 };
        assert_eq!(end.dispatch(&mut Show), Err(expected.clone()));
        assert_eq!(end.advance(), Err(expected));
        assert_eq!(end.position(), 4);
        Ok(())
    }

    #[test]
    fn test_comparison_uses_position_only() -> Result<(), VarVecError> {
        let vec = sample()?;
        let mut walked = vec.begin();
        walked.advance()?;
        walked.advance()?;

        let begin = vec.begin();
        assert!(begin < walked);
        assert!(walked < vec.end());
        assert_eq!(walked.clone(), walked);

        for _ in 0..2 {
            walked.advance()?;
        }
        assert_eq!(walked, vec.end());
        Ok(())
    }

    #[test]
    fn test_entry_accessors() -> Result<(), VarVecError> {
        let vec = sample()?;
        let mut cursor = vec.begin();
        cursor.advance()?;

        let entry = cursor.entry()?;
        assert_eq!(entry.seq(), 1);
        assert_eq!(entry.slot(), 1);
        assert_eq!(entry.get::<String>().map(String::as_str), Some("hello"));
        assert_eq!(entry.get::<i32>(), None);
        Ok(())
    }

    #[test]
    fn test_iter_is_exact_and_fused() -> Result<(), VarVecError> {
        let vec = sample()?;
        let mut iter = vec.iter();
        assert_eq!(iter.len(), 4);
        iter.next();
        assert_eq!(iter.len(), 3);
        assert_eq!(iter.by_ref().count(), 3);
        assert!(iter.next().is_none());
        Ok(())
    }

    #[test]
    fn test_empty_schema() {
        let vec = VarVec::<()>::new();
        assert_eq!(vec.begin(), vec.end());
        assert!(vec.begin().entry().is_err());
        assert_eq!(vec.iter().count(), 0);
    }
}
