use std::slice;

/// The ordered storage for one declared type
///
/// A `Bucket` holds `(sequence number, value)` pairs in the order they were
/// appended. Sequence numbers come from the owning container's global
/// counter, so they are strictly increasing within a bucket but leave gaps
/// where values went to other buckets.
///
/// # Examples
///
/// ```
/// use sovran_varvec::VarVec;
///
/// let mut vec = VarVec::<(i32, String)>::new();
/// vec.insert(42)?;
/// vec.insert("hello")?;
/// vec.insert(7)?;
///
/// let ints = vec.bucket::<i32>().unwrap();
/// assert_eq!(ints.iter().collect::<Vec<_>>(), vec![(0, &42), (2, &7)]);
/// # Ok::<(), sovran_varvec::VarVecError>(())
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Bucket<T> {
    entries: Vec<(usize, T)>,
}

impl<T> Bucket<T> {
    /// Creates a new, empty Bucket
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Appends a value stamped with `seq`
    ///
    /// `seq` must be greater than every sequence number already stored.
    pub(crate) fn append(&mut self, seq: usize, value: T) {
        debug_assert!(self.last_seq().map_or(true, |last| last < seq));
        self.entries.push((seq, value));
    }

    /// Returns the entry at `cursor` without consuming it
    pub fn peek(&self, cursor: usize) -> Option<(usize, &T)> {
        self.entries.get(cursor).map(|(seq, value)| (*seq, value))
    }

    /// Returns the sequence number of the entry at `cursor`
    pub fn seq_at(&self, cursor: usize) -> Option<usize> {
        self.entries.get(cursor).map(|(seq, _)| *seq)
    }

    /// Returns the value at `cursor`
    pub fn get(&self, cursor: usize) -> Option<&T> {
        self.entries.get(cursor).map(|(_, value)| value)
    }

    /// Returns the sequence number of the most recent entry
    pub fn last_seq(&self) -> Option<usize> {
        self.entries.last().map(|(seq, _)| *seq)
    }

    /// Returns the number of entries in the bucket
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the bucket contains no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over `(sequence number, value)` pairs in append order
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            inner: self.entries.iter(),
        }
    }

    /// Iterates over the stored values in append order
    pub fn values(&self) -> impl Iterator<Item = &T> + '_ {
        self.entries.iter().map(|(_, value)| value)
    }
}

impl<T> Default for Bucket<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, T> IntoIterator for &'a Bucket<T> {
    type Item = (usize, &'a T);
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the entries of a [`Bucket`]
#[derive(Debug, Clone)]
pub struct Iter<'a, T> {
    inner: slice::Iter<'a, (usize, T)>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = (usize, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(seq, value)| (*seq, value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_operations() {
        let mut bucket = Bucket::new();
        assert!(bucket.is_empty());
        assert_eq!(bucket.last_seq(), None);

        bucket.append(1, "one");
        bucket.append(4, "four");

        assert_eq!(bucket.len(), 2);
        assert_eq!(bucket.last_seq(), Some(4));
        assert_eq!(bucket.peek(0), Some((1, &"one")));
        assert_eq!(bucket.seq_at(1), Some(4));
        assert_eq!(bucket.get(1), Some(&"four"));
        assert_eq!(bucket.peek(2), None);
    }

    #[test]
    fn test_peek_does_not_consume() {
        let mut bucket = Bucket::new();
        bucket.append(0, 10u8);
        assert_eq!(bucket.peek(0), bucket.peek(0));
        assert_eq!(bucket.len(), 1);
    }

    #[test]
    fn test_iteration_order() {
        let mut bucket = Bucket::with_capacity(3);
        bucket.append(0, 'a');
        bucket.append(3, 'b');
        bucket.append(5, 'c');

        let pairs: Vec<_> = bucket.iter().collect();
        assert_eq!(pairs, vec![(0, &'a'), (3, &'b'), (5, &'c')]);
        assert_eq!(bucket.iter().len(), 3);

        let values: String = bucket.values().collect();
        assert_eq!(values, "abc");
    }
}
