use crate::conversion::Element;
use crate::schema::{for_each_tuple, Schema};
use crate::slot::Slot;

/// A visitor operation for values of type `T`.
///
/// A visitor for a whole schema implements `Visit<T>` once per declared
/// type, with the same `Output` each time. That makes it a [`Dispatch`]
/// for the schema.
///
/// # Examples
///
/// ```
/// use sovran_varvec::{VarVec, Visit};
///
/// struct Describe;
///
/// impl Visit<i32> for Describe {
///     type Output = String;
///     fn visit(&mut self, value: &i32) -> String {
///         format!("int {}", value)
///     }
/// }
///
/// impl Visit<String> for Describe {
///     type Output = String;
///     fn visit(&mut self, value: &String) -> String {
///         format!("text {:?}", value)
///     }
/// }
///
/// let mut vec = VarVec::<(i32, String)>::new();
/// vec.insert(42)?;
/// vec.insert("hello")?;
///
/// assert_eq!(vec.visit_all(&mut Describe), vec!["int 42", "text \"hello\""]);
/// # Ok::<(), sovran_varvec::VarVecError>(())
/// ```
pub trait Visit<T> {
    /// Result shared by every declared type's visit.
    type Output;

    fn visit(&mut self, value: &T) -> Self::Output;
}

/// A visitor that handles every declared type of `S` with one output type.
///
/// Blanket-implemented; implement [`Visit`] for each declared type instead.
/// Dispatch is a `match` over the closed set of slot indices.
pub trait Dispatch<S: Schema> {
    type Output;

    /// Visits the value at `cursor` in the slot at `slot`, if it exists.
    fn dispatch(&mut self, slots: &S::Slots, slot: usize, cursor: usize) -> Option<Self::Output>;
}

impl<V> Dispatch<()> for V {
    type Output = ();

    fn dispatch(&mut self, _slots: &(), _slot: usize, _cursor: usize) -> Option<()> {
        None
    }
}

macro_rules! impl_dispatch {
    ($len:expr; $($idx:tt => $T:ident),+) => {
        impl<V, R, $($T: Element),+> Dispatch<($($T,)+)> for V
        where
            $(V: Visit<$T, Output = R>,)+
        {
            type Output = R;

            fn dispatch(
                &mut self,
                slots: &($(Slot<$T>,)+),
                slot: usize,
                cursor: usize,
            ) -> Option<R> {
                match slot {
                    $($idx => slots
                        .$idx
                        .bucket
                        .get(cursor)
                        .map(|value| <V as Visit<$T>>::visit(self, value)),)+
                    _ => None,
                }
            }
        }
    };
}

for_each_tuple!(impl_dispatch);

#[cfg(test)]
mod tests {
    use super::*;
    use std::any::TypeId;

    struct Tag;

    impl Visit<u8> for Tag {
        type Output = &'static str;
        fn visit(&mut self, _value: &u8) -> &'static str {
            "u8"
        }
    }

    impl Visit<char> for Tag {
        type Output = &'static str;
        fn visit(&mut self, _value: &char) -> &'static str {
            "char"
        }
    }

    #[test]
    fn test_dispatch_selects_slot_type() {
        let mut slots = <(u8, char) as Schema>::slots(0);
        let mut byte = Some(1u8);
        let mut letter = Some('x');
        assert!(<(u8, char) as Schema>::slot_mut(&mut slots, 0)
            .is_some_and(|slot| slot.append(0, TypeId::of::<u8>(), &mut byte)));
        assert!(<(u8, char) as Schema>::slot_mut(&mut slots, 1)
            .is_some_and(|slot| slot.append(1, TypeId::of::<char>(), &mut letter)));

        let mut tag = Tag;
        assert_eq!(Dispatch::<(u8, char)>::dispatch(&mut tag, &slots, 0, 0), Some("u8"));
        assert_eq!(Dispatch::<(u8, char)>::dispatch(&mut tag, &slots, 1, 0), Some("char"));
        assert_eq!(Dispatch::<(u8, char)>::dispatch(&mut tag, &slots, 1, 1), None);
        assert_eq!(Dispatch::<(u8, char)>::dispatch(&mut tag, &slots, 2, 0), None);
    }
}
