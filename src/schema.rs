use crate::conversion::Element;
use crate::slot::{AnySlot, Slot};

/// An ordered list of declared types, written as a tuple.
///
/// `(i32, String, f64)` declares three slots; their order sets both the
/// bucket layout and the priority between equally good matches. `()` is the
/// empty schema, which accepts nothing.
///
/// Implemented for tuples of up to twelve [`Element`] types.
pub trait Schema: 'static {
    /// Number of declared types.
    const LEN: usize;

    /// Storage for every declared type, one [`Slot`] per type.
    type Slots;

    /// Builds empty slots, each bucket pre-sized for `capacity` values.
    fn slots(capacity: usize) -> Self::Slots;

    /// The slot at `index`, type-erased.
    fn slot(slots: &Self::Slots, index: usize) -> Option<&dyn AnySlot>;

    /// The slot at `index`, type-erased and mutable.
    fn slot_mut(slots: &mut Self::Slots, index: usize) -> Option<&mut dyn AnySlot>;
}

impl Schema for () {
    const LEN: usize = 0;
    type Slots = ();

    fn slots(_capacity: usize) -> Self::Slots {}

    fn slot(_slots: &Self::Slots, _index: usize) -> Option<&dyn AnySlot> {
        None
    }

    fn slot_mut(_slots: &mut Self::Slots, _index: usize) -> Option<&mut dyn AnySlot> {
        None
    }
}

macro_rules! impl_schema {
    ($len:expr; $($idx:tt => $T:ident),+) => {
        impl<$($T: Element),+> Schema for ($($T,)+) {
            const LEN: usize = $len;
            type Slots = ($(Slot<$T>,)+);

            fn slots(capacity: usize) -> Self::Slots {
                ($(Slot::<$T>::with_capacity(capacity),)+)
            }

            fn slot(slots: &Self::Slots, index: usize) -> Option<&dyn AnySlot> {
                match index {
                    $($idx => Some(&slots.$idx as &dyn AnySlot),)+
                    _ => None,
                }
            }

            fn slot_mut(slots: &mut Self::Slots, index: usize) -> Option<&mut dyn AnySlot> {
                match index {
                    $($idx => Some(&mut slots.$idx as &mut dyn AnySlot),)+
                    _ => None,
                }
            }
        }
    };
}

/// Invokes `$m!(len; index => Type, ...)` once per supported tuple arity.
macro_rules! for_each_tuple {
    ($m:ident) => {
        $m!(1; 0 => A);
        $m!(2; 0 => A, 1 => B);
        $m!(3; 0 => A, 1 => B, 2 => C);
        $m!(4; 0 => A, 1 => B, 2 => C, 3 => D);
        $m!(5; 0 => A, 1 => B, 2 => C, 3 => D, 4 => E);
        $m!(6; 0 => A, 1 => B, 2 => C, 3 => D, 4 => E, 5 => F);
        $m!(7; 0 => A, 1 => B, 2 => C, 3 => D, 4 => E, 5 => F, 6 => G);
        $m!(8; 0 => A, 1 => B, 2 => C, 3 => D, 4 => E, 5 => F, 6 => G, 7 => H);
        $m!(9; 0 => A, 1 => B, 2 => C, 3 => D, 4 => E, 5 => F, 6 => G, 7 => H, 8 => I);
        $m!(10; 0 => A, 1 => B, 2 => C, 3 => D, 4 => E, 5 => F, 6 => G, 7 => H, 8 => I, 9 => J);
        $m!(11; 0 => A, 1 => B, 2 => C, 3 => D, 4 => E, 5 => F, 6 => G, 7 => H, 8 => I, 9 => J, 10 => K);
        $m!(12; 0 => A, 1 => B, 2 => C, 3 => D, 4 => E, 5 => F, 6 => G, 7 => H, 8 => I, 9 => J, 10 => K, 11 => L);
    };
}

pub(crate) use for_each_tuple;

for_each_tuple!(impl_schema);

#[cfg(test)]
mod tests {
    use super::*;
    use std::any::TypeId;

    #[test]
    fn test_arity() {
        assert_eq!(<() as Schema>::LEN, 0);
        assert_eq!(<(u8,) as Schema>::LEN, 1);
        assert_eq!(<(i32, String, f64) as Schema>::LEN, 3);
    }

    #[test]
    fn test_slots_follow_declaration_order() {
        let slots = <(i32, String, f64) as Schema>::slots(0);
        let types: Vec<TypeId> = (0..3)
            .filter_map(|index| <(i32, String, f64) as Schema>::slot(&slots, index))
            .map(|slot| slot.element_type())
            .collect();
        assert_eq!(
            types,
            vec![TypeId::of::<i32>(), TypeId::of::<String>(), TypeId::of::<f64>()]
        );
        assert!(<(i32, String, f64) as Schema>::slot(&slots, 3).is_none());
    }

    #[test]
    fn test_empty_schema_has_no_slots() {
        let mut slots = <() as Schema>::slots(8);
        assert!(<() as Schema>::slot(&slots, 0).is_none());
        assert!(<() as Schema>::slot_mut(&mut slots, 0).is_none());
    }
}
