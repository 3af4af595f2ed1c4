use std::any::{type_name, Any, TypeId};
use std::fmt;
use std::sync::Arc;

/// How directly a source type converts into a declared type.
///
/// Variants are ordered from best to worst, so `Rank::Exact < Rank::UserDefined`.
/// When several declared types accept a value, the one reached by the best
/// rank receives it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Rank {
    /// The source type is the declared type.
    Exact,
    /// A widening into the canonical integer or float type (`i8 -> i32`, `f32 -> f64`).
    Promotion,
    /// Any other lossless conversion between built-in types (`i32 -> i64`).
    Standard,
    /// A conversion through a user-provided constructor (`&str -> String`).
    UserDefined,
}

type ConvertFn<T> = Arc<dyn Fn(&mut dyn Any) -> Option<T> + Send + Sync>;

struct Conversion<T> {
    source: TypeId,
    source_name: &'static str,
    rank: Rank,
    convert: ConvertFn<T>,
}

impl<T> Clone for Conversion<T> {
    fn clone(&self) -> Self {
        Self {
            source: self.source,
            source_name: self.source_name,
            rank: self.rank,
            convert: Arc::clone(&self.convert),
        }
    }
}

/// A type that can be declared in a [`Schema`](crate::Schema).
///
/// The identity conversion is always available. Implement
/// [`conversions`](Element::conversions) to let values of other types be
/// routed into this one.
///
/// # Examples
///
/// ```
/// use sovran_varvec::{ConversionTable, Element};
///
/// #[derive(Debug, PartialEq)]
/// struct Celsius(f64);
///
/// impl From<f64> for Celsius {
///     fn from(value: f64) -> Self {
///         Celsius(value)
///     }
/// }
///
/// impl Element for Celsius {
///     fn conversions(table: &mut ConversionTable<Self>) {
///         table.user_defined::<f64>();
///     }
/// }
/// ```
pub trait Element: Any + Sized {
    /// Registers the non-identity conversions into this type.
    fn conversions(_table: &mut ConversionTable<Self>) {}
}

/// The implicit conversions a declared type accepts, keyed by source type.
///
/// Built once per container from [`Element::conversions`]. If a source type
/// is registered twice, the first registration wins.
pub struct ConversionTable<T> {
    entries: Vec<Conversion<T>>,
}

impl<T: Element> ConversionTable<T> {
    pub(crate) fn build() -> Self {
        let mut table = Self {
            entries: Vec::new(),
        };
        table.register::<T, _>(Rank::Exact, |value| value);
        T::conversions(&mut table);
        table
    }
}

impl<T: 'static> ConversionTable<T> {
    /// Registers a conversion from `S` with an explicit rank.
    pub fn register<S, F>(&mut self, rank: Rank, convert: F) -> &mut Self
    where
        S: Any,
        F: Fn(S) -> T + Send + Sync + 'static,
    {
        let source = TypeId::of::<S>();
        if self.entries.iter().any(|entry| entry.source == source) {
            log::debug!(
                "ignoring duplicate conversion `{}` -> `{}`",
                type_name::<S>(),
                type_name::<T>()
            );
            return self;
        }

        self.entries.push(Conversion {
            source,
            source_name: type_name::<S>(),
            rank,
            convert: Arc::new(move |value: &mut dyn Any| {
                value
                    .downcast_mut::<Option<S>>()
                    .and_then(Option::take)
                    .map(|value| convert(value))
            }),
        });
        self
    }

    /// Registers `S -> T` as a promotion.
    pub fn promotion<S>(&mut self) -> &mut Self
    where
        S: Any + Into<T>,
    {
        self.register::<S, _>(Rank::Promotion, |value: S| value.into())
    }

    /// Registers `S -> T` as a standard conversion.
    pub fn standard<S>(&mut self) -> &mut Self
    where
        S: Any + Into<T>,
    {
        self.register::<S, _>(Rank::Standard, |value: S| value.into())
    }

    /// Registers `S -> T` as a user-defined conversion.
    pub fn user_defined<S>(&mut self) -> &mut Self
    where
        S: Any + Into<T>,
    {
        self.register::<S, _>(Rank::UserDefined, |value: S| value.into())
    }

    /// Returns the rank at which values of `source` convert into `T`.
    pub fn rank_of(&self, source: TypeId) -> Option<Rank> {
        self.find(source).map(|entry| entry.rank)
    }

    /// Number of accepted source types, identity included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false once built, since the identity is registered first.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over accepted source type names with their ranks.
    pub fn sources(&self) -> impl Iterator<Item = (&'static str, Rank)> + '_ {
        self.entries
            .iter()
            .map(|entry| (entry.source_name, entry.rank))
    }

    /// Converts a value passed as `&mut Option<S>`, taking it out of the option.
    ///
    /// Returns `None` and leaves the option untouched if `source` is not
    /// registered or does not match the option's payload type.
    pub(crate) fn convert(&self, source: TypeId, value: &mut dyn Any) -> Option<T> {
        self.find(source).and_then(|entry| (entry.convert)(value))
    }

    fn find(&self, source: TypeId) -> Option<&Conversion<T>> {
        self.entries.iter().find(|entry| entry.source == source)
    }
}

impl<T> Clone for ConversionTable<T> {
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
        }
    }
}

impl<T> fmt::Debug for ConversionTable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.entries.iter().map(|entry| (entry.source_name, entry.rank)))
            .finish()
    }
}

// Built-in tables only list conversions std implements as `From`.
macro_rules! element {
    ($($target:ty),+ $(,)?) => {
        $(impl Element for $target {})+
    };
    ($target:ty {
        $(promotion: [$($promoted:ty),+ $(,)?])?
        $(standard: [$($standard:ty),+ $(,)?])?
        $(user: [$($user:ty),+ $(,)?])?
    }) => {
        impl Element for $target {
            fn conversions(table: &mut ConversionTable<Self>) {
                $($(table.promotion::<$promoted>();)+)?
                $($(table.standard::<$standard>();)+)?
                $($(table.user_defined::<$user>();)+)?
            }
        }
    };
}

element!(bool, &'static str);
element!(char { standard: [u8] });

element!(i8 { standard: [bool] });
element!(i16 { standard: [i8, u8, bool] });
element!(i32 { promotion: [i8, i16, u8, u16, bool] });
element!(i64 { standard: [i8, i16, i32, u8, u16, u32, bool] });
element!(i128 { standard: [i8, i16, i32, i64, u8, u16, u32, u64, bool] });
element!(isize { standard: [i8, i16, u8, bool] });

element!(u8 { standard: [bool] });
element!(u16 { standard: [u8, bool] });
element!(u32 { standard: [u8, u16, char, bool] });
element!(u64 { standard: [u8, u16, u32, char, bool] });
element!(u128 { standard: [u8, u16, u32, u64, char, bool] });
element!(usize { standard: [u8, u16, bool] });

element!(f32 { standard: [i8, i16, u8, u16] });
element!(f64 {
    promotion: [f32]
    standard: [i8, i16, i32, u8, u16, u32]
});

element!(String { user: [&'static str, char, Box<str>] });
element!(Box<str> { user: [&'static str, String] });

#[cfg(test)]
mod tests {
    use super::*;

    fn convert<T: Element, S: Any>(table: &ConversionTable<T>, value: S) -> Option<T> {
        let mut value = Some(value);
        table.convert(TypeId::of::<S>(), &mut value)
    }

    #[test]
    fn test_identity_is_exact() {
        let table = ConversionTable::<i64>::build();
        assert_eq!(table.rank_of(TypeId::of::<i64>()), Some(Rank::Exact));
        assert_eq!(convert(&table, 7i64), Some(7));
    }

    #[test]
    fn test_builtin_ranks() {
        let int = ConversionTable::<i32>::build();
        assert_eq!(int.rank_of(TypeId::of::<i16>()), Some(Rank::Promotion));
        assert_eq!(int.rank_of(TypeId::of::<i64>()), None);

        let double = ConversionTable::<f64>::build();
        assert_eq!(double.rank_of(TypeId::of::<f32>()), Some(Rank::Promotion));
        assert_eq!(double.rank_of(TypeId::of::<i32>()), Some(Rank::Standard));
        assert_eq!(double.rank_of(TypeId::of::<i64>()), None);

        let string = ConversionTable::<String>::build();
        assert_eq!(
            string.rank_of(TypeId::of::<&'static str>()),
            Some(Rank::UserDefined)
        );
    }

    #[test]
    fn test_debug_lists_sources() {
        let table = ConversionTable::<u16>::build();
        assert_eq!(
            format!("{:?}", table),
            r#"{"u16": Exact, "u8": Standard, "bool": Standard}"#
        );
    }

    #[test]
    fn test_ranks_are_ordered_best_first() {
        assert!(Rank::Exact < Rank::Promotion);
        assert!(Rank::Promotion < Rank::Standard);
        assert!(Rank::Standard < Rank::UserDefined);
    }

    #[test]
    fn test_convert_takes_the_value() {
        let table = ConversionTable::<String>::build();
        let mut value = Some("hello");
        let converted = table.convert(TypeId::of::<&'static str>(), &mut value);
        assert_eq!(converted.as_deref(), Some("hello"));
        assert!(value.is_none());
    }

    #[test]
    fn test_convert_rejects_unregistered_source() {
        let table = ConversionTable::<u8>::build();
        let mut value = Some(300u16);
        assert_eq!(table.convert(TypeId::of::<u16>(), &mut value), None);
        assert_eq!(value, Some(300));
    }

    #[derive(Debug, PartialEq)]
    struct Meters(f64);

    impl Element for Meters {
        fn conversions(table: &mut ConversionTable<Self>) {
            table
                .register::<f64, _>(Rank::UserDefined, Meters)
                .register::<f64, _>(Rank::Standard, |v| Meters(v * 2.0))
                .register::<u32, _>(Rank::UserDefined, |v| Meters(f64::from(v)));
        }
    }

    #[test]
    fn test_first_registration_wins() {
        let table = ConversionTable::<Meters>::build();
        assert_eq!(table.len(), 3);
        assert_eq!(table.rank_of(TypeId::of::<f64>()), Some(Rank::UserDefined));
        assert_eq!(convert(&table, 1.5f64), Some(Meters(1.5)));
        assert_eq!(convert(&table, 4u32), Some(Meters(4.0)));
    }

    #[test]
    fn test_sources_in_registration_order() {
        let table = ConversionTable::<char>::build();
        let sources: Vec<_> = table.sources().collect();
        assert_eq!(sources, vec![("char", Rank::Exact), ("u8", Rank::Standard)]);
    }
}
