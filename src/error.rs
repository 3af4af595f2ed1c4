use thiserror::Error;

/// Errors that can occur when using a VarVec
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VarVecError {
    /// No declared type accepts a value of the inserted type
    #[error("no declared type accepts a value of type `{type_name}`")]
    NoApplicableBucket { type_name: &'static str },
    /// Several declared types match the inserted type equally well
    #[error("value of type `{type_name}` matches slots {slots:?} equally well")]
    AmbiguousMatch {
        type_name: &'static str,
        slots: Vec<usize>,
    },
    /// A cursor was dispatched or advanced at or past the end
    #[error("cursor position {position} is out of bounds for length {len}")]
    IteratorOutOfBounds { position: usize, len: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_offender() {
        let err = VarVecError::NoApplicableBucket { type_name: "u64" };
        assert_eq!(err.to_string(), "no declared type accepts a value of type `u64`");

        let err = VarVecError::AmbiguousMatch {
            type_name: "i8",
            slots: vec![0, 2],
        };
        assert_eq!(err.to_string(), "value of type `i8` matches slots [0, 2] equally well");

        let err = VarVecError::IteratorOutOfBounds { position: 3, len: 3 };
        assert_eq!(err.to_string(), "cursor position 3 is out of bounds for length 3");
    }
}
