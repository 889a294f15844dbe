//! Generic, reusable comparison checks, in the same shape regardless of
//! what domain value they're gating.

use derive_more::Constructor;
use thiserror::Error;

/// A single named validation over some `Input`, producing a typed `Error`
/// on failure.
pub trait RiskCheck {
    type Input;
    type Error;

    fn name() -> &'static str;

    fn check(&self, input: &Self::Input) -> Result<(), Self::Error>;
}

/// Passes when `input >= minimum`.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Constructor)]
pub struct CheckAtLeast<T> {
    pub minimum: T,
}

impl<T> RiskCheck for CheckAtLeast<T>
where
    T: Clone + PartialOrd,
{
    type Input = T;
    type Error = CheckAtLeastError<T>;

    fn name() -> &'static str {
        "CheckAtLeast"
    }

    fn check(&self, input: &Self::Input) -> Result<(), Self::Error> {
        if input >= &self.minimum {
            Ok(())
        } else {
            Err(CheckAtLeastError {
                input: input.clone(),
                minimum: self.minimum.clone(),
            })
        }
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Ord, PartialOrd, Error, Constructor)]
#[error("CheckAtLeast failed: input {input:?} < minimum {minimum:?}")]
pub struct CheckAtLeastError<T> {
    pub input: T,
    pub minimum: T,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn passes_when_input_meets_the_minimum() {
        let check = CheckAtLeast::new(10u32);
        assert!(check.check(&10).is_ok());
        assert!(check.check(&11).is_ok());
    }

    #[test]
    fn fails_when_input_is_below_the_minimum() {
        let check = CheckAtLeast::new(10u32);
        let err = check.check(&9).unwrap_err();
        assert_eq!(err.input, 9);
        assert_eq!(err.minimum, 10);
    }
}
