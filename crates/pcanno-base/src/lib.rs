use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Guid(Uuid);

impl Guid {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for Guid {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for Guid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Numeric thresholds shared by the geometry code.
///
/// `linear` is the smallest cross-product magnitude for which two lines are
/// still treated as intersecting; anything below is reported as parallel.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tolerance {
    pub linear: f64,
}

impl Default for Tolerance {
    fn default() -> Self {
        Self { linear: 1.0e-6 }
    }
}

impl Tolerance {
    pub fn is_zero(&self, value: f64) -> bool {
        value.abs() <= self.linear
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

pub type Result<T> = std::result::Result<T, Error>;

pub fn ensure_finite(name: &str, value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(Error::InvalidParameter(format!("{name} must be finite")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guids_are_unique() {
        assert_ne!(Guid::new(), Guid::new());
    }

    #[test]
    fn tolerance_zero_check() {
        let tol = Tolerance::default();
        assert!(tol.is_zero(1.0e-9));
        assert!(!tol.is_zero(1.0e-3));
    }

    #[test]
    fn ensure_finite_rejects_nan() {
        assert!(ensure_finite("x", f64::NAN).is_err());
        assert!(ensure_finite("x", 2.0).is_ok());
    }
}
