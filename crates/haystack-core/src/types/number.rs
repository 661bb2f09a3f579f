use core::fmt;
use core::hash::{Hash, Hasher};

/// Integral values below this magnitude render without a fractional part.
const INTEGRAL_LIMIT: f64 = 1e15;

/// A floating point value with an optional unit such as `kWh` or `°F`.
///
/// Two numbers are equal when both value and unit match. Unlike IEEE 754,
/// two NaN values with the same unit compare equal so numbers can be used as
/// map keys.
#[derive(Debug, Clone)]
pub struct Number {
    pub val: f64,
    pub unit: Option<String>,
}

impl Number {
    pub const ZERO: Number = Number::new(0.0);
    pub const NAN: Number = Number::new(f64::NAN);
    pub const INF: Number = Number::new(f64::INFINITY);
    pub const NEG_INF: Number = Number::new(f64::NEG_INFINITY);

    pub const fn new(val: f64) -> Self {
        Self { val, unit: None }
    }

    pub fn with_unit(val: f64, unit: impl Into<String>) -> Self {
        Self {
            val,
            unit: Some(unit.into()),
        }
    }

    pub fn unit(&self) -> Option<&str> {
        self.unit.as_deref()
    }

    pub fn is_finite(&self) -> bool {
        self.val.is_finite()
    }

    /// Canonical Zinc rendering: `NaN`, `INF`, `-INF`, or the digits followed
    /// directly by the unit. Non-finite values never carry a unit in Zinc.
    pub fn to_zinc(&self) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = self.write_zinc(&mut out);
        out
    }

    pub(crate) fn write_zinc(&self, out: &mut impl fmt::Write) -> fmt::Result {
        if self.val.is_nan() {
            return out.write_str("NaN");
        }
        if self.val == f64::INFINITY {
            return out.write_str("INF");
        }
        if self.val == f64::NEG_INFINITY {
            return out.write_str("-INF");
        }
        if self.val.fract() == 0.0 && self.val.abs() < INTEGRAL_LIMIT {
            write!(out, "{}", self.val as i64)?;
        } else {
            write!(out, "{}", self.val)?;
        }
        if let Some(unit) = &self.unit {
            out.write_str(unit)?;
        }
        Ok(())
    }

    /// Bit pattern used for hashing, folding `-0.0` into `0.0` and every NaN
    /// into one canonical NaN.
    fn hash_bits(&self) -> u64 {
        if self.val.is_nan() {
            f64::NAN.to_bits()
        } else if self.val == 0.0 {
            0.0f64.to_bits()
        } else {
            self.val.to_bits()
        }
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        let same_val = self.val == other.val || (self.val.is_nan() && other.val.is_nan());
        same_val && self.unit == other.unit
    }
}

impl Eq for Number {}

impl Hash for Number {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.hash_bits().hash(state);
        self.unit.hash(state);
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_zinc(f)
    }
}

impl From<f64> for Number {
    fn from(val: f64) -> Self {
        Self::new(val)
    }
}

impl From<i64> for Number {
    fn from(val: i64) -> Self {
        Self::new(val as f64)
    }
}

impl From<i32> for Number {
    fn from(val: i32) -> Self {
        Self::new(f64::from(val))
    }
}
