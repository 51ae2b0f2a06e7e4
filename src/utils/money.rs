//! Conversions between major currency units (pounds) and the integral minor
//! units (pence) the payment provider works in.

use bigdecimal::{BigDecimal, Signed, ToPrimitive};
use num_bigint::BigInt;
use serde::{ser::Error, Serializer};

const MINOR_UNITS_SCALE: i64 = 2;

/// `round(amount * 100)`, half away from zero.
pub fn to_minor_units(amount: &BigDecimal) -> Option<i64> {
    let scaled = amount * BigDecimal::from(100);
    let half = BigDecimal::new(BigInt::from(5), 1);
    let rounded = if scaled.is_negative() {
        scaled - half
    } else {
        scaled + half
    };

    rounded.with_scale(0).to_i64()
}

pub fn from_minor_units(amount: i64) -> BigDecimal {
    BigDecimal::new(BigInt::from(amount), MINOR_UNITS_SCALE)
}

pub fn zero() -> BigDecimal {
    from_minor_units(0)
}

/// Renders an amount as pounds for customer facing text, e.g. `£12.50`.
pub fn format_gbp(amount: &BigDecimal) -> String {
    match to_minor_units(amount) {
        Some(pence) => {
            let sign = if pence < 0 { "-" } else { "" };
            let pence = pence.abs();
            format!("{}£{}.{:02}", sign, pence / 100, pence % 100)
        }
        None => format!("£{}", amount),
    }
}

/// `serialize_with` helper writing an amount as a JSON number (`32.5`)
/// rather than the string `BigDecimal` produces by default.
pub fn serialize_as_number<S>(amount: &BigDecimal, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match amount.to_f64() {
        Some(value) => serializer.serialize_f64(value),
        None => Err(S::Error::custom(format!("{} is not representable", amount))),
    }
}
