//! Exact fixed-point token amounts.
//!
//! An [`Amount`] is an integer scaled by `10^decimals`, the same representation ERC-20 tokens
//! use on chain. Formatting and parsing go through the decimal digit string so no precision
//! is lost for supplies beyond the `f64` mantissa.

use std::{fmt, str::FromStr};

use alloy::primitives::U256;

use crate::Error;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Amount {
    value: U256,
    decimals: u8,
}

impl Amount {
    pub const ZERO: Amount = Amount {
        value: U256::ZERO,
        decimals: 0,
    };

    pub fn new(value: U256, decimals: u8) -> Self {
        Self { value, decimals }
    }

    pub fn value(&self) -> U256 {
        self.value
    }

    pub fn decimals(&self) -> u8 {
        self.decimals
    }

    pub fn is_zero(&self) -> bool {
        self.value.is_zero()
    }

    /// Same amount expressed with more fractional digits. `None` on overflow or when
    /// `decimals` is lower than the current scale.
    pub fn rescale(&self, decimals: u8) -> Option<Amount> {
        let diff = decimals.checked_sub(self.decimals)?;
        let value = self.value.checked_mul(pow10(diff)?)?;
        Some(Amount { value, decimals })
    }

    pub fn checked_add(&self, other: &Amount) -> Option<Amount> {
        let decimals = self.decimals.max(other.decimals);
        let a = self.rescale(decimals)?;
        let b = other.rescale(decimals)?;
        Some(Amount {
            value: a.value.checked_add(b.value)?,
            decimals,
        })
    }

    pub fn checked_mul(&self, other: &Amount) -> Option<Amount> {
        Some(Amount {
            value: self.value.checked_mul(other.value)?,
            decimals: self.decimals.checked_add(other.decimals)?,
        })
    }

    /// Rounds half-up to `decimals` fractional digits, padding with zeros when the amount
    /// has fewer.
    pub fn round_dp(&self, decimals: u8) -> Option<Amount> {
        if self.decimals <= decimals {
            return self.rescale(decimals);
        }

        let divisor = pow10(self.decimals - decimals)?;
        let mut value = self.value / divisor;
        let remainder = self.value % divisor;
        if remainder.checked_mul(U256::from(2u8))? >= divisor {
            value = value.checked_add(U256::from(1u8))?;
        }

        Some(Amount { value, decimals })
    }

    /// Drops trailing fractional zeros, so `1.500` becomes `1.5` and `100.00` becomes `100`.
    pub fn normalized(&self) -> Amount {
        let ten = U256::from(10u8);
        let mut value = self.value;
        let mut decimals = self.decimals;
        while decimals > 0 && (value % ten).is_zero() {
            value /= ten;
            decimals -= 1;
        }
        Amount { value, decimals }
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_units_fixed(self.value, self.decimals))
    }
}

impl FromStr for Amount {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || Error::InvalidDecimal(s.to_string());

        let (integer, fraction) = match s.split_once('.') {
            Some((integer, fraction)) => (integer, fraction),
            None => (s, ""),
        };
        let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if integer.is_empty()
            || !all_digits(integer)
            || !all_digits(fraction)
            || (s.contains('.') && fraction.is_empty())
        {
            return Err(invalid());
        }

        let decimals = u8::try_from(fraction.len()).map_err(|_| invalid())?;
        let value = U256::from_str_radix(&format!("{integer}{fraction}"), 10)
            .map_err(|_| invalid())?;

        Ok(Amount { value, decimals })
    }
}

fn pow10(exp: u8) -> Option<U256> {
    U256::from(10u8).checked_pow(U256::from(exp))
}

/// Renders `raw / 10^decimals` with exactly `decimals` fractional digits. No fractional part
/// is printed when `decimals` is zero.
pub fn format_units_fixed(raw: U256, decimals: u8) -> String {
    let digits = raw.to_string();
    let decimals = decimals as usize;
    if decimals == 0 {
        return digits;
    }

    let padded = if digits.len() <= decimals {
        format!("{}{digits}", "0".repeat(decimals + 1 - digits.len()))
    } else {
        digits
    };
    let (integer, fraction) = padded.split_at(padded.len() - decimals);
    format!("{integer}.{fraction}")
}

/// Parses an integer as returned by token APIs and nodes: `0x`-prefixed hex or plain base-10.
pub fn parse_raw_integer(s: &str) -> crate::Result<U256> {
    let trimmed = s.trim();
    let invalid = || Error::InvalidInteger(s.to_string());

    let (digits, radix) = match trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
    {
        Some(hex) => (hex, 16),
        None => (trimmed, 10),
    };
    let valid = match radix {
        16 => digits.bytes().all(|b| b.is_ascii_hexdigit()),
        _ => digits.bytes().all(|b| b.is_ascii_digit()),
    };
    if digits.is_empty() || !valid {
        return Err(invalid());
    }

    U256::from_str_radix(digits, radix).map_err(|_| invalid())
}
