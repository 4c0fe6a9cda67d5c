//! Amount type for handling payout values with optional dollar signs.
//!
//! This module provides the `Amount` type which wraps `Decimal` and handles parsing payout text
//! that may or may not include a dollar sign and thousands separators. Parsing is lenient: text
//! that does not start with a number is worth zero.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Serialize, Serializer};
use std::convert::Infallible;
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign};
use std::str::FromStr;

/// Represents a dollar amount.
///
/// Sums of `Amount` values are exact, so totals do not depend on the order in which entries are
/// accumulated.
///
/// # Examples
///
/// ```
/// # use earnings_tracker::model::Amount;
/// # use std::str::FromStr;
/// let amount = Amount::from_str("$1,234.50").unwrap();
/// assert_eq!(amount.to_string(), "$1,234.50");
///
/// let garbage = Amount::from_str("n/a").unwrap();
/// assert!(garbage.is_zero());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount(Decimal);

impl Amount {
    pub const ZERO: Amount = Amount(Decimal::ZERO);

    /// Creates a new Amount from a Decimal value.
    pub const fn new(value: Decimal) -> Self {
        Self(value)
    }

    /// Returns the underlying Decimal value.
    pub fn value(&self) -> Decimal {
        self.0
    }

    /// Returns the value as a float, for rate computations and charting.
    pub fn to_f64(&self) -> f64 {
        self.0.to_f64().unwrap_or_default()
    }

    /// Returns true if the amount is zero.
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Returns true if the amount is negative.
    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.is_zero()
    }

    /// Rounds to cents, half away from zero.
    pub fn round_cents(&self) -> Decimal {
        self.0
            .round_dp_with_strategy(2, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
    }
}

/// Strips `$` and `,` from `text` and reads the longest leading decimal number, including an
/// exponent such as `1.5e3`. Anything that does not start with a number (after whitespace) is
/// zero, and so is a number too large or too precise for `Decimal`.
pub fn parse_currency(text: &str) -> Decimal {
    let cleaned: String = text.chars().filter(|c| *c != '$' && *c != ',').collect();
    match numeric_prefix(cleaned.trim_start()) {
        Some(number) if number.contains('e') => {
            Decimal::from_scientific(&number).unwrap_or_default()
        }
        Some(number) => Decimal::from_str(&number).unwrap_or_default(),
        None => Decimal::ZERO,
    }
}

/// Returns the leading `[+-]digits[.digits][e[+-]digits]` portion of `s`, normalized so that
/// `Decimal` can read it, or `None` when `s` does not begin with a number.
fn numeric_prefix(s: &str) -> Option<String> {
    let mut out = String::new();
    let mut chars = s.chars().peekable();
    if let Some(&sign) = chars.peek() {
        if sign == '-' || sign == '+' {
            if sign == '-' {
                out.push('-');
            }
            chars.next();
        }
    }

    let mut int_digits = 0;
    while let Some(&c) = chars.peek() {
        if !c.is_ascii_digit() {
            break;
        }
        out.push(c);
        int_digits += 1;
        chars.next();
    }

    let mut frac_digits = 0;
    if chars.peek() == Some(&'.') {
        chars.next();
        let mut frac = String::new();
        while let Some(&c) = chars.peek() {
            if !c.is_ascii_digit() {
                break;
            }
            frac.push(c);
            frac_digits += 1;
            chars.next();
        }
        if frac_digits > 0 {
            if int_digits == 0 {
                out.push('0');
            }
            out.push('.');
            out.push_str(&frac);
        }
    }

    if int_digits == 0 && frac_digits == 0 {
        return None;
    }

    // The exponent only counts when at least one digit follows it
    if matches!(chars.peek(), Some(&('e' | 'E'))) {
        let rest: String = chars.skip(1).collect();
        let (sign, digits) = match rest.strip_prefix(['-', '+']) {
            Some(stripped) => (&rest[..1], stripped),
            None => ("", rest.as_str()),
        };
        let exp: String = digits.chars().take_while(char::is_ascii_digit).collect();
        if !exp.is_empty() {
            out.push('e');
            if sign == "-" {
                out.push('-');
            }
            out.push_str(&exp);
        }
    }
    Some(out)
}

impl FromStr for Amount {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Amount(parse_currency(s)))
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.is_negative() { "-" } else { "" };
        let num = self.round_cents().abs();
        let formatted = format_num::format_num!(",.2", num.to_f64().unwrap_or_default());
        f.pad(&format!("{sign}${formatted}"))
    }
}

impl Add for Amount {
    type Output = Amount;

    fn add(self, rhs: Self) -> Self::Output {
        Amount(self.0 + rhs.0)
    }
}

impl AddAssign for Amount {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Amount::ZERO, |acc, a| acc + a)
    }
}

impl<'a> Sum<&'a Amount> for Amount {
    fn sum<I: Iterator<Item = &'a Amount>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        // Presentation consumers get a plain number of dollars
        serializer.serialize_f64(self.to_f64())
    }
}

impl From<Decimal> for Amount {
    fn from(value: Decimal) -> Self {
        Amount::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.value()
    }
}
