//! Meal counts.
//!
//! A member eats up to three meals a day and half meals are allowed, so a
//! count is stored as a whole number of **halves** to keep sums exact.

use std::{
    fmt,
    iter::Sum,
    ops::{Add, AddAssign},
    str::FromStr,
};

use serde::{Deserialize, Serialize};

use crate::EngineError;

/// Non-negative number of meals in steps of one half.
///
/// ```rust
/// use engine::MealCount;
///
/// let count: MealCount = "1.5".parse().unwrap();
/// assert_eq!(count.halves(), 3);
/// assert_eq!(count.to_string(), "1.5");
/// assert!("0.3".parse::<MealCount>().is_err());
/// ```
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(into = "f64", try_from = "f64")]
pub struct MealCount(i64);

impl MealCount {
    pub const ZERO: MealCount = MealCount(0);

    /// Build a count from a number of half meals.
    ///
    /// # Errors
    ///
    /// [`EngineError::InvalidAmount`] when `halves` is negative.
    pub fn from_halves(halves: i64) -> Result<Self, EngineError> {
        if halves < 0 {
            return Err(EngineError::InvalidAmount(
                "meal count must be >= 0".to_string(),
            ));
        }
        Ok(Self(halves))
    }

    /// Whole meals, without validation. Used for literals in tests and docs.
    #[must_use]
    pub const fn whole(meals: u32) -> Self {
        Self(meals as i64 * 2)
    }

    #[must_use]
    pub const fn halves(self) -> i64 {
        self.0
    }

    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Meals as a real number, the weight handed to the allocation engine.
    #[must_use]
    pub fn as_f64(self) -> f64 {
        self.0 as f64 / 2.0
    }
}

impl fmt::Display for MealCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 % 2 == 0 {
            write!(f, "{}", self.0 / 2)
        } else {
            write!(f, "{}.5", self.0 / 2)
        }
    }
}

impl Add for MealCount {
    type Output = MealCount;

    fn add(self, rhs: MealCount) -> Self::Output {
        MealCount(self.0 + rhs.0)
    }
}

impl AddAssign for MealCount {
    fn add_assign(&mut self, rhs: MealCount) {
        self.0 += rhs.0;
    }
}

impl Sum for MealCount {
    fn sum<I: Iterator<Item = MealCount>>(iter: I) -> Self {
        iter.fold(MealCount::ZERO, Add::add)
    }
}

impl From<MealCount> for f64 {
    fn from(value: MealCount) -> Self {
        value.as_f64()
    }
}

impl TryFrom<f64> for MealCount {
    type Error = EngineError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        if !value.is_finite() || value < 0.0 {
            return Err(EngineError::InvalidAmount(format!(
                "meal count must be >= 0, got {value}"
            )));
        }
        let halves = value * 2.0;
        if halves.fract() != 0.0 {
            return Err(EngineError::InvalidAmount(format!(
                "meal count must be a multiple of 0.5, got {value}"
            )));
        }
        Self::from_halves(halves as i64)
    }
}

impl FromStr for MealCount {
    type Err = EngineError;

    /// Parses `"2"`, `"1.5"` or `"0,5"`. An empty string is zero meals.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || EngineError::InvalidAmount(format!("invalid meal count: {s}"));

        let trimmed = s.trim().replace(',', ".");
        if trimmed.is_empty() {
            return Ok(MealCount::ZERO);
        }

        let (whole, frac) = match trimmed.split_once('.') {
            Some((whole, frac)) => (whole, frac),
            None => (trimmed.as_str(), ""),
        };
        if whole.is_empty() || !whole.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }
        let whole: i64 = whole.parse().map_err(|_| invalid())?;
        let half = match frac.trim_end_matches('0') {
            "" => 0,
            "5" => 1,
            _ => return Err(invalid()),
        };

        whole
            .checked_mul(2)
            .and_then(|v| v.checked_add(half))
            .ok_or_else(invalid)
            .and_then(Self::from_halves)
    }
}

/// Meals of one member on one day.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayMeals {
    pub breakfast: MealCount,
    pub lunch: MealCount,
    pub dinner: MealCount,
}

impl DayMeals {
    pub fn new(breakfast: MealCount, lunch: MealCount, dinner: MealCount) -> Self {
        Self {
            breakfast,
            lunch,
            dinner,
        }
    }

    #[must_use]
    pub fn total(&self) -> MealCount {
        self.breakfast + self.lunch + self.dinner
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total().is_zero()
    }
}
