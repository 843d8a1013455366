use super::error::{CalcError, TableError};
use super::rules::TaxYear;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Salary is truncated to this step before the quarter brackets scale it
const QUARTER_STEP: Decimal = dec!(4000);
/// A quarter of one step
const QUARTER_UNIT: Decimal = dec!(1000);

/// How a bracket turns the yearly salary `s` into taxable income
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Formula {
    /// Constant result regardless of salary
    Flat {
        #[schemars(with = "f64")]
        amount: Decimal,
    },
    /// `s * rate - deduct`
    Linear {
        #[schemars(with = "f64")]
        rate: Decimal,
        #[schemars(with = "f64")]
        deduct: Decimal,
    },
    /// `floor(s / 4000) * 1000 * multiplier - deduct`
    Quarter {
        #[schemars(with = "f64")]
        multiplier: Decimal,
        #[schemars(with = "f64")]
        deduct: Decimal,
    },
}

impl Formula {
    /// Taxable income for `salary`, or `None` if the result is not representable
    pub fn apply(&self, salary: Decimal) -> Option<Decimal> {
        match *self {
            Formula::Flat { amount } => Some(amount),
            Formula::Linear { rate, deduct } => salary.checked_mul(rate)?.checked_sub(deduct),
            Formula::Quarter { multiplier, deduct } => {
                // integer truncation, not rounding
                let quarter = (salary / QUARTER_STEP).trunc().checked_mul(QUARTER_UNIT)?;
                quarter.checked_mul(multiplier)?.checked_sub(deduct)
            }
        }
    }
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Formula::Flat { amount } => write!(f, "{}", amount),
            Formula::Linear { rate, deduct } if *rate == Decimal::ONE => {
                write!(f, "s - {}", deduct)
            }
            Formula::Linear { rate, deduct } => write!(f, "s x {} - {}", rate, deduct),
            Formula::Quarter { multiplier, deduct } => write!(
                f,
                "floor(s / {}) x {} x {} - {}",
                QUARTER_STEP, QUARTER_UNIT, multiplier, deduct
            ),
        }
    }
}

/// One row of the deduction schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct IncomeBracket {
    /// Largest yearly salary (inclusive) the bracket covers; absent for the last one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(with = "Option<f64>")]
    pub upper_bound: Option<Decimal>,
    pub formula: Formula,
}

impl IncomeBracket {
    pub fn covers(&self, salary: Decimal) -> bool {
        self.upper_bound.is_none_or(|bound| salary <= bound)
    }
}

/// An ordered, exhaustive deduction schedule for one tax year
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BracketTable {
    tax_year: TaxYear,
    brackets: Vec<IncomeBracket>,
}

impl BracketTable {
    /// Validate `brackets` into a table. Bounds must be strictly increasing and
    /// the last bracket, only the last, must be unbounded.
    pub fn new(tax_year: TaxYear, brackets: Vec<IncomeBracket>) -> Result<Self, TableError> {
        if brackets.is_empty() {
            return Err(TableError::Empty);
        }

        let last = brackets.len() - 1;
        let mut previous: Option<Decimal> = None;
        for (index, bracket) in brackets.iter().enumerate() {
            match bracket.upper_bound {
                Some(bound) => {
                    if bound.is_sign_negative() && !bound.is_zero() {
                        return Err(TableError::NegativeBound { index });
                    }
                    if previous.is_some_and(|p| bound <= p) {
                        return Err(TableError::BoundsNotIncreasing { index });
                    }
                    previous = Some(bound);
                }
                None if index != last => return Err(TableError::UnboundedBeforeEnd { index }),
                None => {}
            }
        }
        if brackets[last].upper_bound.is_some() {
            return Err(TableError::NotExhaustive);
        }

        Ok(BracketTable { tax_year, brackets })
    }

    pub fn tax_year(&self) -> TaxYear {
        self.tax_year
    }

    pub fn brackets(&self) -> &[IncomeBracket] {
        &self.brackets
    }

    /// Find the first bracket whose upper bound is at or above `salary`
    pub fn locate(&self, salary: Decimal) -> Result<(usize, &IncomeBracket), CalcError> {
        if salary.is_sign_negative() && !salary.is_zero() {
            return Err(TableError::NegativeSalary(salary).into());
        }
        self.brackets
            .iter()
            .enumerate()
            .find(|(_, bracket)| bracket.covers(salary))
            .ok_or_else(|| TableError::NoMatchingBracket(salary).into())
    }

    /// Taxable income for `salary`, before rounding to whole yen
    pub fn evaluate(&self, salary: Decimal) -> Result<Decimal, CalcError> {
        let (index, bracket) = self.locate(salary)?;
        let income = bracket
            .formula
            .apply(salary)
            .ok_or(TableError::Overflow(salary))?;
        log::debug!(
            "Salary {} matched bracket {} (<= {}): {} = {}",
            salary,
            index,
            bracket
                .upper_bound
                .map_or("unbounded".to_string(), |b| b.to_string()),
            bracket.formula,
            income
        );
        Ok(income)
    }
}
