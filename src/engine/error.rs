use rust_decimal::Decimal;

/// A salary or bonus figure that cannot be used as-is.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum InputError {
    #[error("{field} must not be negative: {amount}")]
    Negative { field: String, amount: Decimal },
    #[error("{field} must be a whole yen amount: {amount}")]
    Fractional { field: String, amount: Decimal },
    #[error("{field} is too large")]
    TooLarge { field: String },
    #[error("at most 12 monthly figures can be given, got {0}")]
    TooManyMonths(usize),
    #[error("enter a number, e.g. 250000 (got '{0}')")]
    Unparseable(String),
}

/// The bracket table does not describe a usable schedule.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TableError {
    #[error("bracket table is empty")]
    Empty,
    #[error("bracket {index} has a negative upper bound")]
    NegativeBound { index: usize },
    #[error("bracket {index} upper bound is not above the previous bracket")]
    BoundsNotIncreasing { index: usize },
    #[error("bracket {index} is unbounded but is not the last bracket")]
    UnboundedBeforeEnd { index: usize },
    #[error("last bracket must be unbounded")]
    NotExhaustive,
    #[error("yearly salary {0} is negative")]
    NegativeSalary(Decimal),
    #[error("bracket formula overflowed for yearly salary {0}")]
    Overflow(Decimal),
    #[error("no bracket matched yearly salary {0}")]
    NoMatchingBracket(Decimal),
    #[error("no statutory deduction table for tax year {0}")]
    UnsupportedTaxYear(i32),
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CalcError {
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InputError),
    #[error("configuration error: {0}")]
    Configuration(#[from] TableError),
}
