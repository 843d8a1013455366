use super::error::InputError;
use rust_decimal::Decimal;

pub const MONTHS: usize = 12;

/// Monthly salary figures for one tax year
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MonthlyFigures {
    /// One figure paid in each of the 12 months
    Uniform(Decimal),
    /// A separate figure per month, January first
    Itemized([Decimal; MONTHS]),
}

impl MonthlyFigures {
    /// Build itemized figures from up to 12 values; missing months are 0.
    pub fn itemized(amounts: &[Decimal]) -> Result<Self, InputError> {
        if amounts.len() > MONTHS {
            return Err(InputError::TooManyMonths(amounts.len()));
        }
        let mut months = [Decimal::ZERO; MONTHS];
        months[..amounts.len()].copy_from_slice(amounts);
        Ok(MonthlyFigures::Itemized(months))
    }

    /// The figure paid in each month of the year
    pub fn effective_months(&self) -> [Decimal; MONTHS] {
        match self {
            MonthlyFigures::Uniform(amount) => [*amount; MONTHS],
            MonthlyFigures::Itemized(months) => *months,
        }
    }
}

/// Check that `amount` is a non-negative whole yen figure
pub fn validate_amount(field: &str, amount: Decimal) -> Result<Decimal, InputError> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(InputError::Negative {
            field: field.to_string(),
            amount,
        });
    }
    if !amount.fract().is_zero() {
        return Err(InputError::Fractional {
            field: field.to_string(),
            amount,
        });
    }
    Ok(amount)
}

/// Combine monthly figures and the two bonuses into the yearly salary
pub fn aggregate(
    monthly: &MonthlyFigures,
    bonus1: Decimal,
    bonus2: Decimal,
) -> Result<Decimal, InputError> {
    let salary = match monthly {
        MonthlyFigures::Uniform(amount) => validate_amount("monthly", *amount)?
            .checked_mul(Decimal::from(MONTHS))
            .ok_or_else(|| too_large("monthly"))?,
        MonthlyFigures::Itemized(months) => {
            let mut total = Decimal::ZERO;
            for (i, amount) in months.iter().enumerate() {
                let field = format!("month {}", i + 1);
                let amount = validate_amount(&field, *amount)?;
                total = total.checked_add(amount).ok_or_else(|| too_large(&field))?;
            }
            total
        }
    };
    let bonus1 = validate_amount("bonus1", bonus1)?;
    let bonus2 = validate_amount("bonus2", bonus2)?;

    let yearly = salary
        .checked_add(bonus1)
        .and_then(|s| s.checked_add(bonus2))
        .ok_or_else(|| too_large("yearly salary"))?;
    Ok(yearly.normalize())
}

fn too_large(field: &str) -> InputError {
    InputError::TooLarge {
        field: field.to_string(),
    }
}
