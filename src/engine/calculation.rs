use super::brackets::BracketTable;
use super::error::CalcError;
use super::salary::{aggregate, MonthlyFigures};
use rust_decimal::Decimal;

/// Outcome of one calculation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalculationResult {
    /// 年間給与金額
    pub yearly_salary: Decimal,
    /// 給与所得金額, rounded down to the yen
    pub taxable_income: Decimal,
}

/// Aggregate the salary inputs and evaluate them against `table`
pub fn calculate(
    table: &BracketTable,
    monthly: &MonthlyFigures,
    bonus1: Decimal,
    bonus2: Decimal,
) -> Result<CalculationResult, CalcError> {
    let yearly_salary = aggregate(monthly, bonus1, bonus2)?;
    let taxable_income = table.evaluate(yearly_salary)?.floor();
    Ok(CalculationResult {
        yearly_salary,
        taxable_income,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::error::InputError;
    use crate::engine::rules::{statutory, TaxYear};
    use rust_decimal_macros::dec;

    fn table() -> BracketTable {
        statutory(TaxYear(2024)).unwrap()
    }

    #[test]
    fn uniform_salary_with_bonus() {
        let result = calculate(
            &table(),
            &MonthlyFigures::Uniform(dec!(250000)),
            dec!(100000),
            dec!(0),
        )
        .unwrap();

        // floor(3,100,000 / 4,000) * 1,000 * 2.8 - 80,000
        assert_eq!(
            result,
            CalculationResult {
                yearly_salary: dec!(3100000),
                taxable_income: dec!(2090000),
            }
        );
    }

    #[test]
    fn itemized_salary_with_both_bonuses() {
        let mut months = vec![dec!(300000); 12];
        months[3] = dec!(320000);
        months[11] = dec!(0);
        let monthly = MonthlyFigures::itemized(&months).unwrap();

        let result = calculate(&table(), &monthly, dec!(450000), dec!(550000)).unwrap();

        // 3,320,000 + 1,000,000 = 4,320,000 -> 1,080,000 * 3.2 - 440,000
        assert_eq!(result.yearly_salary, dec!(4320000));
        assert_eq!(result.taxable_income, dec!(3016000));
    }

    #[test]
    fn fractional_income_is_floored() {
        let result = calculate(
            &table(),
            &MonthlyFigures::itemized(&[dec!(8499999)]).unwrap(),
            dec!(0),
            dec!(0),
        )
        .unwrap();
        assert_eq!(result.taxable_income, dec!(6549999));
    }

    #[test]
    fn small_salary_has_no_taxable_income() {
        let result = calculate(
            &table(),
            &MonthlyFigures::Uniform(dec!(45000)),
            dec!(0),
            dec!(0),
        )
        .unwrap();
        assert_eq!(result.yearly_salary, dec!(540000));
        assert_eq!(result.taxable_income, dec!(0));
    }

    #[test]
    fn invalid_input_is_reported_before_evaluation() {
        let err = calculate(
            &table(),
            &MonthlyFigures::Uniform(dec!(-250000)),
            dec!(0),
            dec!(0),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            CalcError::InvalidInput(InputError::Negative { .. })
        ));
    }

    #[test]
    fn oversized_input_is_rejected_before_evaluation() {
        let err = calculate(
            &table(),
            &MonthlyFigures::Uniform(dec!(9999999999999999999999999999)),
            dec!(0),
            dec!(0),
        )
        .unwrap_err();
        assert_eq!(
            err,
            CalcError::InvalidInput(InputError::TooLarge {
                field: "monthly".to_string()
            })
        );
    }
}
