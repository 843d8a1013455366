//! Statutory employment income deduction tables and JSON rule files

use super::brackets::{BracketTable, Formula, IncomeBracket};
use super::error::TableError;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};

/// Japanese tax year, which runs with the calendar year
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaxYear(pub i32);

impl TaxYear {
    /// Year the calculator assumes when none is given
    pub const DEFAULT: TaxYear = TaxYear(2024);

    /// Display as "2024 (R6)"
    pub fn display(&self) -> String {
        // Reiwa 1 is 2019
        if self.0 >= 2019 {
            format!("{} (R{})", self.0, self.0 - 2018)
        } else {
            self.0.to_string()
        }
    }
}

impl std::fmt::Display for TaxYear {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display())
    }
}

const fn upto(bound: Decimal, formula: Formula) -> IncomeBracket {
    IncomeBracket {
        upper_bound: Some(bound),
        formula,
    }
}

const fn rest(formula: Formula) -> IncomeBracket {
    IncomeBracket {
        upper_bound: None,
        formula,
    }
}

const fn flat(amount: Decimal) -> Formula {
    Formula::Flat { amount }
}

const fn linear(rate: Decimal, deduct: Decimal) -> Formula {
    Formula::Linear { rate, deduct }
}

const fn quarter(multiplier: Decimal, deduct: Decimal) -> Formula {
    Formula::Quarter { multiplier, deduct }
}

/// Schedule in force from 2020 (R2) to 2024 (R6): 550,000 minimum deduction
/// and the flat notches between 1,619,000 and 1,627,999
const FROM_2020: &[IncomeBracket] = &[
    upto(dec!(550999), flat(dec!(0))),
    upto(dec!(1618999), linear(dec!(1), dec!(550000))),
    upto(dec!(1619999), flat(dec!(1069000))),
    upto(dec!(1621999), flat(dec!(1070000))),
    upto(dec!(1623999), flat(dec!(1072000))),
    upto(dec!(1627999), flat(dec!(1074000))),
    upto(dec!(1799999), quarter(dec!(2.4), dec!(100000))),
    upto(dec!(3599999), quarter(dec!(2.8), dec!(80000))),
    upto(dec!(6599999), quarter(dec!(3.2), dec!(440000))),
    upto(dec!(8499999), linear(dec!(0.9), dec!(1100000))),
    rest(linear(dec!(1), dec!(1950000))),
];

/// Schedule from 2025 (R7): minimum deduction raised to 650,000, which
/// absorbs the notches and the 2.4 bracket
const FROM_2025: &[IncomeBracket] = &[
    upto(dec!(650999), flat(dec!(0))),
    upto(dec!(1899999), linear(dec!(1), dec!(650000))),
    upto(dec!(3599999), quarter(dec!(2.8), dec!(80000))),
    upto(dec!(6599999), quarter(dec!(3.2), dec!(440000))),
    upto(dec!(8499999), linear(dec!(0.9), dec!(1100000))),
    rest(linear(dec!(1), dec!(1950000))),
];

/// The statutory deduction table for `year`
pub fn statutory(year: TaxYear) -> Result<BracketTable, TableError> {
    let brackets = match year.0 {
        2025.. => FROM_2025,
        2020..=2024 => FROM_2020,
        _ => return Err(TableError::UnsupportedTaxYear(year.0)),
    };
    BracketTable::new(year, brackets.to_vec())
}

/// JSON rule file format
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct RuleFile {
    /// Tax year the schedule applies to
    pub tax_year: i32,
    /// Brackets in ascending order of upper bound; the last has no bound
    pub brackets: Vec<IncomeBracket>,
}

impl From<&BracketTable> for RuleFile {
    fn from(table: &BracketTable) -> Self {
        RuleFile {
            tax_year: table.tax_year().0,
            brackets: table.brackets().to_vec(),
        }
    }
}

/// Load and validate a rule file
pub fn load<R: Read>(reader: R) -> anyhow::Result<BracketTable> {
    let file: RuleFile = serde_json::from_reader(reader)?;
    let count = file.brackets.len();
    let table = BracketTable::new(TaxYear(file.tax_year), file.brackets)?;
    log::info!("Loaded {} brackets for tax year {}", count, table.tax_year());
    Ok(table)
}

/// Write `table` in the rule file format
pub fn save<W: Write>(table: &BracketTable, writer: W) -> anyhow::Result<()> {
    serde_json::to_writer_pretty(writer, &RuleFile::from(table))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval(table: &BracketTable, salary: i64) -> Decimal {
        table.evaluate(Decimal::from(salary)).unwrap()
    }

    fn table_2024() -> BracketTable {
        statutory(TaxYear(2024)).unwrap()
    }

    #[test]
    fn statutory_tables_are_valid() {
        for year in 2020..=2030 {
            assert!(statutory(TaxYear(year)).is_ok(), "tax year {}", year);
        }
    }

    #[test]
    fn years_before_2020_unsupported() {
        assert_eq!(
            statutory(TaxYear(2019)),
            Err(TableError::UnsupportedTaxYear(2019))
        );
    }

    #[test]
    fn zero_bracket_boundary() {
        let table = table_2024();
        assert_eq!(eval(&table, 0), dec!(0));
        assert_eq!(eval(&table, 550_999), dec!(0));
        assert_eq!(eval(&table, 551_000), dec!(1000));
    }

    #[test]
    fn flat_notch_jump() {
        let table = table_2024();
        assert_eq!(eval(&table, 1_618_999), dec!(1068999));
        assert_eq!(eval(&table, 1_619_000), dec!(1069000));
        assert_eq!(eval(&table, 1_619_999), dec!(1069000));
    }

    #[test]
    fn flat_notches_are_constant() {
        let table = table_2024();
        for (low, high, expected) in [
            (1_620_000, 1_621_999, dec!(1070000)),
            (1_622_000, 1_623_999, dec!(1072000)),
            (1_624_000, 1_627_999, dec!(1074000)),
        ] {
            assert_eq!(eval(&table, low), expected);
            assert_eq!(eval(&table, (low + high) / 2), expected);
            assert_eq!(eval(&table, high), expected);
        }
    }

    #[test]
    fn quarter_bracket_at_2_4() {
        let table = table_2024();
        // floor(1,628,000 / 4,000) * 1,000 = 407,000
        assert_eq!(eval(&table, 1_628_000), dec!(876800));
        assert_eq!(eval(&table, 1_799_999), dec!(977600));
    }

    #[test]
    fn first_bracket_at_or_above_salary_wins() {
        let table = table_2024();
        assert_eq!(table.locate(dec!(1799999)).unwrap().0, 6);
        assert_eq!(table.locate(dec!(1800000)).unwrap().0, 7);
        // 450,000 * 2.8 - 80,000, not 450,000 * 2.4 - 100,000
        assert_eq!(eval(&table, 1_800_000), dec!(1180000));
    }

    #[test]
    fn salary_truncated_to_4000_step() {
        let table = table_2024();
        assert_eq!(eval(&table, 1_800_003), eval(&table, 1_800_000));
        assert_eq!(eval(&table, 1_803_999), dec!(1180000));
        assert_eq!(eval(&table, 1_804_000), dec!(1182800));
    }

    #[test]
    fn upper_brackets() {
        let table = table_2024();
        assert_eq!(eval(&table, 3_600_000), dec!(2440000));
        assert_eq!(eval(&table, 6_599_999), dec!(4836800));
        assert_eq!(eval(&table, 6_600_000), dec!(4840000));
        assert_eq!(eval(&table, 8_499_999), dec!(6549999.1));
        assert_eq!(eval(&table, 8_500_000), dec!(6550000));
        assert_eq!(eval(&table, 10_000_000), dec!(8050000));
    }

    #[test]
    fn monotonic_within_closed_form_regions() {
        let table = table_2024();
        for (low, high) in [
            (0, 550_999),
            (551_000, 1_618_999),
            (1_628_000, 1_799_999),
            (1_800_000, 3_599_999),
            (3_600_000, 6_599_999),
            (6_600_000, 8_499_999),
            (8_500_000, 20_000_000),
        ] {
            let mut previous = eval(&table, low);
            for salary in (low..=high).step_by(997) {
                let income = eval(&table, salary);
                assert!(income >= previous, "salary {}", salary);
                previous = income;
            }
        }
    }

    #[test]
    fn schedule_from_2025() {
        let table = statutory(TaxYear(2025)).unwrap();
        assert_eq!(eval(&table, 650_999), dec!(0));
        assert_eq!(eval(&table, 651_000), dec!(1000));
        assert_eq!(eval(&table, 1_619_000), dec!(969000));
        assert_eq!(eval(&table, 1_899_999), dec!(1249999));
        assert_eq!(eval(&table, 1_900_000), dec!(1250000));
        assert_eq!(eval(&table, 3_100_000), dec!(2090000));
    }

    #[test]
    fn rule_file_round_trip() {
        let table = table_2024();
        let mut buf = Vec::new();
        save(&table, &mut buf).unwrap();
        let loaded = load(buf.as_slice()).unwrap();
        assert_eq!(loaded, table);
    }

    #[test]
    fn rule_file_accepts_plain_numbers() {
        let json = r#"{
            "tax_year": 2024,
            "brackets": [
                { "upper_bound": 999, "formula": { "kind": "flat", "amount": 0 } },
                { "formula": { "kind": "quarter", "multiplier": 2.8, "deduct": 80000 } }
            ]
        }"#;
        let table = load(json.as_bytes()).unwrap();
        assert_eq!(table.brackets().len(), 2);
        assert_eq!(eval(&table, 3_100_000), dec!(2090000));
    }

    #[test]
    fn rule_file_without_unbounded_bracket_rejected() {
        let json = r#"{
            "tax_year": 2024,
            "brackets": [
                { "upper_bound": 999, "formula": { "kind": "flat", "amount": 0 } }
            ]
        }"#;
        let err = load(json.as_bytes()).unwrap_err();
        assert_eq!(
            err.downcast_ref::<TableError>(),
            Some(&TableError::NotExhaustive)
        );
    }

    #[test]
    fn tax_year_display() {
        assert_eq!(TaxYear(2024).display(), "2024 (R6)");
        assert_eq!(TaxYear(2019).display(), "2019 (R1)");
        assert_eq!(TaxYear(2010).display(), "2010");
    }
}
