//! Calc command - taxable employment income for one person

use crate::cmd::amount::{format_yen, parse_amount};
use crate::cmd::TableArgs;
use clap::Args;
use nencho::engine::{calculate, BracketTable, CalculationResult, IncomeBracket, MonthlyFigures};
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Args, Debug)]
pub struct CalcCommand {
    /// Salary paid in each of the 12 months (e.g. 250,000)
    #[arg(short, long, value_parser = parse_amount, conflicts_with = "months")]
    monthly: Option<Decimal>,

    /// Salary for each month separately, January first; missing months are 0
    #[arg(long, value_parser = parse_amount, num_args = 1..)]
    months: Vec<Decimal>,

    /// First bonus
    #[arg(long, value_parser = parse_amount, default_value = "0")]
    bonus1: Decimal,

    /// Second bonus
    #[arg(long, value_parser = parse_amount, default_value = "0")]
    bonus2: Decimal,

    #[command(flatten)]
    table: TableArgs,

    /// Show which bracket was applied
    #[arg(long)]
    explain: bool,

    /// Output as JSON instead of formatted text
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Serialize)]
struct CalcOutput {
    tax_year: i32,
    yearly_salary: Decimal,
    taxable_income: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    bracket: Option<BracketView>,
}

#[derive(Debug, Serialize)]
struct BracketView {
    number: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    upper_bound: Option<Decimal>,
    formula: String,
}

impl BracketView {
    fn new(index: usize, bracket: &IncomeBracket) -> Self {
        BracketView {
            number: index + 1,
            upper_bound: bracket.upper_bound,
            formula: bracket.formula.to_string(),
        }
    }
}

impl CalcCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let table = self.table.load()?;
        let monthly = if self.months.is_empty() {
            MonthlyFigures::Uniform(self.monthly.unwrap_or(Decimal::ZERO))
        } else {
            MonthlyFigures::itemized(&self.months)?
        };

        let result = calculate(&table, &monthly, self.bonus1, self.bonus2)?;
        log::info!(
            "Yearly salary {} -> taxable income {}",
            result.yearly_salary,
            result.taxable_income
        );

        let bracket = if self.explain {
            let (index, bracket) = table.locate(result.yearly_salary)?;
            Some(BracketView::new(index, bracket))
        } else {
            None
        };

        if self.json {
            self.print_json(&table, &result, bracket)
        } else {
            self.print_text(&table, &result, bracket.as_ref());
            Ok(())
        }
    }

    fn print_text(
        &self,
        table: &BracketTable,
        result: &CalculationResult,
        bracket: Option<&BracketView>,
    ) {
        println!("Tax year:       {}", table.tax_year());
        println!("Yearly salary:  {}", format_yen(result.yearly_salary));
        println!("Taxable income: {}", format_yen(result.taxable_income));
        if let Some(bracket) = bracket {
            let bound = bracket
                .upper_bound
                .map_or("unbounded".to_string(), |b| format!("up to {}", format_yen(b)));
            println!(
                "Bracket:        #{} ({}): {}",
                bracket.number, bound, bracket.formula
            );
        }
    }

    fn print_json(
        &self,
        table: &BracketTable,
        result: &CalculationResult,
        bracket: Option<BracketView>,
    ) -> anyhow::Result<()> {
        let output = CalcOutput {
            tax_year: table.tax_year().0,
            yearly_salary: result.yearly_salary,
            taxable_income: result.taxable_income,
            bracket,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        Ok(())
    }
}
