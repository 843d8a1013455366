//! Batch command - taxable income for every record in a CSV or JSON file

use crate::cmd::amount::format_yen;
use crate::cmd::{read_input, TableArgs};
use anyhow::Context;
use clap::Args;
use nencho::engine::{calculate, BracketTable, MonthlyFigures};
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::io;
use std::path::PathBuf;
use tabled::{
    settings::{object::Columns, Alignment, Modify, Style},
    Table, Tabled,
};

#[derive(Args, Debug)]
pub struct BatchCommand {
    /// CSV or JSON file of salary records. Reads from stdin if not specified.
    #[arg(default_value = "-")]
    file: PathBuf,

    #[command(flatten)]
    table: TableArgs,

    /// Output as CSV instead of formatted table
    #[arg(long, conflicts_with = "json")]
    csv: bool,

    /// Output as JSON instead of formatted table
    #[arg(long)]
    json: bool,
}

/// JSON input format
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct BatchInput {
    /// Tax year of the statutory table, unless given on the command line
    #[serde(default)]
    pub tax_year: Option<i32>,
    pub records: Vec<SalaryRecord>,
}

/// One person's salary and bonuses for the year. Give either `monthly` or
/// the per-month columns; empty months count as 0.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct SalaryRecord {
    /// Identifies the record in the output
    pub id: String,
    /// Salary paid in each of the 12 months
    #[serde(default)]
    #[schemars(with = "Option<f64>")]
    pub monthly: Option<Decimal>,
    #[serde(default)]
    #[schemars(with = "Option<f64>")]
    pub jan: Option<Decimal>,
    #[serde(default)]
    #[schemars(with = "Option<f64>")]
    pub feb: Option<Decimal>,
    #[serde(default)]
    #[schemars(with = "Option<f64>")]
    pub mar: Option<Decimal>,
    #[serde(default)]
    #[schemars(with = "Option<f64>")]
    pub apr: Option<Decimal>,
    #[serde(default)]
    #[schemars(with = "Option<f64>")]
    pub may: Option<Decimal>,
    #[serde(default)]
    #[schemars(with = "Option<f64>")]
    pub jun: Option<Decimal>,
    #[serde(default)]
    #[schemars(with = "Option<f64>")]
    pub jul: Option<Decimal>,
    #[serde(default)]
    #[schemars(with = "Option<f64>")]
    pub aug: Option<Decimal>,
    #[serde(default)]
    #[schemars(with = "Option<f64>")]
    pub sep: Option<Decimal>,
    #[serde(default)]
    #[schemars(with = "Option<f64>")]
    pub oct: Option<Decimal>,
    #[serde(default)]
    #[schemars(with = "Option<f64>")]
    pub nov: Option<Decimal>,
    #[serde(default)]
    #[schemars(with = "Option<f64>")]
    pub dec: Option<Decimal>,
    #[serde(default)]
    #[schemars(with = "Option<f64>")]
    pub bonus1: Option<Decimal>,
    #[serde(default)]
    #[schemars(with = "Option<f64>")]
    pub bonus2: Option<Decimal>,
}

/// CSV columns of a salary record, in order
pub const CSV_COLUMNS: &[&str] = &[
    "id", "monthly", "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov",
    "dec", "bonus1", "bonus2",
];

impl SalaryRecord {
    fn months(&self) -> [Option<Decimal>; 12] {
        [
            self.jan, self.feb, self.mar, self.apr, self.may, self.jun, self.jul, self.aug,
            self.sep, self.oct, self.nov, self.dec,
        ]
    }

    pub fn monthly_figures(&self) -> anyhow::Result<MonthlyFigures> {
        let months = self.months();
        let itemized = months.iter().any(Option::is_some);
        match self.monthly {
            Some(_) if itemized => {
                anyhow::bail!("give either monthly or per-month figures, not both")
            }
            Some(amount) => Ok(MonthlyFigures::Uniform(amount)),
            None => {
                let amounts: Vec<Decimal> = months.iter().map(|m| m.unwrap_or_default()).collect();
                Ok(MonthlyFigures::itemized(&amounts)?)
            }
        }
    }
}

/// Row for the batch table output
#[derive(Debug, Clone, Tabled)]
struct BatchRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Yearly Salary")]
    yearly_salary: String,
    #[tabled(rename = "Taxable Income")]
    taxable_income: String,
}

/// Record for CSV and JSON output
#[derive(Debug, Clone, Serialize)]
pub struct BatchResult {
    pub id: String,
    pub yearly_salary: Decimal,
    pub taxable_income: Decimal,
}

/// Parse salary records from CSV, or from JSON when the input is an object
pub fn parse_records(input: &[u8]) -> anyhow::Result<(Vec<SalaryRecord>, Option<i32>)> {
    let is_json = input
        .iter()
        .find(|b| !b.is_ascii_whitespace())
        .is_some_and(|b| *b == b'{');

    if is_json {
        let input: BatchInput = serde_json::from_slice(input)?;
        Ok((input.records, input.tax_year))
    } else {
        let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(input);
        let records: Result<Vec<SalaryRecord>, _> = rdr.deserialize().collect();
        Ok((records?, None))
    }
}

/// Calculate every record, stopping at the first invalid one
pub fn calculate_records(
    table: &BracketTable,
    records: &[SalaryRecord],
) -> anyhow::Result<Vec<BatchResult>> {
    records
        .iter()
        .map(|record| {
            let monthly = record
                .monthly_figures()
                .with_context(|| format!("record {}", record.id))?;
            let result = calculate(
                table,
                &monthly,
                record.bonus1.unwrap_or_default(),
                record.bonus2.unwrap_or_default(),
            )
            .with_context(|| format!("record {}", record.id))?;
            Ok(BatchResult {
                id: record.id.clone(),
                yearly_salary: result.yearly_salary,
                taxable_income: result.taxable_income,
            })
        })
        .collect()
}

impl BatchCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let input = read_input(&self.file)?;
        let (records, tax_year) = parse_records(&input)?;
        log::info!("Read {} salary records", records.len());

        let table = self.table.load_or(tax_year)?;
        let results = calculate_records(&table, &records)?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&results)?);
            Ok(())
        } else if self.csv {
            self.write_csv(&results)
        } else {
            self.print_table(&table, &results);
            Ok(())
        }
    }

    fn print_table(&self, table: &BracketTable, results: &[BatchResult]) {
        if results.is_empty() {
            println!("No salary records found");
            return;
        }

        let rows: Vec<BatchRow> = results
            .iter()
            .map(|r| BatchRow {
                id: r.id.clone(),
                yearly_salary: format_yen(r.yearly_salary),
                taxable_income: format_yen(r.taxable_income),
            })
            .collect();

        println!();
        println!("TAXABLE EMPLOYMENT INCOME, TAX YEAR {}", table.tax_year());
        println!();
        let table = Table::new(rows)
            .with(Style::rounded())
            .with(Modify::new(Columns::new(1..)).with(Alignment::right()))
            .to_string();
        println!("{}", table);
    }

    fn write_csv(&self, results: &[BatchResult]) -> anyhow::Result<()> {
        let mut wtr = csv::Writer::from_writer(io::stdout());
        for result in results {
            wtr.serialize(result)?;
        }
        wtr.flush()?;
        Ok(())
    }
}
