//! Brackets command - print the deduction table in use

use crate::cmd::amount::format_yen;
use crate::cmd::TableArgs;
use clap::Args;
use nencho::engine::{rules, BracketTable};
use rust_decimal::Decimal;
use std::io;
use tabled::{
    settings::{object::Columns, Alignment, Modify, Style},
    Table, Tabled,
};

#[derive(Args, Debug)]
pub struct BracketsCommand {
    #[command(flatten)]
    table: TableArgs,

    /// Output as a JSON rule file instead of formatted table
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Clone, Tabled)]
struct BracketRow {
    #[tabled(rename = "#")]
    number: usize,
    #[tabled(rename = "From")]
    from: String,
    #[tabled(rename = "Up To")]
    upto: String,
    #[tabled(rename = "Taxable Income")]
    formula: String,
}

impl BracketsCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let table = self.table.load()?;
        if self.json {
            rules::save(&table, io::stdout().lock())?;
            println!();
        } else {
            print_table(&table);
        }
        Ok(())
    }
}

fn bracket_rows(table: &BracketTable) -> Vec<BracketRow> {
    let mut from = Decimal::ZERO;
    table
        .brackets()
        .iter()
        .enumerate()
        .map(|(i, bracket)| {
            let row = BracketRow {
                number: i + 1,
                from: format_yen(from),
                upto: bracket
                    .upper_bound
                    .map_or("-".to_string(), format_yen),
                formula: bracket.formula.to_string(),
            };
            if let Some(bound) = bracket.upper_bound {
                from = bound + Decimal::ONE;
            }
            row
        })
        .collect()
}

fn print_table(table: &BracketTable) {
    println!();
    println!("EMPLOYMENT INCOME DEDUCTION, TAX YEAR {}", table.tax_year());
    println!();
    let rendered = Table::new(bracket_rows(table))
        .with(Style::rounded())
        .with(Modify::new(Columns::new(1..3)).with(Alignment::right()))
        .to_string();
    println!("{}", rendered);
}
