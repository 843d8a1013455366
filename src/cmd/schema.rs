//! Schema command - print expected input formats

use crate::cmd::batch::{BatchInput, CSV_COLUMNS};
use clap::Args;
use nencho::engine::RuleFile;
use schemars::schema_for;

#[derive(Args, Debug)]
pub struct SchemaCommand {
    /// Output format
    #[arg(value_enum, default_value = "json-schema")]
    format: SchemaFormat,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum SchemaFormat {
    /// JSON Schema for batch input
    JsonSchema,
    /// JSON Schema for rule files
    RulesSchema,
    /// CSV header row for batch input
    CsvHeader,
}

impl SchemaCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        match self.format {
            SchemaFormat::JsonSchema => {
                let schema = schema_for!(BatchInput);
                println!("{}", serde_json::to_string_pretty(&schema)?);
            }
            SchemaFormat::RulesSchema => {
                let schema = schema_for!(RuleFile);
                println!("{}", serde_json::to_string_pretty(&schema)?);
            }
            SchemaFormat::CsvHeader => println!("{}", CSV_COLUMNS.join(",")),
        }
        Ok(())
    }
}
