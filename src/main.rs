use clap::{Parser, Subcommand};

mod cmd;

#[derive(Parser, Debug)]
#[command(
    name = "nencho",
    version,
    about = "Calculate taxable employment income for the Japanese year-end adjustment"
)]
struct Opts {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Yearly salary and taxable income for one person
    Calc(cmd::calc::CalcCommand),
    /// Calculate every record in a CSV or JSON file
    Batch(cmd::batch::BatchCommand),
    /// Print the employment income deduction table
    Brackets(cmd::brackets::BracketsCommand),
    /// Print expected input formats
    Schema(cmd::schema::SchemaCommand),
}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();

    let opts = Opts::parse();
    match opts.command {
        Command::Calc(calc) => calc.exec(),
        Command::Batch(batch) => batch.exec(),
        Command::Brackets(brackets) => brackets.exec(),
        Command::Schema(schema) => schema.exec(),
    }
}
