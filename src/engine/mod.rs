pub mod brackets;
pub mod calculation;
pub mod error;
pub mod rules;
pub mod salary;

// Flat public surface for the calculation engine.
pub use brackets::{BracketTable, Formula, IncomeBracket};
pub use calculation::{calculate, CalculationResult};
pub use error::{CalcError, InputError, TableError};
pub use rules::{statutory, RuleFile, TaxYear};
pub use salary::{aggregate, MonthlyFigures};
