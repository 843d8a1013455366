//! Taxable employment income (給与所得金額) for the Japanese year-end adjustment.
//!
//! Yearly salary is aggregated from monthly figures and two bonuses, then
//! evaluated against the employment income deduction table of a tax year.

pub mod engine;
