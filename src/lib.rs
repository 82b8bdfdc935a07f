//! Core library for the category-summary command line application.
//!
//! A run loads the first worksheet of a spreadsheet, keeps the rows with a
//! usable `Category` and numeric `Value`, totals the values per category and
//! writes the totals as JSON. IO adapters live under [`io`], the data
//! representations inside [`model`], the cleaning and grouping logic in
//! [`aggregate`], and the run orchestration under [`process`].

pub mod aggregate;
pub mod error;
pub mod io;
pub mod model;
pub mod process;

pub use error::{Result, ToolError};
pub use process::{EmptyReason, Outcome, process};
