//! Text rendering of claim values and statements.

pub mod statements;
pub mod value;

pub use statements::{first_non_empty, render_statement_values};
pub use value::{stringify, ValueShape};
