//! Value filtering, choice matching and field resolution for the evaluation
//! import.
//!
//! The pipeline for one column is: [`ValueFilter`] drops blank and boilerplate
//! cells, then [`resolve`] collapses what is left according to the column's
//! [`Resolution`](eva_model::Resolution), and [`FieldResolver`] assigns the result
//! to the record. [`DerivedFieldComputer`] fills the evaluation fields that
//! depend on several columns.

#![deny(unsafe_code)]

pub mod choice;
pub mod derived;
pub mod filter;
pub mod numeric;
pub mod resolve;

pub use choice::{ChoiceMatch, MultiChoiceMatch, resolve_multiple_choice, resolve_single_choice};
pub use derived::{DerivedFieldComputer, VoteCount};
pub use filter::{DEFAULT_DENY_LIST, FilteredValues, ValueFilter, join_sentences};
pub use resolve::{ApplyStats, FieldResolver, ResolvedField, assign_field, resolve};
