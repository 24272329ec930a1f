//! Row structs for tables owned by this crate.

pub mod ledger;
