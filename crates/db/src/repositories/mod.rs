//! Query helpers, one zero-sized repo struct per table.

pub mod ledger_repo;

pub use ledger_repo::LedgerRepo;
