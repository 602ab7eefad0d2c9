//! Domain models and business logic for voucher splitting.
//!
//! This module contains the roster record model and the core matching rules:
//! whole-token identifier matching, the protected-field exemptions, and the
//! batch-wide output name suffix.

pub mod fields;
pub mod matcher;
pub mod roster;
pub mod suffix;

pub use fields::ProtectedFieldSet;
pub use matcher::TokenMatcher;
pub use roster::{LedgerRow, Record};
pub use suffix::OutputSuffix;
