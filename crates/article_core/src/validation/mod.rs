//! Pre-persistence validation for articles.
//!
//! # Responsibility
//! - Hold the declared title rules and the validator that applies them.
//! - Report violations as structured, recoverable errors.
//!
//! # Invariants
//! - Validation never writes to the Record Store.
//! - Every violation is collected; callers see all field errors at once.

pub mod errors;
pub mod validator;
