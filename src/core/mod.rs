//! Core business logic - framework-agnostic repository, import and order operations.
//!
//! Every operation takes the store handle explicitly as its first argument.

/// Company CRUD
pub mod company;
/// CSV bulk import of medicines
pub mod import;
/// Medicine CRUD, catalogue view and offers
pub mod medicine;
/// Order aggregate assembly and mutation
pub mod order;
/// Signup, sign-in and profile updates
pub mod user;
