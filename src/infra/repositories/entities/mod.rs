//! SeaORM entity definitions
//!
//! These are database-specific entities separate from domain models.

pub mod audit_log;
pub mod seller_registration;
pub mod user;
