//! Domain layer - Core business entities and rules
//!
//! Users and their seller standing, seller registration requests, the
//! administrative audit trail, and the capability table that decides who
//! may act on them.

pub mod access;
pub mod audit;
pub mod password;
pub mod registration;
pub mod user;

pub use access::{admin_role_grants, Actor, Capability, ReviewScope};
pub use audit::{AuditAction, AuditLogEntry, AuditTarget, NewAuditEntry};
pub use password::Password;
pub use registration::{
    FarmDetails, PendingRegistration, RegistrationRequest, RegistrationResponse, RequestStatus,
};
pub use user::{AdminRole, NewUser, Role, SellerStatus, User, UserResponse};
