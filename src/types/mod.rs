//! Shared types.

mod pagination;

pub use pagination::{AuditLogPage, Paginated, PaginationMeta, PaginationParams};
