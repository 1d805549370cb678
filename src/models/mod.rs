pub mod audit;
pub mod pagination;
pub mod service;
pub mod token;

pub use audit::AuditLogEntry;
pub use pagination::{Envelope, Paginated, PaginationMeta};
pub use service::{Client, ClientWithSecret, RegeneratedSecret, Service, ServiceStatus};
pub use token::TokenResponse;
