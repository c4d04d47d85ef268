//! Identity management: account records, uniqueness enforcement, and
//! credential verification.

pub mod password;
pub mod repository;
pub mod service;
pub mod user;

pub use repository::{InMemoryUserRepository, NewUser, UserRepository};
pub use service::{IdentityError, IdentityService};
pub use user::{User, DEFAULT_ROLE};
