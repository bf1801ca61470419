//! Users Domain
//!
//! Warehouse staff accounts: registration, login with email or phone, session tokens
//! delivered as an HttpOnly cookie and an `Authorization` header, and admin control over
//! roles, shifts and the payroll fields read by the wages domain.
//!
//! ```rust,ignore
//! use domain_users::{InMemoryUserRepository, UserService, handlers};
//!
//! let service = UserService::new(InMemoryUserRepository::new());
//! let router = handlers::router(service, jwt_auth, environment.use_https());
//! ```

pub mod error;
pub mod handlers;
pub mod memory;
pub mod models;
pub mod mongodb;
pub mod repository;
pub mod service;

pub use error::{UserError, UserResult};
pub use handlers::{ApiDoc, UserState};
pub use memory::InMemoryUserRepository;
pub use models::{
    AdminUpdateUser, AuthPayload, LoginRequest, PasswordUpdate, RegisterUser, Role, Shift,
    UpdateProfile, User, UserList, UserResponse,
};
pub use mongodb::MongoUserRepository;
pub use repository::UserRepository;
pub use service::UserService;
