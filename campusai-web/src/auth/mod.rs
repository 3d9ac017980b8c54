//! Authentication: JWT bearer tokens over an in-memory user store.

pub mod jwt;
pub mod users;

pub use jwt::{AuthError, Claims, JwtService};
pub use users::{LoginRequest, SignupRequest, UserInfo, UserRecord, UserStore};
