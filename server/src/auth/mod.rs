pub mod hash;
pub mod jwt;
pub mod middleware;

pub use hash::{hash_password, verify_password};
pub use jwt::{create_token, verify_token, Claims, TokenError, MAX_TTL_HOURS};
pub use middleware::{admin_middleware, auth_middleware};
