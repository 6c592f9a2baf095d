pub mod crypto;
pub mod handlers;
pub mod jwt;
pub mod middleware;

pub use crypto::{AuthCrypto, AuthCryptoError};
pub use jwt::{Claims, TokenError, TokenIssuer};
pub use middleware::{AuthenticatedUser, auth_middleware};
