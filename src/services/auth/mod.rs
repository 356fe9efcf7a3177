pub mod factory;
pub mod identity;
pub mod jwt;
pub mod password;

pub use factory::build_token_codec;
pub use identity::AuthCtx;
pub use jwt::{Claims, IssuedToken, TokenCodec};
pub use password::CredentialHasher;
