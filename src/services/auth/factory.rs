//! Factory: build the auth primitives from application `Config`.
use crate::config::Config;
use crate::services::auth::TokenCodec;

pub fn build_token_codec(config: &Config) -> TokenCodec {
    TokenCodec::new(
        config.jwt_secret.as_bytes(),
        config.access_token_ttl_seconds,
        config.access_token_leeway_seconds,
    )
}

