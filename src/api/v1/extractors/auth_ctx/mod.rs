/*!
 * Authentication context extractor
 *
 * Responsibility:
 * - 認証済みリクエストのコンテキスト（AuthCtx）を handler に提供する
 * - AuthCtx の型自体は services::auth::identity にあり、RPC 側と共有する
 */

mod core;

pub use self::core::AuthCtxExtractor;
