/**
 * Responsibility
 * - repo が上位に伝える意味の定義
 */
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("db error: {0}")]
    Db(#[from] sqlx::Error),
    #[error("conflict")]
    Conflict,
    #[error("invalid stored data: {0}")]
    InvalidData(String),
}

impl RepoError {
    pub fn from_sqlx(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(dbe) = &e
            && dbe.code().as_deref() == Some("23505")
        {
            return RepoError::Conflict;
        }
        RepoError::Db(e)
    }
}
