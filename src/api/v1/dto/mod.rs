pub mod todos;
pub mod users;

use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Serialize)]
pub struct IdResponse {
    pub id: Uuid,
}
