/**
 * Responsibility
 *  - リソースごとの「意味付きID型」を宣言する
 *
 * 置かないもの
 *  - parse ロジック / extractor 実装
 */
use super::core::ResourceId;

// todos
pub enum TodoTag {}
pub type TodoId = ResourceId<TodoTag>;

// users
pub enum UserTag {}
pub type UserId = ResourceId<UserTag>;
