/*
 * Responsibility
 * - tokio runtime 起動
 * - app::run() の呼び出し（ロジックは置かない）
 */
use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    todo_api::app::run().await
}
