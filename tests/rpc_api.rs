mod common;

use anyhow::Result;
use axum::http::StatusCode;
use serde_json::{Value, json};

use common::{send, send_text, test_app};
use todo_api::services::policy::UserScope;

fn rpc_request(
    method: &str,
    params: Value,
    token: Option<&str>,
) -> axum::http::Request<axum::body::Body> {
    let mut envelope = json!({"jsonrpc": "2.0", "id": 7, "method": method, "params": params});
    if let Some(token) = token {
        envelope["metadata"] = json!({"authorization": format!("Bearer {token}")});
    }
    axum::http::Request::builder()
        .method("POST")
        .uri("/rpc")
        .header("content-type", "application/json")
        .body(axum::body::Body::from(envelope.to_string()))
        .unwrap()
}

#[tokio::test]
async fn login_and_todos_over_rpc() -> Result<()> {
    let app = test_app(UserScope::Open);

    let (status, res) = send(
        &app.rpc,
        rpc_request("AddUser", json!({"username": "roxy", "password": "Secret12!"}), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(res["id"], 7);
    let roxy_id = res["result"]["id"].clone();

    let (_, res) = send(
        &app.rpc,
        rpc_request("LoginUser", json!({"username": "roxy", "password": "Secret12!"}), None),
    )
    .await;
    let token = res["result"]["token"].as_str().unwrap().to_string();

    let (_, res) = send(
        &app.rpc,
        rpc_request("ValidateToken", json!({"token": token}), Some(&token)),
    )
    .await;
    assert_eq!(res["result"]["user_id"], roxy_id);

    let (_, res) = send(
        &app.rpc,
        rpc_request("AddTodo", json!({"name": "buy milk"}), Some(&token)),
    )
    .await;
    assert!(res["result"]["id"].is_string());

    let (_, res) = send(&app.rpc, rpc_request("GetTodos", json!({}), Some(&token))).await;
    let items = res["result"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["userid"], roxy_id);
    Ok(())
}

#[tokio::test]
async fn foreign_todo_is_not_found_over_rpc() -> Result<()> {
    let app = test_app(UserScope::Open);
    for name in ["roxy", "sam"] {
        send(
            &app.rpc,
            rpc_request("AddUser", json!({"username": name, "password": "pw"}), None),
        )
        .await;
    }
    let mut tokens = Vec::new();
    for name in ["roxy", "sam"] {
        let (_, res) = send(
            &app.rpc,
            rpc_request("LoginUser", json!({"username": name, "password": "pw"}), None),
        )
        .await;
        tokens.push(res["result"]["token"].as_str().unwrap().to_string());
    }

    let (_, res) = send(
        &app.rpc,
        rpc_request("AddTodo", json!({"name": "secret"}), Some(&tokens[0])),
    )
    .await;
    let todo_id = res["result"]["id"].clone();

    let (status, res) = send(
        &app.rpc,
        rpc_request("GetTodo", json!({"id": todo_id}), Some(&tokens[1])),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(res["error"]["code"], 5);
    assert_eq!(res["error"]["status"], "NOT_FOUND");
    Ok(())
}

#[tokio::test]
async fn missing_metadata_never_reaches_storage() -> Result<()> {
    let app = test_app(UserScope::Open);
    let id = uuid::Uuid::new_v4();

    for method in [
        "GetUser", "GetUsers", "UpdateUser", "DeleteUser", "ValidateToken",
        "AddTodo", "GetTodo", "GetTodos", "UpdateTodo", "DeleteTodo",
    ] {
        let (status, res) = send(
            &app.rpc,
            rpc_request(method, json!({"id": id, "name": "x", "token": "x"}), None),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(res["error"]["code"], 16, "{method}");
    }

    assert_eq!(app.spy.calls(), 0);
    Ok(())
}

#[tokio::test]
async fn malformed_envelope_is_rejected() -> Result<()> {
    let app = test_app(UserScope::Open);
    let req = axum::http::Request::builder()
        .method("POST")
        .uri("/rpc")
        .body(axum::body::Body::from("{not json"))?;

    let (status, res) = send(&app.rpc, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(res["error"]["code"], 3);
    Ok(())
}

#[tokio::test]
async fn duplicate_authorization_metadata_is_rejected() -> Result<()> {
    let app = test_app(UserScope::Open);
    let envelope = json!({
        "jsonrpc": "2.0",
        "id": 1,
        "method": "GetTodos",
        "metadata": {"Authorization": "Bearer a", "authorization": "Bearer b"}
    });
    let req = axum::http::Request::builder()
        .method("POST")
        .uri("/rpc")
        .header("content-type", "application/json")
        .body(axum::body::Body::from(envelope.to_string()))
        .unwrap();

    let before = app.spy.calls();
    let (status, res) = send(&app.rpc, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(res["error"]["code"], 3);
    assert_eq!(app.spy.calls(), before);
    Ok(())
}

#[tokio::test]
async fn rpc_calls_are_counted_in_metrics() -> Result<()> {
    let app = test_app(UserScope::Open);
    send(&app.rpc, rpc_request("GetTodos", json!({}), None)).await;

    let req = axum::http::Request::builder()
        .uri("/metrics")
        .body(axum::body::Body::empty())
        .unwrap();
    let (status, body, _) = send_text(&app.http, req).await;
    assert_eq!(status, StatusCode::OK);
    assert!(
        body.contains(r#"route="/rpc",status="200",transport="rpc"} 1"#),
        "{body}"
    );
    Ok(())
}
