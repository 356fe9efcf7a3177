//! Method table and the auth interceptor for the RPC transport.
//!
//! `AddUser` and `LoginUser` are public; every other method must carry an
//! `authorization` metadata entry, checked before any handler runs.

use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use uuid::Uuid;

use crate::api::v1::dto::todos::TodoQuery;
use crate::error::AppResult;
use crate::models::{Credentials, TodoDraft, TodoUpdate, UserFilter, UserRegistration, UserUpdate};
use crate::rpc::envelope::{JSONRPC_VERSION, RpcError, RpcRequest, RpcResponse, RpcStatus};
use crate::services::Handlers;
use crate::services::auth::{AuthCtx, identity};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RpcMethod {
    AddUser,
    GetUser,
    GetUsers,
    UpdateUser,
    DeleteUser,
    LoginUser,
    ValidateToken,
    AddTodo,
    GetTodo,
    GetTodos,
    UpdateTodo,
    DeleteTodo,
}

impl FromStr for RpcMethod {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "AddUser" => Self::AddUser,
            "GetUser" => Self::GetUser,
            "GetUsers" => Self::GetUsers,
            "UpdateUser" => Self::UpdateUser,
            "DeleteUser" => Self::DeleteUser,
            "LoginUser" => Self::LoginUser,
            "ValidateToken" => Self::ValidateToken,
            "AddTodo" => Self::AddTodo,
            "GetTodo" => Self::GetTodo,
            "GetTodos" => Self::GetTodos,
            "UpdateTodo" => Self::UpdateTodo,
            "DeleteTodo" => Self::DeleteTodo,
            _ => return Err(()),
        })
    }
}

impl RpcMethod {
    pub fn is_public(self) -> bool {
        matches!(self, Self::AddUser | Self::LoginUser)
    }
}

#[derive(Deserialize)]
struct IdParams {
    id: Uuid,
}

#[derive(Deserialize)]
struct UpdateUserParams {
    id: Uuid,
    #[serde(flatten)]
    update: UserUpdate,
}

#[derive(Deserialize)]
struct UpdateTodoParams {
    id: Uuid,
    #[serde(flatten)]
    update: TodoUpdate,
}

#[derive(Deserialize)]
struct GetUsersParams {
    #[serde(default)]
    username: Option<String>,
}

#[derive(Deserialize)]
struct ValidateTokenParams {
    token: String,
}

fn params<T: DeserializeOwned>(raw: Value) -> Result<T, RpcError> {
    let raw = if raw.is_null() { json!({}) } else { raw };
    serde_json::from_value(raw)
        .map_err(|e| RpcError::invalid_argument(format!("invalid params: {e}")))
}

fn to_result<T: Serialize>(value: T) -> Result<Value, RpcError> {
    serde_json::to_value(value)
        .map_err(|e| RpcError::new(RpcStatus::Internal, format!("encoding failed: {e}")))
}

fn authenticate(service: &dyn Handlers, req: &RpcRequest) -> AppResult<AuthCtx> {
    let token = identity::metadata_token(req.metadata("authorization")?)?;
    Ok(service.validate_token(token)?.into())
}

/// Run one call. Failures become an error envelope; this never fails itself.
pub async fn dispatch(service: &dyn Handlers, req: RpcRequest) -> RpcResponse {
    let id = req.id.clone();
    match call(service, req).await {
        Ok(result) => RpcResponse::ok(id, result),
        Err(error) => RpcResponse::err(id, error),
    }
}

async fn call(service: &dyn Handlers, req: RpcRequest) -> Result<Value, RpcError> {
    if let Some(version) = req.jsonrpc.as_deref()
        && version != JSONRPC_VERSION
    {
        return Err(RpcError::invalid_argument("unsupported jsonrpc version"));
    }

    let method: RpcMethod = req
        .method
        .parse()
        .map_err(|_| RpcError::unimplemented(&req.method))?;

    // interceptor: resolve the caller before touching any handler
    let ctx = if method.is_public() {
        None
    } else {
        Some(authenticate(service, &req)?)
    };
    let ctx = ctx.as_ref();
    let p = req.params;

    tracing::debug!(?method, "rpc call");

    match (method, ctx) {
        (RpcMethod::AddUser, _) => {
            let id = service.add_user(params::<UserRegistration>(p)?).await?;
            to_result(json!({ "id": id }))
        }
        (RpcMethod::LoginUser, _) => {
            to_result(service.login_user(params::<Credentials>(p)?).await?)
        }
        (_, None) => Err(RpcError::new(RpcStatus::Unauthenticated, "no credential supplied")),
        (RpcMethod::ValidateToken, Some(_)) => {
            let ValidateTokenParams { token } = params(p)?;
            to_result(service.validate_token(&token)?)
        }
        (RpcMethod::GetUser, Some(ctx)) => {
            let IdParams { id } = params(p)?;
            to_result(service.get_user(ctx, id).await?)
        }
        (RpcMethod::GetUsers, Some(ctx)) => {
            let GetUsersParams { username } = params(p)?;
            to_result(service.get_users(ctx, UserFilter::new(username)).await?)
        }
        (RpcMethod::UpdateUser, Some(ctx)) => {
            let UpdateUserParams { id, update } = params(p)?;
            to_result(service.update_user(ctx, id, update).await?)
        }
        (RpcMethod::DeleteUser, Some(ctx)) => {
            let IdParams { id } = params(p)?;
            service.delete_user(ctx, id).await?;
            to_result(json!({}))
        }
        (RpcMethod::AddTodo, Some(ctx)) => {
            let id = service.add_todo(ctx, params::<TodoDraft>(p)?).await?;
            to_result(json!({ "id": id }))
        }
        (RpcMethod::GetTodo, Some(ctx)) => {
            let IdParams { id } = params(p)?;
            to_result(service.get_todo(ctx, id).await?)
        }
        (RpcMethod::GetTodos, Some(ctx)) => {
            let filter = params::<TodoQuery>(p)?.into_filter()?;
            to_result(service.get_todos(ctx, filter).await?)
        }
        (RpcMethod::UpdateTodo, Some(ctx)) => {
            let UpdateTodoParams { id, update } = params(p)?;
            to_result(service.update_todo(ctx, id, update).await?)
        }
        (RpcMethod::DeleteTodo, Some(ctx)) => {
            let IdParams { id } = params(p)?;
            service.delete_todo(ctx, id).await?;
            to_result(json!({}))
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::repos::InMemoryStorage;
    use crate::services::TodoService;
    use crate::services::auth::{CredentialHasher, TokenCodec};
    use crate::services::policy::UserScope;

    fn service() -> TodoService {
        TodoService::new(
            Arc::new(InMemoryStorage::new()),
            CredentialHasher::new(),
            TokenCodec::new(b"rpc-test-secret", 3600, 0),
            UserScope::Open,
        )
    }

    fn request(method: &str, params: Value, token: Option<&str>) -> RpcRequest {
        let mut body = json!({ "jsonrpc": "2.0", "id": 1, "method": method, "params": params });
        if let Some(token) = token {
            body["metadata"] = json!({ "authorization": token });
        }
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn only_registration_and_login_are_public() {
        let public: Vec<_> = [
            "AddUser", "GetUser", "GetUsers", "UpdateUser", "DeleteUser", "LoginUser",
            "ValidateToken", "AddTodo", "GetTodo", "GetTodos", "UpdateTodo", "DeleteTodo",
        ]
        .iter()
        .map(|m| m.parse::<RpcMethod>().unwrap())
        .filter(|m| m.is_public())
        .collect();
        assert_eq!(public, vec![RpcMethod::AddUser, RpcMethod::LoginUser]);
    }

    #[tokio::test]
    async fn unknown_method_is_unimplemented() {
        let svc = service();
        let res = dispatch(&svc, request("DropTables", Value::Null, None)).await;
        assert_eq!(res.error.unwrap().code, 12);
    }

    #[tokio::test]
    async fn protected_method_without_metadata_is_unauthenticated() {
        let svc = service();
        let res = dispatch(&svc, request("GetTodos", Value::Null, None)).await;
        let err = res.error.unwrap();
        assert_eq!(err.code, 16);
        assert_eq!(err.status, "UNAUTHENTICATED");
    }

    #[tokio::test]
    async fn full_flow_over_rpc() {
        let svc = service();

        let res = dispatch(
            &svc,
            request("AddUser", json!({"username": "roxy", "password": "Secret12!"}), None),
        )
        .await;
        assert!(res.error.is_none());

        let res = dispatch(
            &svc,
            request("LoginUser", json!({"username": "roxy", "password": "Secret12!"}), None),
        )
        .await;
        let token = res.result.unwrap()["token"].as_str().unwrap().to_string();

        let res = dispatch(
            &svc,
            request("AddTodo", json!({"name": "buy milk"}), Some(&token)),
        )
        .await;
        let todo_id = res.result.unwrap()["id"].as_str().unwrap().to_string();

        let res = dispatch(&svc, request("GetTodos", Value::Null, Some(&token))).await;
        let items = res.result.unwrap();
        assert_eq!(items.as_array().unwrap().len(), 1);
        assert_eq!(items[0]["status"], "new");

        let res = dispatch(
            &svc,
            request("UpdateTodo", json!({"id": todo_id, "status": "done"}), Some(&token)),
        )
        .await;
        assert_eq!(res.result.unwrap()["status"], "done");

        let bearer = format!("Bearer {token}");
        let fetched = dispatch(
            &svc,
            request("GetTodo", json!({"id": todo_id}), Some(&bearer)),
        )
        .await;
        assert_eq!(fetched.result.unwrap()["name"], "buy milk");
    }

    #[tokio::test]
    async fn bad_params_are_invalid_argument() {
        let svc = service();
        svc.add_user(UserRegistration {
            user_name: "roxy".into(),
            first_name: String::new(),
            last_name: String::new(),
            password: "pw".into(),
            location: None,
        })
        .await
        .unwrap();
        let token = svc
            .login_user(Credentials {
                user_name: "roxy".into(),
                password: "pw".into(),
            })
            .await
            .unwrap()
            .token;

        let res = dispatch(&svc, request("GetTodo", json!({"id": "42"}), Some(&token))).await;
        assert_eq!(res.error.unwrap().code, 3);
    }
}
