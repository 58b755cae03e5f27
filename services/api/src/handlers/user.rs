use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};

use painel_auth_types::identity::AdminContext;
use painel_domain::user::UserRole;

use crate::domain::types::User;
use crate::error::ApiError;
use crate::handlers::extract::{ApiJson, ApiPath};
use crate::state::AppState;
use crate::usecase::user::{
    CreateUserInput, CreateUserUseCase, DeleteUserUseCase, GetUserUseCase, ListUsersUseCase,
    UpdateUserUseCase, UserChanges,
};

/// Public view of an account. Password hashes and OAuth ids stay server-side.
#[derive(Serialize)]
pub struct UserResponse {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub avatar: Option<String>,
    #[serde(serialize_with = "painel_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
    #[serde(serialize_with = "painel_core::serde::to_rfc3339_ms")]
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            avatar: user.avatar,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

fn parse_role(raw: Option<String>) -> Result<Option<UserRole>, ApiError> {
    raw.map(|r| r.parse::<UserRole>())
        .transpose()
        .map_err(|e| ApiError::validation(e.to_string()))
}

// ── GET /api/users ───────────────────────────────────────────────────────────

pub async fn list_users(
    _admin: AdminContext,
    State(state): State<AppState>,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    let usecase = ListUsersUseCase {
        repo: state.user_repo(),
    };
    let users = usecase.execute().await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

// ── GET /api/users/{id} ──────────────────────────────────────────────────────

pub async fn get_user(
    _admin: AdminContext,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> Result<Json<UserResponse>, ApiError> {
    let usecase = GetUserUseCase {
        repo: state.user_repo(),
    };
    Ok(Json(usecase.execute(id).await?.into()))
}

// ── POST /api/users ──────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreateUserRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(alias = "type")]
    pub role: Option<String>,
    pub avatar: Option<String>,
}

pub async fn create_user(
    _admin: AdminContext,
    State(state): State<AppState>,
    ApiJson(body): ApiJson<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    let usecase = CreateUserUseCase {
        repo: state.user_repo(),
        hasher: state.hasher(),
    };
    let user = usecase
        .execute(CreateUserInput {
            name: body.name,
            email: body.email,
            password: body.password,
            role: parse_role(body.role)?,
            avatar: body.avatar,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(user.into())))
}

// ── PUT /api/users/{id} ──────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    #[serde(alias = "type")]
    pub role: Option<String>,
    pub avatar: Option<String>,
}

pub async fn update_user(
    _admin: AdminContext,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
    ApiJson(body): ApiJson<UpdateUserRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    let usecase = UpdateUserUseCase {
        repo: state.user_repo(),
        hasher: state.hasher(),
    };
    let user = usecase
        .execute(
            id,
            UserChanges {
                name: body.name,
                email: body.email,
                password: body.password,
                role: parse_role(body.role)?,
                avatar: body.avatar,
            },
        )
        .await?;
    Ok(Json(user.into()))
}

// ── DELETE /api/users/{id} ───────────────────────────────────────────────────

pub async fn delete_user(
    _admin: AdminContext,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> Result<StatusCode, ApiError> {
    let usecase = DeleteUserUseCase {
        repo: state.user_repo(),
    };
    usecase.execute(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
