use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};

use painel_auth_types::identity::AuthContext;

use crate::error::ApiError;
use crate::handlers::extract::ApiJson;
use crate::handlers::user::UserResponse;
use crate::state::AppState;
use crate::usecase::auth::{
    AuthOutput, ClaimedProfile, GetProfileUseCase, LoginInput, LoginUseCase, OAuthLoginInput,
    OAuthLoginUseCase, RegisterInput, RegisterUseCase, UpdateProfileInput, UpdateProfileUseCase,
};

#[derive(Serialize)]
pub struct AuthResponse {
    pub success: bool,
    pub user: UserResponse,
    pub token: String,
}

impl From<AuthOutput> for AuthResponse {
    fn from(out: AuthOutput) -> Self {
        Self {
            success: true,
            user: out.user.into(),
            token: out.token,
        }
    }
}

#[derive(Serialize)]
pub struct ProfileResponse {
    pub success: bool,
    pub user: UserResponse,
}

// ── POST /api/auth/login ─────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

pub async fn login(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let usecase = LoginUseCase {
        users: state.user_repo(),
        hasher: state.hasher(),
        jwt_secret: state.secret(),
    };
    let out = usecase
        .execute(LoginInput {
            email: body.email,
            password: body.password,
        })
        .await?;
    Ok(Json(out.into()))
}

// ── POST /api/auth/register ──────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

pub async fn register(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    let usecase = RegisterUseCase {
        users: state.user_repo(),
        hasher: state.hasher(),
        jwt_secret: state.secret(),
    };
    let out = usecase
        .execute(RegisterInput {
            name: body.name,
            email: body.email,
            password: body.password,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(out.into())))
}

// ── POST /api/auth/oauth ─────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct OAuthProfileBody {
    /// Providers disagree on the type (GitHub sends a number).
    pub id: Option<serde_json::Value>,
    pub name: Option<String>,
    pub picture: Option<String>,
}

#[derive(Deserialize)]
pub struct OAuthRequest {
    #[serde(default)]
    pub provider: String,
    #[serde(default)]
    pub token: String,
    pub profile: Option<OAuthProfileBody>,
}

fn claimed_id(value: serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) => Some(s),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

pub async fn oauth_login(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<OAuthRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let usecase = OAuthLoginUseCase {
        users: state.user_repo(),
        hasher: state.hasher(),
        verifier: state.oauth.clone(),
        jwt_secret: state.secret(),
    };
    let profile = body.profile.map(|p| ClaimedProfile {
        id: p.id.and_then(claimed_id),
        name: p.name,
        picture: p.picture,
    });
    let out = usecase
        .execute(OAuthLoginInput {
            provider: body.provider,
            access_token: body.token,
            profile,
        })
        .await?;
    Ok(Json(out.into()))
}

// ── GET /api/profile ─────────────────────────────────────────────────────────

pub async fn get_profile(
    auth: AuthContext,
    State(state): State<AppState>,
) -> Result<Json<ProfileResponse>, ApiError> {
    let usecase = GetProfileUseCase {
        users: state.user_repo(),
    };
    let user = usecase.execute(auth.user_id).await?;
    Ok(Json(ProfileResponse {
        success: true,
        user: user.into(),
    }))
}

// ── PUT /api/profile ─────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub avatar: Option<String>,
}

pub async fn update_profile(
    auth: AuthContext,
    State(state): State<AppState>,
    ApiJson(body): ApiJson<UpdateProfileRequest>,
) -> Result<Json<ProfileResponse>, ApiError> {
    let usecase = UpdateProfileUseCase {
        users: state.user_repo(),
        hasher: state.hasher(),
    };
    let user = usecase
        .execute(
            auth.user_id,
            UpdateProfileInput {
                name: body.name,
                email: body.email,
                password: body.password,
                avatar: body.avatar,
            },
        )
        .await?;
    Ok(Json(ProfileResponse {
        success: true,
        user: user.into(),
    }))
}
