//! HTTP request handlers for the JSON API.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Form, Json,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::adapters::email::{
    generate_account_confirmation_email, generate_password_reset_email,
};
use crate::domain::error::FauxtickError;
use crate::domain::resolver;
use crate::domain::ticker::{TickerDetails, TickerUpdate, UserDefinedTicker};
use crate::domain::ticker_code::TickerCode;
use crate::domain::user::{User, UserPublic, UserUpdate};
use crate::domain::validation::{validate_email, validate_name, validate_password};
use crate::ports::mail_port::MailPort;
use crate::ports::ticker_store::TickerStore;
use crate::ports::user_store::UserStore;

use super::auth::{self, require_superuser, CurrentUser};
use super::schemas::{
    ActivateAccountQuery, AdminUserCreate, AdminUserUpdate, ConfirmSignupQuery, ListQuery,
    LoginForm, Message, NewPassword, TickerCreate, TickerPatch, Token, UpdatePassword,
    UserRegister, UserUpdateMe, UsersPublic,
};
use super::{ApiError, AppState};

pub async fn root() -> &'static str {
    "Hello, World!"
}

// ----- Auth ----- //

pub async fn signup(
    State(state): State<Arc<AppState>>,
    Json(body): Json<UserRegister>,
) -> Result<Json<Message>, ApiError> {
    validate_email(&body.email)?;
    validate_password(&body.password)?;
    validate_name("first_name", &body.first_name)?;
    validate_name("last_name", &body.last_name)?;

    if state.user_store.get_by_email(&body.email)?.is_some() {
        return Err(ApiError::bad_request(
            "a user with this email already exists",
        ));
    }

    let hashed = auth::hash_password(&body.password)?;
    let user = User::new(
        body.email,
        hashed,
        body.first_name,
        body.last_name,
        false,
        false,
    );
    state.user_store.insert(&user)?;

    let token = state
        .tokens
        .issue(&user.id.to_string(), state.tokens.confirmation_ttl())?;
    let email = generate_account_confirmation_email(&state.email_settings, &user, &token)?;
    state
        .mailer
        .send(&user.email, &email.subject, &email.html_body)?;

    Ok(Json(Message::new(
        "Your user has been created. Please check your email to activate your account.",
    )))
}

pub async fn confirm_signup(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ConfirmSignupQuery>,
) -> Result<Json<UserPublic>, ApiError> {
    let subject = state
        .tokens
        .verify(&query.token)
        .map_err(|_| ApiError::bad_request("invalid or expired confirmation token"))?;
    let user_id = Uuid::parse_str(&subject)
        .map_err(|_| ApiError::bad_request("invalid or expired confirmation token"))?;

    let user = state
        .user_store
        .activate(user_id)?
        .ok_or_else(|| ApiError::not_found("user not found"))?;

    Ok(Json(UserPublic::from(&user)))
}

pub async fn login_access_token(
    State(state): State<Arc<AppState>>,
    Form(form): Form<LoginForm>,
) -> Result<Json<Token>, ApiError> {
    let user = state
        .user_store
        .get_by_email(&form.username)?
        .ok_or(FauxtickError::InvalidCredentials)?;
    if !auth::verify_password(&form.password, &user.hashed_password)? {
        return Err(FauxtickError::InvalidCredentials.into());
    }
    if !user.is_active {
        return Err(FauxtickError::InactiveUser.into());
    }

    let token = state
        .tokens
        .issue(&user.id.to_string(), state.tokens.access_ttl())?;
    Ok(Json(Token::bearer(token)))
}

pub async fn send_password_reset(
    State(state): State<Arc<AppState>>,
    Path(email): Path<String>,
) -> Result<Json<Message>, ApiError> {
    let user = state
        .user_store
        .get_by_email(&email)?
        .ok_or_else(|| ApiError::not_found("no user with this email exists"))?;

    let token = state.tokens.issue(&user.email, state.tokens.reset_ttl())?;
    let message = generate_password_reset_email(&state.email_settings, &user, &token)?;
    state
        .mailer
        .send(&user.email, &message.subject, &message.html_body)?;

    Ok(Json(Message::new("Password reset email has been sent.")))
}

pub async fn reset_password(
    State(state): State<Arc<AppState>>,
    Json(body): Json<NewPassword>,
) -> Result<Json<Message>, ApiError> {
    let email = state
        .tokens
        .verify(&body.token)
        .map_err(|_| ApiError::bad_request("invalid or expired reset token"))?;
    validate_password(&body.new_password)?;

    let mut user = state
        .user_store
        .get_by_email(&email)?
        .ok_or_else(|| ApiError::not_found("no user with this email exists"))?;
    if !user.is_active {
        return Err(FauxtickError::InactiveUser.into());
    }

    let hashed = auth::hash_password(&body.new_password)?;
    user.apply_update(&UserUpdate {
        hashed_password: Some(hashed),
        ..Default::default()
    });
    state.user_store.update(&user)?;

    Ok(Json(Message::new("Password updated successfully")))
}

pub async fn admin_activate_account(
    State(state): State<Arc<AppState>>,
    CurrentUser(current): CurrentUser,
    Query(query): Query<ActivateAccountQuery>,
) -> Result<Json<UserPublic>, ApiError> {
    require_superuser(&current)?;

    let user = state
        .user_store
        .activate(query.user_id)?
        .ok_or_else(|| ApiError::not_found("user not found"))?;

    Ok(Json(UserPublic::from(&user)))
}

// ----- Current user ----- //

pub async fn read_user_me(CurrentUser(user): CurrentUser) -> Json<UserPublic> {
    Json(UserPublic::from(&user))
}

pub async fn update_user_me(
    State(state): State<Arc<AppState>>,
    CurrentUser(mut user): CurrentUser,
    Json(body): Json<UserUpdateMe>,
) -> Result<Json<UserPublic>, ApiError> {
    if let Some(email) = &body.email {
        validate_email(email)?;
        if let Some(existing) = state.user_store.get_by_email(email)? {
            if existing.id != user.id {
                return Err(ApiError::conflict("user with this email already exists"));
            }
        }
    }
    if let Some(first_name) = &body.first_name {
        validate_name("first_name", first_name)?;
    }
    if let Some(last_name) = &body.last_name {
        validate_name("last_name", last_name)?;
    }

    user.apply_update(&UserUpdate {
        email: body.email,
        first_name: body.first_name,
        last_name: body.last_name,
        ..Default::default()
    });
    state.user_store.update(&user)?;

    Ok(Json(UserPublic::from(&user)))
}

pub async fn update_password_me(
    State(state): State<Arc<AppState>>,
    CurrentUser(mut user): CurrentUser,
    Json(body): Json<UpdatePassword>,
) -> Result<Json<Message>, ApiError> {
    if !auth::verify_password(&body.current_password, &user.hashed_password)? {
        return Err(ApiError::bad_request("incorrect password"));
    }
    if body.current_password == body.new_password {
        return Err(ApiError::bad_request(
            "new password cannot be the same as the current one",
        ));
    }
    validate_password(&body.new_password)?;

    let hashed = auth::hash_password(&body.new_password)?;
    user.apply_update(&UserUpdate {
        hashed_password: Some(hashed),
        ..Default::default()
    });
    state.user_store.update(&user)?;

    Ok(Json(Message::new("Password updated successfully.")))
}

pub async fn delete_user_me(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Message>, ApiError> {
    state.user_store.delete(user.id)?;
    Ok(Json(Message::new("User deleted successfully")))
}

// ----- Admin user management ----- //

pub async fn admin_list_users(
    State(state): State<Arc<AppState>>,
    CurrentUser(current): CurrentUser,
    Query(query): Query<ListQuery>,
) -> Result<Json<UsersPublic>, ApiError> {
    require_superuser(&current)?;

    let page = state.user_store.list(query.skip, query.limit)?;
    Ok(Json(UsersPublic {
        data: page.users.iter().map(UserPublic::from).collect(),
        count: page.count,
    }))
}

pub async fn admin_create_user(
    State(state): State<Arc<AppState>>,
    CurrentUser(current): CurrentUser,
    Json(body): Json<AdminUserCreate>,
) -> Result<Json<UserPublic>, ApiError> {
    require_superuser(&current)?;

    validate_email(&body.email)?;
    validate_password(&body.password)?;
    validate_name("first_name", &body.first_name)?;
    validate_name("last_name", &body.last_name)?;

    if state.user_store.get_by_email(&body.email)?.is_some() {
        return Err(ApiError::bad_request(
            "the user with this email already exists in the system",
        ));
    }

    let hashed = auth::hash_password(&body.password)?;
    let user = User::new(
        body.email,
        hashed,
        body.first_name,
        body.last_name,
        body.is_active,
        body.is_superuser,
    );
    state.user_store.insert(&user)?;

    let token = state
        .tokens
        .issue(&user.id.to_string(), state.tokens.confirmation_ttl())?;
    let email = generate_account_confirmation_email(&state.email_settings, &user, &token)?;
    state
        .mailer
        .send(&user.email, &email.subject, &email.html_body)?;

    Ok(Json(UserPublic::from(&user)))
}

pub async fn admin_read_user(
    State(state): State<Arc<AppState>>,
    CurrentUser(current): CurrentUser,
    Path(user_id): Path<Uuid>,
) -> Result<Json<UserPublic>, ApiError> {
    require_superuser(&current)?;

    let user = state
        .user_store
        .get_by_id(user_id)?
        .ok_or_else(|| ApiError::not_found("user not found"))?;
    Ok(Json(UserPublic::from(&user)))
}

pub async fn admin_update_user(
    State(state): State<Arc<AppState>>,
    CurrentUser(current): CurrentUser,
    Path(user_id): Path<Uuid>,
    Json(body): Json<AdminUserUpdate>,
) -> Result<Json<UserPublic>, ApiError> {
    require_superuser(&current)?;

    let mut user = state
        .user_store
        .get_by_id(user_id)?
        .ok_or_else(|| ApiError::not_found("user not found"))?;

    if let Some(email) = &body.email {
        validate_email(email)?;
        if let Some(existing) = state.user_store.get_by_email(email)? {
            if existing.id != user_id {
                return Err(ApiError::conflict("user with this email already exists"));
            }
        }
    }

    let hashed_password = match &body.password {
        Some(password) => {
            validate_password(password)?;
            Some(auth::hash_password(password)?)
        }
        None => None,
    };

    user.apply_update(&UserUpdate {
        email: body.email,
        hashed_password,
        first_name: body.first_name,
        last_name: body.last_name,
    });
    state.user_store.update(&user)?;

    Ok(Json(UserPublic::from(&user)))
}

pub async fn admin_delete_user(
    State(state): State<Arc<AppState>>,
    CurrentUser(current): CurrentUser,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Message>, ApiError> {
    require_superuser(&current)?;

    let user = state
        .user_store
        .get_by_id(user_id)?
        .ok_or_else(|| ApiError::not_found("user not found"))?;
    if user.id == current.id {
        return Err(ApiError::forbidden("superusers cannot delete themselves"));
    }

    state.user_store.delete(user.id)?;
    Ok(Json(Message::new("User deleted successfully.")))
}

// ----- Tickers ----- //

pub async fn get_ticker(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(code): Path<String>,
) -> Result<Json<TickerDetails>, ApiError> {
    let code = TickerCode::parse(&code)?;
    let details = resolver::resolve(&*state.ticker_store, user.id, &code)?;
    Ok(Json(details))
}

pub async fn list_tickers(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<TickerDetails>>, ApiError> {
    let records = state.ticker_store.list_by_owner(user.id)?;
    let mut details = Vec::with_capacity(records.len());
    for record in &records {
        let code = TickerCode::parse(&record.code)?;
        details.push(resolver::resolve_user_defined(&code, record));
    }
    Ok(Json(details))
}

pub async fn create_ticker(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Json(body): Json<TickerCreate>,
) -> Result<(StatusCode, Json<TickerDetails>), ApiError> {
    let code = TickerCode::parse(&body.ticker_code)?;
    code.validate_user_defined()?;
    validate_name("name", &body.name)?;

    if state
        .ticker_store
        .get_by_owner_and_code(user.id, code.as_str())?
        .is_some()
    {
        return Err(ApiError::conflict(
            "existing ticker with the same code already exists",
        ));
    }

    // Values are stored as supplied; no range check is applied to them.
    let ticker = UserDefinedTicker {
        id: 0,
        user_id: user.id,
        code: code.as_str().to_string(),
        name: body.name,
        description: body.description,
        sector: body.sector,
        drift: body.drift,
        volatility: body.volatility,
        jump_intensity: body.jump_intensity,
        jump_mean: body.jump_mean,
        jump_std_dev: body.jump_std_dev,
    };
    let inserted = state.ticker_store.insert(&ticker)?;

    let details = resolver::resolve_user_defined(&code, &inserted);
    Ok((StatusCode::CREATED, Json(details)))
}

pub async fn update_ticker(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(code): Path<String>,
    Json(body): Json<TickerPatch>,
) -> Result<Json<TickerDetails>, ApiError> {
    let code = TickerCode::parse(&code)?;
    code.validate_user_defined()?;
    if let Some(name) = &body.name {
        validate_name("name", name)?;
    }

    let mut record = state
        .ticker_store
        .get_by_owner_and_code(user.id, code.as_str())?
        .ok_or_else(|| FauxtickError::NotFound {
            what: format!("ticker {code}"),
        })?;

    record.apply_update(&TickerUpdate {
        name: body.name,
        description: body.description,
        sector: body.sector,
        drift: body.drift,
        volatility: body.volatility,
        jump_intensity: body.jump_intensity,
        jump_mean: body.jump_mean,
        jump_std_dev: body.jump_std_dev,
    });
    state.ticker_store.update(&record)?;

    Ok(Json(resolver::resolve_user_defined(&code, &record)))
}
