use chrono::Utc;
use contracts::system::accounts::{Account, CreateAccountDto, RegisterRequest, Role, UpdateAccountDto};
use contracts::system::auth::LoginRequest;
use sea_orm::DatabaseConnection;

use super::repository;
use crate::shared::data::account_store;
use crate::shared::error::{AppError, AppResult};
use crate::system::auth::{password, session};

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

struct NewAccount {
    email: String,
    password: String,
    name: String,
    role: Role,
    contact_number: Option<String>,
    address: Option<String>,
}

async fn create_account(db: &DatabaseConnection, new: NewAccount) -> AppResult<Account> {
    let email = Account::normalize_email(&new.email);
    if email.is_empty() || !email.contains('@') {
        return Err(AppError::Validation("A valid email is required".into()));
    }
    let name = new.name.trim().to_string();
    if name.is_empty() {
        return Err(AppError::Validation("Name is required".into()));
    }
    password::validate_password_strength(&new.password).map_err(AppError::Validation)?;

    if repository::email_taken(db, &email).await? {
        return Err(AppError::Conflict(format!(
            "An account with email {} already exists",
            email
        )));
    }

    let password_hash = password::hash_password(&new.password)?;
    let now = Utc::now().to_rfc3339();
    let account = Account {
        id: uuid::Uuid::new_v4().to_string(),
        email,
        name,
        role: new.role,
        contact_number: non_blank(new.contact_number),
        address: non_blank(new.address),
        created_at: now.clone(),
        updated_at: now,
        last_login_at: None,
    };
    repository::insert(db, &account, &password_hash).await?;
    tracing::info!("Account {} created ({})", account.email, account.role.as_str());
    Ok(account)
}

/// Self-registration; always a customer
pub async fn register(db: &DatabaseConnection, request: RegisterRequest) -> AppResult<Account> {
    create_account(
        db,
        NewAccount {
            email: request.email,
            password: request.password,
            name: request.name,
            role: Role::Customer,
            contact_number: request.contact_number,
            address: request.address,
        },
    )
    .await
}

/// Staff-created account with an explicit role
pub async fn create(db: &DatabaseConnection, dto: CreateAccountDto) -> AppResult<Account> {
    create_account(
        db,
        NewAccount {
            email: dto.email,
            password: dto.password,
            name: dto.name,
            role: dto.role,
            contact_number: dto.contact_number,
            address: dto.address,
        },
    )
    .await
}

/// Email, password and role must all match; returns a new session token
pub async fn authenticate(db: &DatabaseConnection, request: &LoginRequest) -> AppResult<(String, Account)> {
    let rejected = || AppError::Auth("Invalid email, password or role".into());

    let email = Account::normalize_email(&request.email);
    let (account, hash) = repository::get_credentials(db, &email)
        .await?
        .ok_or_else(rejected)?;
    if !password::verify_password(&request.password, &hash)? {
        return Err(rejected());
    }
    if account.role != request.role {
        tracing::warn!(
            "Login of {} as {} refused: account role is {}",
            account.email,
            request.role.as_str(),
            account.role.as_str()
        );
        return Err(rejected());
    }

    let token = session::create(db, &account.id).await?;
    let now = Utc::now().to_rfc3339();
    repository::update_last_login(db, &account.id, &now).await?;
    Ok((
        token,
        Account {
            last_login_at: Some(now),
            ..account
        },
    ))
}

/// Account behind a bearer token
pub async fn current_session(db: &DatabaseConnection, token: &str) -> AppResult<Account> {
    let account_id = session::resolve(db, token)
        .await?
        .ok_or_else(|| AppError::Auth("Not signed in".into()))?;
    repository::get_by_id(db, &account_id)
        .await?
        .ok_or_else(|| AppError::Auth("Not signed in".into()))
}

pub async fn logout(db: &DatabaseConnection, token: &str) -> AppResult<()> {
    session::revoke(db, token).await?;
    Ok(())
}

pub async fn list(db: &DatabaseConnection) -> AppResult<Vec<Account>> {
    Ok(repository::list_all(db).await?)
}

pub async fn get(db: &DatabaseConnection, id: &str) -> AppResult<Account> {
    repository::get_by_id(db, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Account {}", id)))
}

pub async fn update(db: &DatabaseConnection, id: &str, dto: UpdateAccountDto) -> AppResult<Account> {
    let mut account = get(db, id).await?;
    if let Some(name) = dto.name {
        let name = name.trim().to_string();
        if name.is_empty() {
            return Err(AppError::Validation("Name is required".into()));
        }
        account.name = name;
    }
    if dto.contact_number.is_some() {
        account.contact_number = non_blank(dto.contact_number);
    }
    if dto.address.is_some() {
        account.address = non_blank(dto.address);
    }
    account.updated_at = Utc::now().to_rfc3339();
    repository::update_profile(db, &account).await?;
    Ok(account)
}

/// Soft delete; sessions are revoked and per-account state dropped. Orders stay.
pub async fn delete(db: &DatabaseConnection, id: &str) -> AppResult<()> {
    if !repository::soft_delete(db, id, &Utc::now().to_rfc3339()).await? {
        return Err(AppError::not_found(format!("Account {}", id)));
    }
    session::revoke_all_for_account(db, id).await?;
    account_store::remove_all(db, id).await?;
    tracing::info!("Account {} deleted", id);
    Ok(())
}
