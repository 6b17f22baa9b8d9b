use anyhow::{Context, Result};
use contracts::system::accounts::{Account, Role};
use sea_orm::{ConnectionTrait, DatabaseBackend, QueryResult, Statement};

const ACCOUNT_COLUMNS: &str =
    "id, email, name, role, contact_number, address, created_at, updated_at, last_login_at";

fn row_to_account(row: &QueryResult) -> Result<Account> {
    let role: String = row.try_get("", "role")?;
    Ok(Account {
        id: row.try_get("", "id")?,
        email: row.try_get("", "email")?,
        name: row.try_get("", "name")?,
        role: Role::parse(&role).ok_or_else(|| anyhow::anyhow!("Unknown role '{}'", role))?,
        contact_number: row.try_get("", "contact_number")?,
        address: row.try_get("", "address")?,
        created_at: row.try_get("", "created_at")?,
        updated_at: row.try_get("", "updated_at")?,
        last_login_at: row.try_get("", "last_login_at")?,
    })
}

/// Create account with password hash
pub async fn insert<C: ConnectionTrait>(conn: &C, account: &Account, password_hash: &str) -> Result<()> {
    conn.execute(Statement::from_sql_and_values(
        DatabaseBackend::Sqlite,
        "INSERT INTO sys_accounts (id, email, password_hash, name, role, contact_number, address, created_at, updated_at, last_login_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        [
            account.id.clone().into(),
            account.email.clone().into(),
            password_hash.to_string().into(),
            account.name.clone().into(),
            account.role.as_str().to_string().into(),
            account.contact_number.clone().into(),
            account.address.clone().into(),
            account.created_at.clone().into(),
            account.updated_at.clone().into(),
            account.last_login_at.clone().into(),
        ],
    ))
    .await
    .context("Failed to insert account")?;
    Ok(())
}

pub async fn get_by_id<C: ConnectionTrait>(conn: &C, id: &str) -> Result<Option<Account>> {
    let row = conn
        .query_one(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            &format!("SELECT {ACCOUNT_COLUMNS} FROM sys_accounts WHERE id = ? AND is_deleted = 0"),
            [id.into()],
        ))
        .await?;
    row.as_ref().map(row_to_account).transpose()
}

/// Lookup by normalized email, including soft-deleted accounts
pub async fn email_taken<C: ConnectionTrait>(conn: &C, email: &str) -> Result<bool> {
    let row = conn
        .query_one(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "SELECT id FROM sys_accounts WHERE email = ?",
            [email.into()],
        ))
        .await?;
    Ok(row.is_some())
}

pub async fn get_by_email<C: ConnectionTrait>(conn: &C, email: &str) -> Result<Option<Account>> {
    let row = conn
        .query_one(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            &format!("SELECT {ACCOUNT_COLUMNS} FROM sys_accounts WHERE email = ? AND is_deleted = 0"),
            [email.into()],
        ))
        .await?;
    row.as_ref().map(row_to_account).transpose()
}

/// Account together with its stored password hash
pub async fn get_credentials<C: ConnectionTrait>(conn: &C, email: &str) -> Result<Option<(Account, String)>> {
    let row = conn
        .query_one(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            &format!(
                "SELECT {ACCOUNT_COLUMNS}, password_hash FROM sys_accounts WHERE email = ? AND is_deleted = 0"
            ),
            [email.into()],
        ))
        .await?;
    match row {
        Some(row) => {
            let account = row_to_account(&row)?;
            let hash: String = row.try_get("", "password_hash")?;
            Ok(Some((account, hash)))
        }
        None => Ok(None),
    }
}

pub async fn list_all<C: ConnectionTrait>(conn: &C) -> Result<Vec<Account>> {
    let rows = conn
        .query_all(Statement::from_string(
            DatabaseBackend::Sqlite,
            format!("SELECT {ACCOUNT_COLUMNS} FROM sys_accounts WHERE is_deleted = 0 ORDER BY created_at"),
        ))
        .await?;
    rows.iter().map(row_to_account).collect()
}

/// Profile fields only; email, role and password are not edited here
pub async fn update_profile<C: ConnectionTrait>(conn: &C, account: &Account) -> Result<()> {
    conn.execute(Statement::from_sql_and_values(
        DatabaseBackend::Sqlite,
        "UPDATE sys_accounts SET name = ?, contact_number = ?, address = ?, updated_at = ? WHERE id = ?",
        [
            account.name.clone().into(),
            account.contact_number.clone().into(),
            account.address.clone().into(),
            account.updated_at.clone().into(),
            account.id.clone().into(),
        ],
    ))
    .await?;
    Ok(())
}

pub async fn update_last_login<C: ConnectionTrait>(conn: &C, id: &str, at: &str) -> Result<()> {
    conn.execute(Statement::from_sql_and_values(
        DatabaseBackend::Sqlite,
        "UPDATE sys_accounts SET last_login_at = ? WHERE id = ?",
        [at.into(), id.into()],
    ))
    .await?;
    Ok(())
}

pub async fn soft_delete<C: ConnectionTrait>(conn: &C, id: &str, at: &str) -> Result<bool> {
    let result = conn
        .execute(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "UPDATE sys_accounts SET is_deleted = 1, updated_at = ? WHERE id = ? AND is_deleted = 0",
            [at.into(), id.into()],
        ))
        .await?;
    Ok(result.rows_affected() > 0)
}
