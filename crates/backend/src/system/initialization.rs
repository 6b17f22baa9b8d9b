use anyhow::Result;
use contracts::system::accounts::{Account, CreateAccountDto, Role};
use sea_orm::DatabaseConnection;

use crate::shared::config::AdminConfig;
use crate::system::accounts::{repository, service};

/// Provision the configured administrator unless an account with that email exists
pub async fn ensure_admin_account_exists(db: &DatabaseConnection, admin: &AdminConfig) -> Result<()> {
    let email = Account::normalize_email(&admin.email);
    if let Some(existing) = repository::get_by_email(db, &email).await? {
        if existing.role != Role::Admin {
            tracing::warn!(
                "Configured admin {} exists with role {}; admin login will be refused",
                existing.email,
                existing.role.as_str()
            );
        }
        return Ok(());
    }

    tracing::info!("No admin account found. Creating {}...", email);
    let account = service::create(
        db,
        CreateAccountDto {
            email,
            password: admin.password.clone(),
            name: admin.name.clone(),
            role: Role::Admin,
            contact_number: None,
            address: None,
        },
    )
    .await?;

    tracing::warn!("═══════════════════════════════════════════════");
    tracing::warn!("  Admin account created: {}", account.email);
    tracing::warn!("  Password comes from [admin] in config.toml");
    tracing::warn!("  ⚠️  CHANGE IT BEFORE EXPOSING THE SERVER!");
    tracing::warn!("═══════════════════════════════════════════════");
    Ok(())
}
