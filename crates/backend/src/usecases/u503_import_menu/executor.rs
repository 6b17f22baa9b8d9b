use super::menu_api_client::{FetchOutcome, HttpMenuSource, MenuSource};
use contracts::domain::a001_menu_item::MenuItem;
use contracts::domain::a001_menu_item::MenuItemId;
use contracts::usecases::u503_import_menu::{ImportMenuRequest, ImportMenuResponse, ImportOutcome};
use sea_orm::DatabaseConnection;

use crate::domain::a001_menu_item::repository as menu_repository;
use crate::shared::config::MenuImportConfig;
use crate::shared::error::{AppError, AppResult};
use crate::shared::logger;

/// Pulls a remote menu and upserts it into the catalog by item name
pub struct ImportExecutor<S: MenuSource> {
    source: S,
}

impl ImportExecutor<HttpMenuSource> {
    /// HTTP-backed executor; the request URL wins over the configured one
    pub fn from_request(config: &MenuImportConfig, request: &ImportMenuRequest) -> AppResult<Self> {
        let url = request
            .source_url
            .clone()
            .filter(|u| !u.trim().is_empty())
            .or_else(|| config.url.clone())
            .ok_or_else(|| AppError::Validation("No menu source URL configured".into()))?;
        Ok(Self::new(HttpMenuSource::new(url, config.timeout())?))
    }
}

impl<S: MenuSource> ImportExecutor<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    pub async fn run(&self, db: &DatabaseConnection) -> AppResult<ImportMenuResponse> {
        let items = match self.source.fetch_menu().await {
            FetchOutcome::Loaded(items) => items,
            FetchOutcome::Empty => {
                logger::log(db, "u503_import_menu", "Menu source returned no items");
                return Ok(ImportMenuResponse::empty());
            }
            FetchOutcome::Failed(reason) => {
                logger::log(db, "u503_import_menu", &format!("Menu import failed: {}", reason));
                return Ok(ImportMenuResponse::failed(reason));
            }
        };

        let mut response = ImportMenuResponse {
            outcome: ImportOutcome::Loaded,
            fetched: items.len(),
            ..ImportMenuResponse::empty()
        };
        for remote in &items {
            let dto = remote.to_dto();
            if let Err(reason) = dto.validate_for_create() {
                tracing::warn!("Skipping remote menu item '{}': {}", remote.name, reason);
                response.skipped += 1;
                continue;
            }
            match menu_repository::find_by_name(db, remote.name.trim()).await? {
                Some(mut existing) => {
                    existing.apply_patch(&dto);
                    existing.metadata.before_write();
                    menu_repository::update(db, &existing).await?;
                    response.updated += 1;
                }
                None => {
                    let mut item = MenuItem::from_dto(MenuItemId(0), &dto).map_err(AppError::Validation)?;
                    item.metadata.before_write();
                    menu_repository::insert(db, &item).await?;
                    response.created += 1;
                }
            }
        }

        logger::log(
            db,
            "u503_import_menu",
            &format!(
                "Menu import: {} fetched, {} created, {} updated, {} skipped",
                response.fetched, response.created, response.updated, response.skipped
            ),
        );
        Ok(response)
    }
}
