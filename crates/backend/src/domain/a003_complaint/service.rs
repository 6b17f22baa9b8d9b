use contracts::domain::a003_complaint::{
    Complaint, ComplaintId, ComplaintStatus, FileComplaintRequest,
};
use contracts::domain::common::{AggregateId, AggregateRoot, EntityMetadata};
use contracts::system::accounts::{Account, Role};
use sea_orm::{DatabaseConnection, TransactionTrait};

use super::repository;
use crate::domain::a002_order::service as order_service;
use crate::shared::data::sequence::{self, COMPLAINT_SEQUENCE};
use crate::shared::error::{AppError, AppResult};
use crate::shared::logger;

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// File a complaint as `viewer`, optionally about one of their orders (UUID or code)
pub async fn file_complaint(
    db: &DatabaseConnection,
    viewer: &Account,
    request: FileComplaintRequest,
) -> AppResult<Complaint> {
    Complaint::validate_description(&request.description).map_err(AppError::Validation)?;

    let order = match non_blank(request.order_id) {
        Some(key) => Some(order_service::get_visible_to(db, &key, viewer).await?),
        None => None,
    };

    let txn = db.begin().await?;
    let number = sequence::next_value(&txn, COMPLAINT_SEQUENCE).await?;
    let complaint = Complaint {
        id: ComplaintId::new(uuid::Uuid::new_v4()),
        code: Complaint::code_for(number),
        customer_id: viewer.id.clone(),
        customer_email: viewer.email.clone(),
        order_id: order.as_ref().map(|o| o.to_string_id()),
        order_code: order.as_ref().map(|o| o.code.clone()),
        issue: non_blank(request.issue),
        description: request.description.trim().to_string(),
        image_ref: non_blank(request.image_ref),
        status: ComplaintStatus::Open,
        metadata: EntityMetadata::new(),
    };
    repository::insert(&txn, &complaint).await?;
    txn.commit().await?;

    logger::log(
        db,
        &Complaint::full_name(),
        &format!(
            "Complaint {} filed by {}{}",
            complaint.code,
            complaint.customer_email,
            complaint
                .order_code
                .as_deref()
                .map(|c| format!(" about {}", c))
                .unwrap_or_default()
        ),
    );
    Ok(complaint)
}

/// Look up by UUID or by code ("CMP-000003")
pub async fn get(db: &DatabaseConnection, key: &str) -> AppResult<Complaint> {
    let found = match ComplaintId::from_string(key) {
        Ok(id) => repository::get_by_id(db, id).await?,
        Err(_) => repository::get_by_code(db, key).await?,
    };
    found.ok_or_else(|| AppError::not_found(format!("Complaint {}", key)))
}

pub async fn get_visible_to(db: &DatabaseConnection, key: &str, viewer: &Account) -> AppResult<Complaint> {
    let complaint = get(db, key).await?;
    if viewer.role != Role::Admin && complaint.customer_id != viewer.id {
        return Err(AppError::not_found(format!("Complaint {}", key)));
    }
    Ok(complaint)
}

pub async fn list_all(db: &DatabaseConnection) -> AppResult<Vec<Complaint>> {
    Ok(repository::list_all(db).await?)
}

pub async fn list_for_account(db: &DatabaseConnection, account_id: &str) -> AppResult<Vec<Complaint>> {
    Ok(repository::list_for_customer(db, account_id).await?)
}

/// Staff status update; any status may follow any other
pub async fn update_status(
    db: &DatabaseConnection,
    key: &str,
    status: ComplaintStatus,
) -> AppResult<Complaint> {
    let mut complaint = get(db, key).await?;
    if complaint.status != status {
        let from = complaint.status;
        complaint.set_status(status);
        repository::save_status(db, &complaint).await?;
        logger::log(
            db,
            &Complaint::full_name(),
            &format!(
                "Complaint {} moved from {} to {}",
                complaint.code,
                from.as_str(),
                status.as_str()
            ),
        );
    }
    Ok(complaint)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::a002_order::service::{create_order, customer_of, OrderSource};
    use crate::shared::data::db::test_support::{seed_customer, seed_menu_item, test_db};
    use crate::usecases::u501_cart::events::CartEvents;
    use contracts::domain::a002_order::{Order, OrderLine};
    use contracts::usecases::u502_checkout::{CheckoutDraft, CheckoutSummary, FinalizedCheckout};

    async fn order_for(db: &DatabaseConnection, account: &Account) -> Order {
        let item = seed_menu_item(db, "Chef Salad", 199.0).await;
        let draft = CheckoutDraft {
            delivery_address: "12 Mabini St".into(),
            contact_number: "09123456789".into(),
            ..Default::default()
        };
        let checkout =
            FinalizedCheckout::from_draft(&draft, CheckoutSummary::compute(199.0, 0.0)).unwrap();
        create_order(
            db,
            &CartEvents::new(),
            &customer_of(account),
            vec![OrderLine {
                menu_item_id: item.id,
                name: item.name,
                unit_price: item.price,
                quantity: 1,
            }],
            &checkout,
            OrderSource::Checkout,
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_short_description_rejected() {
        let (_dir, db) = test_db().await;
        let account = seed_customer(&db, "a@x.com").await;
        let request = FileComplaintRequest {
            description: "bad".into(),
            ..Default::default()
        };
        assert!(matches!(
            file_complaint(&db, &account, request).await,
            Err(AppError::Validation(_))
        ));
        assert!(list_all(&db).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_complaint_starts_open_and_links_order() {
        let (_dir, db) = test_db().await;
        let account = seed_customer(&db, "a@x.com").await;
        let order = order_for(&db, &account).await;

        let complaint = file_complaint(
            &db,
            &account,
            FileComplaintRequest {
                order_id: Some(order.code.clone()),
                issue: Some("Cold food".into()),
                description: "Food arrived cold".into(),
                image_ref: None,
            },
        )
        .await
        .unwrap();
        assert_eq!(complaint.status, ComplaintStatus::Open);
        assert_eq!(complaint.code, "CMP-000001");
        assert_eq!(complaint.order_code.as_deref(), Some(order.code.as_str()));
        assert_eq!(complaint.order_id, Some(order.to_string_id()));

        let mine = list_for_account(&db, &account.id).await.unwrap();
        assert_eq!(mine.len(), 1);
    }

    #[tokio::test]
    async fn test_cannot_complain_about_someone_elses_order() {
        let (_dir, db) = test_db().await;
        let owner = seed_customer(&db, "a@x.com").await;
        let other = seed_customer(&db, "b@x.com").await;
        let order = order_for(&db, &owner).await;
        let request = FileComplaintRequest {
            order_id: Some(order.code),
            description: "Food arrived cold".into(),
            ..Default::default()
        };
        assert!(matches!(
            file_complaint(&db, &other, request).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_status_moves_freely() {
        let (_dir, db) = test_db().await;
        let account = seed_customer(&db, "a@x.com").await;
        let complaint = file_complaint(
            &db,
            &account,
            FileComplaintRequest {
                description: "Rider was very rude".into(),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let resolved = update_status(&db, &complaint.code, ComplaintStatus::Resolved).await.unwrap();
        assert_eq!(resolved.status, ComplaintStatus::Resolved);
        let reopened = update_status(&db, &complaint.code, ComplaintStatus::Open).await.unwrap();
        assert_eq!(reopened.status, ComplaintStatus::Open);
        assert_eq!(get(&db, &complaint.code).await.unwrap().status, ComplaintStatus::Open);
    }
}
