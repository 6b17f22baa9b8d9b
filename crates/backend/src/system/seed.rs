use anyhow::Result;
use contracts::domain::a001_menu_item::{Availability, MenuItem, MenuItemDto};
use contracts::domain::a002_order::{OrderLine, PaymentMethod};
use contracts::domain::a003_complaint::FileComplaintRequest;
use contracts::domain::a004_promotion::{PromotionDto, PromotionKind, PromotionStatus, UsageLimit};
use contracts::shared::money::format_peso;
use contracts::system::accounts::{Account, RegisterRequest};
use contracts::usecases::u502_checkout::{CheckoutDraft, CheckoutSummary, FinalizedCheckout};
use sea_orm::DatabaseConnection;

use crate::domain::{a001_menu_item, a002_order, a003_complaint, a004_promotion};
use crate::shared::config::Config;
use crate::shared::data::db;
use crate::system::accounts::{repository as account_repository, service as account_service};
use crate::system::initialization;
use crate::usecases::u501_cart::events::CartEvents;

const CUSTOMER_EMAIL: &str = "alice@example.com";

/// Fixture rows for a fresh install. Each group is skipped when rows of that kind exist.
pub async fn run(conn: &DatabaseConnection, config: &Config, reset: bool) -> Result<()> {
    if reset {
        tracing::warn!("Resetting database schema");
        db::reset_schema(conn).await?;
    }

    initialization::ensure_admin_account_exists(conn, &config.admin).await?;
    let customer = seed_customer(conn).await?;
    let menu = seed_menu(conn).await?;
    seed_order(conn, &customer, &menu).await?;
    seed_complaint(conn, &customer).await?;
    seed_promotion(conn).await?;

    tracing::info!("Database seeding complete");
    Ok(())
}

async fn seed_customer(conn: &DatabaseConnection) -> Result<Account> {
    if let Some(account) = account_repository::get_by_email(conn, CUSTOMER_EMAIL).await? {
        tracing::info!("Customer {} already exists, skipping", CUSTOMER_EMAIL);
        return Ok(account);
    }
    let account = account_service::register(
        conn,
        RegisterRequest {
            email: CUSTOMER_EMAIL.to_string(),
            password: "alice123".to_string(),
            name: "Alice Santos".to_string(),
            contact_number: Some("09123456789".to_string()),
            address: Some("123 Rizal St, Manila".to_string()),
        },
    )
    .await?;
    tracing::info!("Inserted customer {}", account.email);
    Ok(account)
}

async fn seed_menu(conn: &DatabaseConnection) -> Result<Vec<MenuItem>> {
    let existing = a001_menu_item::repository::list_all(conn).await?;
    if !existing.is_empty() {
        tracing::info!("Menu items already exist, skipping");
        return Ok(existing);
    }
    let dishes = [
        ("Chef Salad", "Greens, ham, egg and cheese", 199.0, "Salads"),
        ("Spaghetti Bolognese", "Beef ragù over spaghetti", 249.0, "Pasta"),
    ];
    let mut items = Vec::with_capacity(dishes.len());
    for (name, description, price, category) in dishes {
        let item = a001_menu_item::service::create(
            conn,
            MenuItemDto {
                name: Some(name.to_string()),
                description: Some(description.to_string()),
                price: Some(price),
                category: Some(category.to_string()),
                image: None,
                availability: Some(Availability::Available),
            },
        )
        .await?;
        items.push(item);
    }
    tracing::info!("Inserted {} menu items", items.len());
    Ok(items)
}

async fn seed_order(conn: &DatabaseConnection, customer: &Account, menu: &[MenuItem]) -> Result<()> {
    if !a002_order::repository::list_for_customer(conn, &customer.id).await?.is_empty() {
        tracing::info!("Orders already exist, skipping");
        return Ok(());
    }
    let lines: Vec<OrderLine> = menu
        .iter()
        .take(2)
        .zip([1u32, 2])
        .map(|(item, quantity)| OrderLine {
            menu_item_id: item.id,
            name: item.name.clone(),
            unit_price: item.price,
            quantity,
        })
        .collect();
    if lines.is_empty() {
        return Ok(());
    }
    let subtotal = lines.iter().map(OrderLine::line_total).sum();
    let draft = CheckoutDraft {
        delivery_address: customer.address.clone().unwrap_or_default(),
        contact_number: customer.contact_number.clone().unwrap_or_default(),
        payment_method: PaymentMethod::CashOnDelivery,
        special_instructions: None,
        promo_code: None,
    };
    let checkout = FinalizedCheckout::from_draft(&draft, CheckoutSummary::compute(subtotal, 0.0))
        .map_err(anyhow::Error::msg)?;
    let order = a002_order::service::create_order(
        conn,
        &CartEvents::new(),
        &a002_order::service::customer_of(customer),
        lines,
        &checkout,
        a002_order::service::OrderSource::Staff,
    )
    .await?;
    tracing::info!("Inserted order {} ({})", order.code, format_peso(order.total));
    Ok(())
}

async fn seed_complaint(conn: &DatabaseConnection, customer: &Account) -> Result<()> {
    if !a003_complaint::repository::list_for_customer(conn, &customer.id).await?.is_empty() {
        tracing::info!("Complaints already exist, skipping");
        return Ok(());
    }
    let order_id = a002_order::repository::list_for_customer(conn, &customer.id)
        .await?
        .first()
        .map(|o| o.code.clone());
    let complaint = a003_complaint::service::file_complaint(
        conn,
        customer,
        FileComplaintRequest {
            order_id,
            issue: Some("Late delivery".to_string()),
            description: "The order arrived an hour after the estimate.".to_string(),
            image_ref: None,
        },
    )
    .await?;
    tracing::info!("Inserted complaint {}", complaint.code);
    Ok(())
}

async fn seed_promotion(conn: &DatabaseConnection) -> Result<()> {
    if a004_promotion::repository::get_by_code(conn, "WELCOME10").await?.is_some() {
        tracing::info!("Promotion WELCOME10 already exists, skipping");
        return Ok(());
    }
    a004_promotion::service::create(
        conn,
        PromotionDto {
            code: Some("WELCOME10".to_string()),
            description: Some("10% off your first order".to_string()),
            kind: Some(PromotionKind::Percentage),
            value: Some(10.0),
            usage_limit: Some(UsageLimit::OneTime),
            status: Some(PromotionStatus::Active),
        },
    )
    .await?;
    tracing::info!("Inserted promotion WELCOME10");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::data::db::test_support::test_db;

    #[tokio::test]
    async fn test_seed_is_repeatable() {
        let (_dir, conn) = test_db().await;
        let config = Config::default();
        run(&conn, &config, false).await.unwrap();
        run(&conn, &config, false).await.unwrap();

        assert_eq!(account_repository::list_all(&conn).await.unwrap().len(), 2);
        assert_eq!(a001_menu_item::repository::list_all(&conn).await.unwrap().len(), 2);
        let orders = a002_order::repository::list_all(&conn).await.unwrap();
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].subtotal, 697.0);
        assert_eq!(orders[0].total, 717.0);
        assert_eq!(a003_complaint::repository::list_all(&conn).await.unwrap().len(), 1);
        assert!(a004_promotion::repository::get_by_code(&conn, "welcome10")
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn test_reset_starts_over() {
        let (_dir, conn) = test_db().await;
        let config = Config::default();
        run(&conn, &config, false).await.unwrap();
        run(&conn, &config, true).await.unwrap();
        let orders = a002_order::repository::list_all(&conn).await.unwrap();
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].code, "ORD-000001");
    }
}
