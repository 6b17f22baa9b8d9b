use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
    Json,
};
use contracts::domain::a001_menu_item::MenuItemId;
use contracts::usecases::u501_cart::{AddToCartRequest, CartChanged, CartView, SetQuantityRequest};
use futures::future;
use futures::stream::{self, Stream, StreamExt};
use std::convert::Infallible;
use tokio_stream::wrappers::{errors::BroadcastStreamRecvError, BroadcastStream};

use crate::shared::app_state::AppState;
use crate::shared::error::AppError;
use crate::shared::extract::{AppJson, AppPath};
use crate::system::accounts::service as account_service;
use crate::system::auth::extractor::{CurrentAccount, SessionToken};
use crate::usecases::u501_cart::service;

/// GET /api/cart
pub async fn get_cart(
    State(state): State<AppState>,
    current: CurrentAccount,
) -> Result<Json<CartView>, AppError> {
    Ok(Json(service::get_cart(&state.db, current.id()).await?))
}

/// POST /api/cart/items
pub async fn add_item(
    State(state): State<AppState>,
    current: CurrentAccount,
    AppJson(request): AppJson<AddToCartRequest>,
) -> Result<Json<CartView>, AppError> {
    let view = service::add_item(&state.db, &state.cart_events, current.id(), request).await?;
    Ok(Json(view))
}

/// PUT /api/cart/items/:menu_item_id
pub async fn set_quantity(
    State(state): State<AppState>,
    current: CurrentAccount,
    AppPath(menu_item_id): AppPath<i32>,
    AppJson(request): AppJson<SetQuantityRequest>,
) -> Result<Json<CartView>, AppError> {
    let view = service::set_quantity(
        &state.db,
        &state.cart_events,
        current.id(),
        MenuItemId(menu_item_id),
        request.quantity,
    )
    .await?;
    Ok(Json(view))
}

/// DELETE /api/cart/items/:menu_item_id
pub async fn remove_item(
    State(state): State<AppState>,
    current: CurrentAccount,
    AppPath(menu_item_id): AppPath<i32>,
) -> Result<Json<CartView>, AppError> {
    let view = service::remove_item(&state.db, &state.cart_events, current.id(), MenuItemId(menu_item_id)).await?;
    Ok(Json(view))
}

fn cart_event(changed: &CartChanged) -> Option<Event> {
    Event::default().event("cart").json_data(changed).ok()
}

/// What one upstream message means for an open cart stream
enum StreamStep {
    Emit(Event),
    Skip,
    End,
}

/// GET /api/cart/events
///
/// Server-Sent Events with the caller's cart item count: the current value first,
/// then one event per change. The stream ends once the session it was opened with
/// is revoked (logout or account deletion).
pub async fn events(
    State(state): State<AppState>,
    current: CurrentAccount,
    SessionToken(token): SessionToken,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, AppError> {
    let account_id = current.id().to_string();
    // Subscribe before reading so no change between the two is lost
    let changes = state.cart_events.subscribe();
    let session_ends = state.cart_events.subscribe_session_ends();
    let initial = CartChanged {
        account_id: account_id.clone(),
        item_count: service::get_cart(&state.db, &account_id).await?.item_count,
    };

    let owner = account_id.clone();
    let changes = BroadcastStream::new(changes).map(move |message| match message {
        Ok(changed) if changed.account_id == owner => {
            cart_event(&changed).map_or(StreamStep::Skip, StreamStep::Emit)
        }
        Ok(_) => StreamStep::Skip,
        Err(BroadcastStreamRecvError::Lagged(skipped)) => {
            tracing::warn!("cart event stream for {} skipped {} events", owner, skipped);
            StreamStep::Skip
        }
    });

    let db = state.db.clone();
    let session_ends = BroadcastStream::new(session_ends).then(move |message| {
        let db = db.clone();
        let token = token.clone();
        let account_id = account_id.clone();
        async move {
            match message {
                Ok(ended) if ended != account_id => StreamStep::Skip,
                // Ours, or possibly missed while lagging
                _ => match account_service::current_session(&db, &token).await {
                    Ok(_) => StreamStep::Skip,
                    Err(e) => {
                        tracing::info!("closing cart event stream for {}: {}", account_id, e);
                        StreamStep::End
                    }
                },
            }
        }
    });

    let updates = stream::select(changes, session_ends)
        .take_while(|step| future::ready(!matches!(step, StreamStep::End)))
        .filter_map(|step| {
            future::ready(match step {
                StreamStep::Emit(event) => Some(Ok(event)),
                _ => None,
            })
        });
    let stream = stream::iter(cart_event(&initial).map(Ok)).chain(updates);

    Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
}
