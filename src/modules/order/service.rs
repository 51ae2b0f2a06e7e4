use chrono::NaiveDateTime;
use std::sync::Arc;

use super::repository::{self, ConfirmationStatus, CreateOrderPayload, FullOrder, NewOrderGraph, Order};
use crate::{
    modules::notification::service::{self as notification, Notification},
    types::Context,
};

/// Confirmation emails are given up on after this many failed deliveries.
pub const MAX_CONFIRMATION_ATTEMPTS: i32 = 5;

/// How long an order may sit `PENDING` before the retry job takes it over.
pub const PENDING_CONFIRMATION_GRACE_MINUTES: i32 = 10;

#[derive(Debug)]
pub enum Error {
    UnexpectedError,
}

impl From<repository::Error> for Error {
    fn from(_: repository::Error) -> Self {
        Error::UnexpectedError
    }
}

pub enum SaveOrderOutcome {
    Created(Order),
    AlreadySaved(Order),
}

/// Persists a paid checkout. A payment session maps to at most one order, so
/// repeating the call hands back the order saved the first time.
pub async fn save_order(
    ctx: Arc<Context>,
    payload: CreateOrderPayload,
    now: NaiveDateTime,
) -> Result<SaveOrderOutcome, Error> {
    let session_id = payload.stripe_session_id.clone();

    if let Some(order) = repository::find_by_session_id(&ctx.db_conn.pool, session_id.clone()).await? {
        tracing::info!("Order {} already saved for session {}", order.id, session_id);
        return Ok(SaveOrderOutcome::AlreadySaved(order));
    }

    let graph = NewOrderGraph::build(payload, now);

    let mut tx = ctx.db_conn.pool.begin().await.map_err(|err| {
        tracing::error!("Failed to start transaction: {}", err);
        Error::UnexpectedError
    })?;

    let order = match repository::create(&mut *tx, graph).await {
        Ok(order) => order,
        Err(repository::Error::DuplicateSession) => {
            if let Err(err) = tx.rollback().await {
                tracing::error!("Failed to roll back transaction: {}", err);
            }

            return repository::find_by_session_id(&ctx.db_conn.pool, session_id)
                .await?
                .map(SaveOrderOutcome::AlreadySaved)
                .ok_or(Error::UnexpectedError);
        }
        Err(err) => return Err(err.into()),
    };

    tx.commit().await.map_err(|err| {
        tracing::error!("Failed to commit transaction: {}", err);
        Error::UnexpectedError
    })?;

    tracing::info!("Saved order {} for session {}", order.id, session_id);

    Ok(SaveOrderOutcome::Created(order))
}

pub async fn deliver_confirmation(ctx: Arc<Context>, order: FullOrder) -> ConfirmationStatus {
    let order_id = order.order.id.clone();

    match notification::send(ctx, Notification::order_confirmed(order)).await {
        Ok(_) => ConfirmationStatus::Sent,
        Err(_) => {
            tracing::warn!("Confirmation email for order {} was not sent", order_id);
            ConfirmationStatus::Failed
        }
    }
}

/// Emails the customer a summary of their order and stores the outcome on
/// the order. Never fails: problems are logged and recorded as `FAILED`.
pub async fn send_confirmation(ctx: Arc<Context>, order_id: String) -> ConfirmationStatus {
    let status = match repository::find_full_order_by_id(&ctx.db_conn.pool, order_id.clone()).await {
        Ok(Some(order)) => deliver_confirmation(ctx.clone(), order).await,
        Ok(None) => {
            tracing::error!("Order {} vanished before its confirmation was sent", order_id);
            ConfirmationStatus::Failed
        }
        Err(_) => ConfirmationStatus::Failed,
    };

    if repository::record_confirmation(&ctx.db_conn.pool, order_id.clone(), status.clone())
        .await
        .is_err()
    {
        tracing::error!("Failed to record confirmation status for order {}", order_id);
    }

    status
}

/// Returns how many of the retried confirmations went out.
pub async fn retry_failed_confirmations(ctx: Arc<Context>) -> Result<usize, Error> {
    let order_ids = repository::find_ids_awaiting_confirmation(
        &ctx.db_conn.pool,
        MAX_CONFIRMATION_ATTEMPTS,
        PENDING_CONFIRMATION_GRACE_MINUTES,
    )
    .await?;

    tracing::debug!("Retrying {} order confirmations", order_ids.len());

    let mut sent = 0;
    for order_id in order_ids {
        if send_confirmation(ctx.clone(), order_id).await == ConfirmationStatus::Sent {
            sent += 1;
        }
    }

    Ok(sent)
}
