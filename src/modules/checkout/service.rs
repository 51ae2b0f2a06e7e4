use std::sync::Arc;

use super::types::{CheckoutItem, SessionSummary};
use crate::{
    modules::{
        menu::description,
        payment::{self, CheckoutSession, CreateSessionPayload, LineItem},
    },
    types::Context,
    utils::money,
};

#[derive(Debug)]
pub enum Error {
    InvalidAmount,
    UnexpectedError,
}

impl From<payment::Error> for Error {
    fn from(_: payment::Error) -> Self {
        Error::UnexpectedError
    }
}

pub fn item_description(item: &CheckoutItem) -> String {
    let labels = item.modifications.iter().filter_map(|modification| {
        description::modification_label(
            modification.ingredient_name.as_deref().unwrap_or_default(),
            modification.extra,
        )
    });

    description::describe(
        item.menu_item_description.as_deref().unwrap_or_default(),
        labels,
    )
}

pub fn line_items(items: &[CheckoutItem]) -> Result<Vec<LineItem>, Error> {
    items
        .iter()
        .map(|item| {
            let unit_amount = money::to_minor_units(&item.unit_price).ok_or_else(|| {
                tracing::error!("Unit price {} cannot be charged", item.unit_price);
                Error::InvalidAmount
            })?;

            Ok(LineItem {
                name: item.menu_item_name.clone(),
                description: item_description(item),
                unit_amount,
                quantity: item.quantity,
            })
        })
        .collect()
}

/// Opens a hosted checkout for the cart and returns the page the customer
/// should be redirected to.
pub async fn create_session(ctx: Arc<Context>, items: Vec<CheckoutItem>) -> Result<String, Error> {
    let payload = CreateSessionPayload {
        line_items: line_items(&items)?,
        success_url: ctx.checkout.success_url.clone(),
        cancel_url: ctx.checkout.cancel_url.clone(),
    };

    let session = ctx.payment.create_session(payload).await?;

    session.url.ok_or_else(|| {
        tracing::error!("Checkout session {} was created without a url", session.id);
        Error::UnexpectedError
    })
}

pub fn summarize(session: CheckoutSession) -> SessionSummary {
    let customer = session.customer_details.unwrap_or_default();

    SessionSummary {
        session_id: session.id,
        customer_name: customer.name.unwrap_or_default(),
        customer_email: customer.email.unwrap_or_default(),
        customer_phone: customer.phone.unwrap_or_default(),
        payment_status: session.payment_status,
        total_amount: session
            .amount_total
            .map(money::from_minor_units)
            .unwrap_or_else(money::zero),
    }
}

pub async fn find_session(
    ctx: Arc<Context>,
    session_id: String,
) -> Result<Option<SessionSummary>, Error> {
    Ok(ctx
        .payment
        .find_session(&session_id)
        .await?
        .map(summarize))
}
