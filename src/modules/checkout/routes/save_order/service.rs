use super::types::{request, response};
use crate::{
    modules::order::{
        repository::{CreateOrderItemIngredientPayload, CreateOrderItemPayload, CreateOrderPayload},
        service::{self as order_service, SaveOrderOutcome},
    },
    types::Context,
};
use std::sync::Arc;
use validator::Validate;

fn to_create_order_payload(body: request::Body) -> CreateOrderPayload {
    CreateOrderPayload {
        customer_name: body.customer_name,
        phone_number: body.customer_phone,
        email: body.customer_email,
        location_id: body.location_id,
        pickup_time: body.pickup_time,
        stripe_session_id: body.session_id,
        total_price: body.total_amount,
        items: body
            .cart_items
            .into_iter()
            .map(|item| CreateOrderItemPayload {
                menu_item_id: item.menu_item_id,
                quantity: item.quantity,
                base_price: item.base_price,
                unit_price: item.unit_price,
                modifications: item
                    .modifications
                    .into_iter()
                    .map(|modification| CreateOrderItemIngredientPayload {
                        ingredient_id: modification.ingredient_id,
                        price: modification.price,
                        extra: modification.extra,
                        removed: modification.removed,
                    })
                    .collect(),
            })
            .collect(),
    }
}

pub async fn service(ctx: Arc<Context>, payload: request::Payload) -> response::Response {
    if let Err(errors) = payload.body.validate() {
        return Err(response::Error::FailedToValidate(errors));
    }

    let outcome = order_service::save_order(
        ctx.clone(),
        to_create_order_payload(payload.body),
        payload.now,
    )
    .await
    .map_err(|_| response::Error::FailedToSaveOrder)?;

    match outcome {
        SaveOrderOutcome::AlreadySaved(order) => Ok(response::Success::OrderAlreadySaved {
            order_id: order.id,
        }),
        SaveOrderOutcome::Created(order) => {
            order_service::send_confirmation(ctx, order.id.clone()).await;
            Ok(response::Success::OrderSaved { order_id: order.id })
        }
    }
}
