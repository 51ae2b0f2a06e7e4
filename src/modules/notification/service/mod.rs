pub mod email;

use crate::{modules::order::repository::FullOrder, types::Context};
use std::sync::Arc;

pub mod types {
    use super::FullOrder;

    #[derive(Clone)]
    pub struct OrderConfirmed {
        pub order: FullOrder,
    }
}

#[derive(Clone)]
pub enum Notification {
    OrderConfirmed(types::OrderConfirmed),
}

impl Notification {
    pub fn order_confirmed(order: FullOrder) -> Self {
        Notification::OrderConfirmed(types::OrderConfirmed { order })
    }
}

#[derive(Debug)]
pub enum Error {
    NotSent,
    InvalidNotification,
}

pub type Result<T> = std::result::Result<T, Error>;

pub async fn send(ctx: Arc<Context>, notification: Notification) -> Result<()> {
    email::send(ctx, notification).await
}
