use crate::{
    modules::{
        menu::description,
        order::repository::{FullOrder, FullOrderItem},
    },
    types::{Context, SmtpCredentials},
    utils::money,
};
use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use std::sync::Arc;

use super::{types, Error, Notification, Result};

#[derive(Clone, Debug, PartialEq)]
pub struct Email {
    pub to_name: String,
    pub to_address: String,
    pub subject: String,
    pub body: String,
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: Email) -> Result<()>;
}

pub struct SmtpMailer {
    sender: Mailbox,
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailer {
    pub fn new(sender: String, credentials: SmtpCredentials) -> Result<Self> {
        let sender = sender.parse::<Mailbox>().map_err(|err| {
            tracing::error!("Invalid mail sender '{}': {}", sender, err);
            Error::InvalidNotification
        })?;

        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&credentials.host)
            .map_err(|err| {
                tracing::error!("Failed to set up mail relay {}: {}", credentials.host, err);
                Error::NotSent
            })?
            .credentials(Credentials::new(credentials.user, credentials.password))
            .build();

        Ok(Self { sender, transport })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, email: Email) -> Result<()> {
        let address = email.to_address.parse::<Address>().map_err(|err| {
            tracing::error!("Invalid recipient address '{}': {}", email.to_address, err);
            Error::InvalidNotification
        })?;

        let message = Message::builder()
            .from(self.sender.clone())
            .to(Mailbox::new(Some(email.to_name), address))
            .subject(email.subject)
            .header(ContentType::TEXT_PLAIN)
            .body(email.body)
            .map_err(|err| {
                tracing::error!("Failed to build email: {}", err);
                Error::InvalidNotification
            })?;

        self.transport.send(message).await.map(|_| ()).map_err(|err| {
            tracing::error!("Failed to send email: {}", err);
            Error::NotSent
        })
    }
}

pub async fn send(ctx: Arc<Context>, notification: Notification) -> Result<()> {
    match notification {
        Notification::OrderConfirmed(n) => send_order_confirmed_email(ctx, n).await,
    }
}

async fn send_order_confirmed_email(
    ctx: Arc<Context>,
    notification: types::OrderConfirmed,
) -> Result<()> {
    ctx.mailer
        .send(render_order_confirmed(&notification.order))
        .await
}

fn item_line(item: &FullOrderItem) -> String {
    let labels = item.modifications.iter().filter_map(|modification| {
        description::modification_label(
            &modification.ingredient.name,
            modification.modification.extra,
        )
    });

    format!(
        "  {} x {}  {}",
        item.item.quantity,
        description::describe(&item.menu_item.name, labels),
        money::format_gbp(&item.item.total_price)
    )
}

pub fn render_order_confirmed(order: &FullOrder) -> Email {
    let location = &order.location;
    let items = order.items.iter().map(item_line).collect::<Vec<_>>().join("\n");

    let body = format!(
        "Hi {name},\n\
         \n\
         Thanks for your order! We have received it and will have it ready for you to collect.\n\
         \n\
         Order number: {id}\n\
         Pickup time: {pickup_time}\n\
         Pickup from: {location}, {address}, {city} {postcode}\n\
         \n\
         Your order:\n\
         {items}\n\
         \n\
         Total paid: {total}\n\
         \n\
         If anything is wrong with your order, call us on {phone}.\n",
        name = order.order.customer_name,
        id = order.order.id,
        pickup_time = order.order.pickup_time.format("%A %-d %B %Y at %H:%M"),
        location = location.name,
        address = location.address,
        city = location.city,
        postcode = location.postcode,
        items = items,
        total = money::format_gbp(&order.order.total_price),
        phone = location.phone_number,
    );

    Email {
        to_name: order.order.customer_name.clone(),
        to_address: order.order.email.clone(),
        subject: format!("Your pizza order from {} is confirmed", location.name),
        body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing;

    #[test]
    fn addresses_the_customer() {
        let email = render_order_confirmed(&testing::full_order());

        assert_eq!(email.to_name, "Ada Lovelace");
        assert_eq!(email.to_address, "ada@example.com");
        assert_eq!(email.subject, "Your pizza order from Camden is confirmed");
    }

    #[test]
    fn lists_every_item_with_its_modifications() {
        let email = render_order_confirmed(&testing::full_order());

        assert!(email.body.contains("2 x Margherita (+Basil, -Olives)  £21.00"));
        assert!(email.body.contains("1 x Pepperoni  £11.50"));
        assert!(email.body.contains("Total paid: £32.50"));
        assert!(email.body.contains("Pickup time: Friday 16 October 2026 at 18:30"));
        assert!(email.body.contains("Camden, 1 High Street, London NW1 0AA"));
    }

    #[test]
    fn smtp_mailer_rejects_malformed_sender() {
        let mailer = SmtpMailer::new(
            String::from("not an address"),
            SmtpCredentials {
                host: String::from("smtp.pizzeria.test"),
                user: String::from("orders"),
                password: String::from("s3cret"),
            },
        );

        assert!(mailer.is_err());
    }
}
