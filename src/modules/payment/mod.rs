pub mod stripe;

use async_trait::async_trait;
use serde::Deserialize;

/// Every price is charged in pounds sterling.
pub const CURRENCY: &str = "gbp";

#[derive(Debug)]
pub enum Error {
    UnexpectedError,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LineItem {
    pub name: String,
    pub description: String,
    /// Price of a single unit in pence.
    pub unit_amount: i64,
    pub quantity: i32,
}

#[derive(Clone, Debug)]
pub struct CreateSessionPayload {
    pub line_items: Vec<LineItem>,
    pub success_url: String,
    pub cancel_url: String,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct CustomerDetails {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct CheckoutSession {
    pub id: String,
    pub url: Option<String>,
    pub payment_status: String,
    /// Total charged in pence.
    pub amount_total: Option<i64>,
    pub customer_details: Option<CustomerDetails>,
}

/// A hosted checkout provider: the customer is redirected to a payment page
/// owned by the provider and the resulting session can be looked up later.
#[async_trait]
pub trait CheckoutGateway: Send + Sync {
    async fn create_session(&self, payload: CreateSessionPayload)
        -> Result<CheckoutSession, Error>;

    async fn find_session(&self, session_id: &str) -> Result<Option<CheckoutSession>, Error>;
}
