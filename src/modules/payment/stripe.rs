use super::{CheckoutGateway, CheckoutSession, CreateSessionPayload, Error, CURRENCY};
use async_trait::async_trait;
use reqwest::StatusCode;

pub struct StripeGateway {
    client: reqwest::Client,
    api_endpoint: String,
    secret_key: String,
}

impl StripeGateway {
    pub fn new(api_endpoint: String, secret_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_endpoint: api_endpoint.trim_end_matches('/').to_string(),
            secret_key,
        }
    }

    fn sessions_endpoint(&self) -> String {
        format!("{}/v1/checkout/sessions", self.api_endpoint)
    }
}

/// Flattens a session request into Stripe's bracketed form encoding.
pub fn session_form_params(payload: &CreateSessionPayload) -> Vec<(String, String)> {
    let mut params = vec![
        (String::from("mode"), String::from("payment")),
        (
            String::from("payment_method_types[0]"),
            String::from("card"),
        ),
        (String::from("success_url"), payload.success_url.clone()),
        (String::from("cancel_url"), payload.cancel_url.clone()),
        (String::from("customer_creation"), String::from("always")),
        (
            String::from("phone_number_collection[enabled]"),
            String::from("true"),
        ),
        (
            String::from("billing_address_collection"),
            String::from("required"),
        ),
    ];

    for (index, item) in payload.line_items.iter().enumerate() {
        let prefix = format!("line_items[{}]", index);

        params.push((
            format!("{}[price_data][currency]", prefix),
            String::from(CURRENCY),
        ));
        params.push((
            format!("{}[price_data][unit_amount]", prefix),
            item.unit_amount.to_string(),
        ));
        params.push((
            format!("{}[price_data][product_data][name]", prefix),
            item.name.clone(),
        ));
        // stripe rejects empty descriptions
        if !item.description.is_empty() {
            params.push((
                format!("{}[price_data][product_data][description]", prefix),
                item.description.clone(),
            ));
        }
        params.push((format!("{}[quantity]", prefix), item.quantity.to_string()));
    }

    params
}

async fn parse_session(res: reqwest::Response) -> Result<CheckoutSession, Error> {
    let data = res.text().await.map_err(|err| {
        tracing::error!("Failed to read checkout session response: {}", err);
        Error::UnexpectedError
    })?;

    tracing::debug!("Response received from stripe server: {}", data);

    serde_json::de::from_str::<CheckoutSession>(data.as_str()).map_err(|err| {
        tracing::error!("Failed to parse checkout session response: {}", err);
        Error::UnexpectedError
    })
}

#[async_trait]
impl CheckoutGateway for StripeGateway {
    async fn create_session(
        &self,
        payload: CreateSessionPayload,
    ) -> Result<CheckoutSession, Error> {
        let params = session_form_params(&payload);

        let res = self
            .client
            .post(self.sessions_endpoint())
            .bearer_auth(&self.secret_key)
            .form(&params)
            .send()
            .await
            .map_err(|err| {
                tracing::error!("Failed to create checkout session: {}", err);
                Error::UnexpectedError
            })?;

        if res.status() != StatusCode::OK {
            let status = res.status();
            let data = res.text().await.unwrap_or_default();
            tracing::error!(
                "Failed to create checkout session, status {}: {}",
                status,
                data
            );
            return Err(Error::UnexpectedError);
        }

        parse_session(res).await
    }

    async fn find_session(&self, session_id: &str) -> Result<Option<CheckoutSession>, Error> {
        let res = self
            .client
            .get(format!(
                "{}/{}",
                self.sessions_endpoint(),
                urlencoding::encode(session_id)
            ))
            .bearer_auth(&self.secret_key)
            .send()
            .await
            .map_err(|err| {
                tracing::error!("Failed to retrieve checkout session {}: {}", session_id, err);
                Error::UnexpectedError
            })?;

        match res.status() {
            StatusCode::OK => parse_session(res).await.map(Some),
            StatusCode::NOT_FOUND => Ok(None),
            status => {
                let data = res.text().await.unwrap_or_default();
                tracing::error!(
                    "Failed to retrieve checkout session {}, status {}: {}",
                    session_id,
                    status,
                    data
                );
                Err(Error::UnexpectedError)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::payment::LineItem;
    use axum::{
        extract::Path,
        http::{HeaderMap, StatusCode as HttpStatusCode},
        routing::{get, post},
        Form, Json, Router,
    };
    use serde_json::json;
    use std::collections::HashMap;
    use tokio::net::TcpListener;

    fn payload() -> CreateSessionPayload {
        CreateSessionPayload {
            line_items: vec![
                LineItem {
                    name: String::from("Margherita"),
                    description: String::from("Tomato and mozzarella (+Basil)"),
                    unit_amount: 800,
                    quantity: 2,
                },
                LineItem {
                    name: String::from("Garlic Bread"),
                    description: String::new(),
                    unit_amount: 350,
                    quantity: 1,
                },
            ],
            success_url: String::from("http://shop.test/success?session_id={CHECKOUT_SESSION_ID}"),
            cancel_url: String::from("http://shop.test/cancel"),
        }
    }

    fn param<'a>(params: &'a [(String, String)], key: &str) -> Option<&'a str> {
        params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    #[test]
    fn encodes_one_priced_line_item_per_cart_line() {
        let params = session_form_params(&payload());

        assert_eq!(param(&params, "mode"), Some("payment"));
        assert_eq!(param(&params, "payment_method_types[0]"), Some("card"));
        assert_eq!(param(&params, "customer_creation"), Some("always"));
        assert_eq!(
            param(&params, "phone_number_collection[enabled]"),
            Some("true")
        );
        assert_eq!(
            param(&params, "billing_address_collection"),
            Some("required")
        );
        assert_eq!(
            param(&params, "line_items[0][price_data][unit_amount]"),
            Some("800")
        );
        assert_eq!(
            param(&params, "line_items[0][price_data][currency]"),
            Some("gbp")
        );
        assert_eq!(
            param(&params, "line_items[0][price_data][product_data][description]"),
            Some("Tomato and mozzarella (+Basil)")
        );
        assert_eq!(param(&params, "line_items[0][quantity]"), Some("2"));
        assert_eq!(
            param(&params, "line_items[1][price_data][product_data][name]"),
            Some("Garlic Bread")
        );
        assert_eq!(
            param(&params, "line_items[1][price_data][product_data][description]"),
            None
        );
        assert_eq!(param(&params, "line_items[2][quantity]"), None);
    }

    async fn create_session(
        headers: HeaderMap,
        Form(form): Form<HashMap<String, String>>,
    ) -> (HttpStatusCode, Json<serde_json::Value>) {
        if headers.get("authorization").and_then(|v| v.to_str().ok()) != Some("Bearer sk_test")
        {
            return (
                HttpStatusCode::UNAUTHORIZED,
                Json(json!({ "error": { "message": "Invalid API Key" } })),
            );
        }

        (
            HttpStatusCode::OK,
            Json(json!({
                "id": "cs_test_1",
                "url": "https://checkout.stripe.test/c/cs_test_1",
                "payment_status": "unpaid",
                "amount_total": null,
                "customer_details": null,
                "echo_quantity": form.get("line_items[0][quantity]"),
            })),
        )
    }

    async fn get_session(Path(id): Path<String>) -> (HttpStatusCode, Json<serde_json::Value>) {
        match id.as_str() {
            "cs_test_paid" => (
                HttpStatusCode::OK,
                Json(json!({
                    "id": "cs_test_paid",
                    "url": null,
                    "payment_status": "paid",
                    "amount_total": 1650,
                    "customer_details": { "name": "Ada", "email": null, "phone": "+447700900000" },
                })),
            ),
            _ => (
                HttpStatusCode::NOT_FOUND,
                Json(json!({ "error": { "code": "resource_missing" } })),
            ),
        }
    }

    async fn spawn_fake_stripe() -> String {
        let router = Router::new()
            .route("/v1/checkout/sessions", post(create_session))
            .route("/v1/checkout/sessions/:id", get(get_session));
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn creates_session_and_returns_redirect_url() {
        let endpoint = spawn_fake_stripe().await;
        let gateway = StripeGateway::new(endpoint, String::from("sk_test"));

        let session = gateway.create_session(payload()).await.unwrap();

        assert_eq!(session.id, "cs_test_1");
        assert_eq!(
            session.url.as_deref(),
            Some("https://checkout.stripe.test/c/cs_test_1")
        );
    }

    #[tokio::test]
    async fn rejected_session_creation_is_an_error() {
        let endpoint = spawn_fake_stripe().await;
        let gateway = StripeGateway::new(endpoint, String::from("sk_wrong"));

        assert!(gateway.create_session(payload()).await.is_err());
    }

    #[tokio::test]
    async fn finds_existing_session() {
        let endpoint = spawn_fake_stripe().await;
        let gateway = StripeGateway::new(endpoint, String::from("sk_test"));

        let session = gateway.find_session("cs_test_paid").await.unwrap().unwrap();

        assert_eq!(session.payment_status, "paid");
        assert_eq!(session.amount_total, Some(1650));
        let customer = session.customer_details.unwrap();
        assert_eq!(customer.name.as_deref(), Some("Ada"));
        assert_eq!(customer.email, None);
    }

    #[tokio::test]
    async fn unknown_session_is_none() {
        let endpoint = spawn_fake_stripe().await;
        let gateway = StripeGateway::new(endpoint, String::from("sk_test"));

        assert!(gateway.find_session("cs_missing").await.unwrap().is_none());
    }
}
