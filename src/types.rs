pub use crate::utils::database;
use crate::modules::{
    notification::service::email::{Mailer, SmtpMailer},
    payment::{stripe::StripeGateway, CheckoutGateway},
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::env;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use uri_parser::parse_uri;
use urlencoding::decode;

#[derive(Clone, Debug, PartialEq)]
pub enum AppEnvironment {
    Production,
    Development,
}

impl AppEnvironment {
    pub fn from(raw_environment: String) -> Self {
        match raw_environment.as_ref() {
            "production" => Self::Production,
            _ => Self::Development,
        }
    }
}

#[derive(Clone)]
pub struct AppContext {
    pub host: String,
    pub environment: AppEnvironment,
    pub port: u32,
    pub url: String,
}

#[derive(Clone)]
pub struct CheckoutContext {
    pub success_url: String,
    pub cancel_url: String,
}

#[derive(Clone)]
pub struct JobsContext {
    pub email_retry_schedule: String,
}

#[derive(Clone)]
pub struct Context {
    pub app: AppContext,
    pub db_conn: database::DatabaseConnection,
    pub checkout: CheckoutContext,
    pub jobs: JobsContext,
    pub payment: Arc<dyn CheckoutGateway>,
    pub mailer: Arc<dyn Mailer>,
}

#[derive(Clone)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Clone)]
pub struct AppConfig {
    pub host: String,
    pub environment: AppEnvironment,
    pub port: u32,
    pub url: String,
}

#[derive(Clone)]
pub struct PaymentConfig {
    pub api_endpoint: String,
    pub secret_key: String,
}

#[derive(Clone)]
pub struct CheckoutConfig {
    pub success_url: String,
    pub cancel_url: String,
}

#[derive(Clone)]
pub struct MailConfig {
    pub sender: String,
    pub uri: String,
}

#[derive(Clone)]
pub struct JobsConfig {
    pub email_retry_schedule: String,
}

#[derive(Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub app: AppConfig,
    pub payment: PaymentConfig,
    pub checkout: CheckoutConfig,
    pub mail: MailConfig,
    pub jobs: JobsConfig,
}

impl Default for Config {
    fn default() -> Self {
        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL not set");
        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let environment = env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());
        let port = env::var("PORT")
            .unwrap_or_else(|_| "8000".to_string())
            .parse::<u32>()
            .expect("Invalid PORT number");
        let url = env::var("URL").unwrap_or_else(|_| format!("http://{}:{}", host, port));
        let payment_api_endpoint = env::var("STRIPE_API_ENDPOINT")
            .unwrap_or_else(|_| "https://api.stripe.com".to_string());
        let payment_secret_key =
            env::var("STRIPE_SECRET_KEY").expect("STRIPE_SECRET_KEY not set");
        let checkout_success_url = env::var("CHECKOUT_SUCCESS_URL").unwrap_or_else(|_| {
            "http://localhost:5173/checkout/success?session_id={CHECKOUT_SESSION_ID}".to_string()
        });
        let checkout_cancel_url = env::var("CHECKOUT_CANCEL_URL")
            .unwrap_or_else(|_| "http://localhost:5173/checkout/cancel".to_string());
        let mail_sender = env::var("MAIL_SENDER").expect("MAIL_SENDER not set");
        let mail_uri = env::var("MAIL_URI").expect("MAIL_URI not set");
        let email_retry_schedule =
            env::var("EMAIL_RETRY_SCHEDULE").unwrap_or_else(|_| "0 0/10 * * * *".to_string());

        Self {
            database: DatabaseConfig { url: database_url },
            app: AppConfig {
                host,
                environment: AppEnvironment::from(environment),
                port,
                url,
            },
            payment: PaymentConfig {
                api_endpoint: payment_api_endpoint,
                secret_key: payment_secret_key,
            },
            checkout: CheckoutConfig {
                success_url: checkout_success_url,
                cancel_url: checkout_cancel_url,
            },
            mail: MailConfig {
                sender: mail_sender,
                uri: mail_uri,
            },
            jobs: JobsConfig {
                email_retry_schedule,
            },
        }
    }
}

/// Payload handed to cron workers on every tick.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Job(DateTime<Utc>);

impl apalis::prelude::Job for Job {
    const NAME: &'static str = "pizzeria::CronTick";
}

impl From<DateTime<Utc>> for Job {
    fn from(t: DateTime<Utc>) -> Self {
        Self(t)
    }
}

#[derive(Clone)]
pub struct SchedulableJob {
    pub name: String,
    pub schedule: apalis::cron::Schedule,
    pub job: Arc<
        dyn Fn() -> Pin<Box<dyn Future<Output = Result<(), apalis::prelude::Error>> + Send>>
            + Send
            + Sync,
    >,
}

#[async_trait]
pub trait ToContext {
    async fn to_context(self) -> Context;
}

pub struct SmtpCredentials {
    pub host: String,
    pub user: String,
    pub password: String,
}

pub fn parse_mail_uri(uri: &str) -> Option<SmtpCredentials> {
    let parsed_mail_uri = parse_uri(uri).ok()?;
    let host = parsed_mail_uri.host?.to_string();
    let user = parsed_mail_uri.user?;
    let password = decode(user.password?).ok()?.to_string();
    let user = decode(user.name).ok()?.to_string();

    Some(SmtpCredentials {
        host,
        user,
        password,
    })
}

#[async_trait]
impl ToContext for Config {
    async fn to_context(self) -> Context {
        let db_conn = database::connect(self.database.url.as_str()).await;
        database::migrate(db_conn.clone()).await;

        let credentials = parse_mail_uri(&self.mail.uri).expect("Invalid mail uri");
        let mailer = SmtpMailer::new(self.mail.sender, credentials).expect("Invalid mail relay");

        Context {
            app: AppContext {
                host: self.app.host,
                environment: self.app.environment,
                port: self.app.port,
                url: self.app.url,
            },
            db_conn,
            checkout: CheckoutContext {
                success_url: self.checkout.success_url,
                cancel_url: self.checkout.cancel_url,
            },
            jobs: JobsContext {
                email_retry_schedule: self.jobs.email_retry_schedule,
            },
            payment: Arc::new(StripeGateway::new(
                self.payment.api_endpoint,
                self.payment.secret_key,
            )),
            mailer: Arc::new(mailer),
        }
    }
}
