use super::service;
use crate::types::{Context, SchedulableJob};
use std::pin::Pin;
use std::str::FromStr;
use std::sync::Arc;

async fn retry_confirmations_job(ctx: Arc<Context>) -> Result<(), apalis::prelude::Error> {
    tracing::info!("Retrying failed order confirmations");

    match service::retry_failed_confirmations(ctx).await {
        Ok(sent) => {
            tracing::info!("Sent {} previously failed order confirmations", sent);
            Ok(())
        }
        Err(_) => Err(apalis::prelude::Error::WorkerError(
            apalis::prelude::WorkerError::ProcessingError(String::from(
                "Failed to retry order confirmations",
            )),
        )),
    }
}

fn setup_retry_confirmations_job(
    ctx: Arc<Context>,
) -> Arc<
    dyn Fn()
            -> Pin<Box<dyn std::future::Future<Output = Result<(), apalis::prelude::Error>> + Send>>
        + Send
        + Sync,
> {
    Arc::new(move || {
        let ctx = ctx.clone();
        Box::pin(async move { retry_confirmations_job(ctx).await })
    })
}

pub fn list(ctx: Arc<Context>) -> Vec<SchedulableJob> {
    let schedule = match apalis::cron::Schedule::from_str(&ctx.jobs.email_retry_schedule) {
        Ok(schedule) => schedule,
        Err(err) => {
            tracing::error!(
                "Invalid confirmation retry schedule '{}': {}",
                ctx.jobs.email_retry_schedule,
                err
            );
            return vec![];
        }
    };

    vec![SchedulableJob {
        name: String::from("order::retry_confirmations"),
        schedule,
        job: setup_retry_confirmations_job(ctx),
    }]
}
