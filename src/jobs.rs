use std::sync::Arc;

use apalis::cron::CronStream;
use apalis::prelude::*;
use apalis::utils::TokioExecutor;

use crate::{modules::order, types};

pub fn monitor(ctx: Arc<types::Context>) -> apalis::prelude::Monitor<TokioExecutor> {
    let all_jobs = order::job::list(ctx);

    let mut monitor = apalis::prelude::Monitor::<TokioExecutor>::new();

    for job in all_jobs {
        let run = job.job.clone();
        let worker = WorkerBuilder::new(job.name.as_str())
            .stream(CronStream::new(job.schedule.clone()).into_stream())
            .build_fn(move |_tick: types::Job| {
                let run = run.clone();
                async move { run().await }
            });
        monitor = monitor.register_with_count(1, worker);
    }

    monitor
}
