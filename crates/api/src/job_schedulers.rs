use crate::{reminder::sweep_reminders::SweepRemindersUseCase, shared::usecase::execute};
use actix_web::rt::time::{interval, sleep_until, Instant};
use aurora_fest_infra::FestContext;
use std::time::Duration;
use tracing::info;

pub fn get_start_delay(now_ts: usize, secs_before_min: usize) -> usize {
    let secs_to_next_minute = 60 - (now_ts / 1000) % 60;
    if secs_to_next_minute > secs_before_min {
        secs_to_next_minute - secs_before_min
    } else {
        secs_to_next_minute + (60 - secs_before_min)
    }
}

/// Sweeps reminders at the start of every minute, for deployments without an
/// external scheduler calling the sweep endpoint
pub fn start_reminder_sweep_job(ctx: FestContext) {
    actix_web::rt::spawn(async move {
        let now = ctx.sys.get_timestamp_millis();
        let secs_to_next_run = get_start_delay(now as usize, 0);
        let start = Instant::now() + Duration::from_secs(secs_to_next_run as u64);

        sleep_until(start).await;
        let mut minutely_interval = interval(Duration::from_secs(60));
        loop {
            minutely_interval.tick().await;
            let usecase = SweepRemindersUseCase { force: false };
            // Failures are logged by the executor
            if let Ok(res) = execute(usecase, &ctx).await {
                info!(
                    "Scheduled reminder sweep processed {} reminders",
                    res.processed
                );
            }
        }
    });
}
