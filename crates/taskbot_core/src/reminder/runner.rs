//! Cancellable periodic task runner.

use log::info;
use std::future::Future;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

const MIN_PERIOD: Duration = Duration::from_millis(1);

/// Runs `tick` immediately and then once per `interval` until `cancel` fires.
///
/// Tick starts are anchored to the schedule, so a slow tick does not push
/// later ticks back; a tick that overruns a whole period delays the next one
/// instead of bursting. Cancellation is observed only between ticks: a
/// running tick always completes. Returns the number of completed ticks.
pub async fn run_periodic<F, Fut>(
    label: &str,
    interval: Duration,
    cancel: CancellationToken,
    mut tick: F,
) -> u64
where
    F: FnMut() -> Fut,
    Fut: Future<Output = ()>,
{
    info!(
        "event=runner_start module=runner status=ok runner={} interval_secs={}",
        label,
        interval.as_secs()
    );

    // `interval` panics on a zero period.
    let mut ticker = tokio::time::interval(interval.max(MIN_PERIOD));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut completed: u64 = 0;
    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {}
        }

        tick().await;
        completed += 1;
    }

    info!(
        "event=runner_stop module=runner status=ok runner={} ticks={}",
        label, completed
    );
    completed
}

#[cfg(test)]
mod tests {
    use super::run_periodic;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Arc;
    use std::time::Duration;
    use tokio_util::sync::CancellationToken;

    #[tokio::test(start_paused = true)]
    async fn ticks_immediately_then_once_per_interval() {
        let cancel = CancellationToken::new();
        let count = Arc::new(AtomicU64::new(0));

        let runner = {
            let cancel = cancel.clone();
            let count = Arc::clone(&count);
            tokio::spawn(async move {
                run_periodic("test", Duration::from_secs(3600), cancel, move || {
                    count.fetch_add(1, Ordering::SeqCst);
                    async {}
                })
                .await
            })
        };

        tokio::time::sleep(Duration::from_secs(2 * 3600 + 1)).await;
        cancel.cancel();
        let ticks = runner.await.unwrap();

        assert_eq!(ticks, 3);
        assert_eq!(count.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn already_cancelled_token_runs_nothing() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        let ticks = run_periodic("test", Duration::from_secs(1), cancel, || async {}).await;
        assert_eq!(ticks, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_during_wait_stops_before_next_tick() {
        let cancel = CancellationToken::new();
        let runner = {
            let cancel = cancel.clone();
            tokio::spawn(async move {
                run_periodic("test", Duration::from_secs(3600), cancel, || async {}).await
            })
        };

        tokio::time::sleep(Duration::from_secs(10)).await;
        cancel.cancel();
        let ticks = tokio::time::timeout(Duration::from_secs(1), runner)
            .await
            .expect("runner should stop promptly")
            .unwrap();
        assert_eq!(ticks, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn slow_ticks_do_not_shift_the_schedule() {
        let cancel = CancellationToken::new();
        let runner = {
            let cancel = cancel.clone();
            tokio::spawn(async move {
                run_periodic("test", Duration::from_secs(3600), cancel, || async {
                    tokio::time::sleep(Duration::from_secs(600)).await;
                })
                .await
            })
        };

        // Starts at 0h, 1h and 2h; a drifting loop would start at 0h, 1h10m, 2h20m.
        tokio::time::sleep(Duration::from_secs(2 * 3600 + 1)).await;
        cancel.cancel();
        let ticks = runner.await.unwrap();
        assert_eq!(ticks, 3);
    }
}
