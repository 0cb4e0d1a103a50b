use crate::app::AppEvent;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

/// The list view's auto-refresh and countdown timers.
///
/// At most one of each is alive: [`restart`](Self::restart) cancels both
/// before spawning replacements, and dropping the owner cancels them. Every
/// event carries the generation it was spawned under, so a tick that was
/// already queued when its timer was cancelled can be recognised and ignored.
#[derive(Debug, Default)]
pub struct RefreshTimers {
    refresh: Option<JoinHandle<()>>,
    countdown: Option<JoinHandle<()>>,
    generation: u64,
}

impl RefreshTimers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancels both timers and starts a fresh pair.
    ///
    /// The refresh timer first fires one `period` from now; the countdown
    /// ticks every second.
    pub fn restart(&mut self, period: Duration, tx: &mpsc::Sender<AppEvent>) {
        self.cancel();
        self.generation = self.generation.wrapping_add(1);
        let timer_gen = self.generation;

        self.refresh = Some(spawn_ticker(period, tx.clone(), move || AppEvent::AutoRefresh {
            timer_gen,
        }));
        self.countdown = Some(spawn_ticker(
            Duration::from_secs(1),
            tx.clone(),
            move || AppEvent::CountdownTick { timer_gen },
        ));
        tracing::debug!(timer_gen, period_secs = period.as_secs(), "Refresh timers started");
    }

    pub fn cancel(&mut self) {
        let mut cancelled = false;
        for handle in [self.refresh.take(), self.countdown.take()].into_iter().flatten() {
            handle.abort();
            cancelled = true;
        }
        if cancelled {
            tracing::debug!(timer_gen = self.generation, "Refresh timers cancelled");
        }
    }

    /// Number of live timer tasks (0..=2).
    pub fn active(&self) -> usize {
        [&self.refresh, &self.countdown]
            .into_iter()
            .flatten()
            .filter(|h| !h.is_finished())
            .count()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether a timer event belongs to the currently running pair.
    pub fn is_current(&self, timer_gen: u64) -> bool {
        self.refresh.is_some() && timer_gen == self.generation
    }
}

impl Drop for RefreshTimers {
    fn drop(&mut self) {
        self.cancel();
    }
}

fn spawn_ticker<F>(period: Duration, tx: mpsc::Sender<AppEvent>, make_event: F) -> JoinHandle<()>
where
    F: Fn() -> AppEvent + Send + 'static,
{
    let period = period.max(Duration::from_millis(1));
    tokio::spawn(async move {
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            if tx.send(make_event()).await.is_err() {
                // Receiver gone: the UI loop has exited.
                break;
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_restart_replaces_pair() {
        let (tx, _rx) = mpsc::channel(16);
        let mut timers = RefreshTimers::new();

        timers.restart(Duration::from_secs(30), &tx);
        let first = timers.generation();
        timers.restart(Duration::from_secs(30), &tx);

        assert_eq!(timers.active(), 2);
        assert!(!timers.is_current(first));
        assert!(timers.is_current(timers.generation()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_stops_everything() {
        let (tx, mut rx) = mpsc::channel(16);
        let mut timers = RefreshTimers::new();
        timers.restart(Duration::from_secs(2), &tx);
        let gen = timers.generation();
        timers.cancel();

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(timers.active(), 0);
        assert!(!timers.is_current(gen));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_auto_refresh_fires_after_period() {
        let (tx, mut rx) = mpsc::channel(64);
        let mut timers = RefreshTimers::new();
        timers.restart(Duration::from_secs(30), &tx);
        let gen = timers.generation();

        tokio::time::sleep(Duration::from_millis(30_500)).await;

        let mut ticks = 0;
        let mut refreshes = 0;
        while let Ok(event) = rx.try_recv() {
            match event {
                AppEvent::CountdownTick { timer_gen } if timer_gen == gen => ticks += 1,
                AppEvent::AutoRefresh { timer_gen } if timer_gen == gen => refreshes += 1,
                _ => panic!("unexpected event"),
            }
        }
        assert_eq!(ticks, 30);
        assert_eq!(refreshes, 1);
    }
}
