// Live elapsed-time display for the current work or break segment.
//
// A background task recomputes `HH:MM:SS` from the clock once per second while
// a segment start is set. Nothing is accumulated between ticks, so the display
// cannot drift from the recorded timestamps. Dropping the timer stops the task.

use crate::modules::timesheets::core::active_session::ActiveSessionState;
use crate::modules::timesheets::core::ports::Clock;
use crate::modules::timesheets::core::time_arithmetic::{format_elapsed, milliseconds_between};
use crate::shared::core::primitives::Timestamp;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::debug;

const TICK: Duration = Duration::from_secs(1);

pub struct LiveTimer {
    segment_start: Option<watch::Sender<Option<Timestamp>>>,
    display: watch::Receiver<Option<String>>,
    task: JoinHandle<()>,
}

impl LiveTimer {
    /// A timer driven by `set_segment_start`.
    pub fn spawn(clock: Arc<dyn Clock>) -> Self {
        let (segment_tx, segment_rx) = watch::channel(None);
        let (display_tx, display_rx) = watch::channel(None);
        let task = tokio::spawn(run(clock, segment_rx, |start: &Option<Timestamp>| *start, display_tx));
        Self {
            segment_start: Some(segment_tx),
            display: display_rx,
            task,
        }
    }

    /// A timer that follows the segment start of a session feed.
    pub fn attach(clock: Arc<dyn Clock>, sessions: watch::Receiver<ActiveSessionState>) -> Self {
        let (display_tx, display_rx) = watch::channel(None);
        let task = tokio::spawn(run(
            clock,
            sessions,
            |session: &ActiveSessionState| session.current_segment_start,
            display_tx,
        ));
        Self {
            segment_start: None,
            display: display_rx,
            task,
        }
    }

    /// Restart from a new base, or stop and clear with `None`. Ignored by
    /// attached timers.
    pub fn set_segment_start(&self, start: Option<Timestamp>) {
        match &self.segment_start {
            Some(tx) => {
                tx.send_replace(start);
            }
            None => debug!("segment start ignored by an attached live timer"),
        }
    }

    pub fn display(&self) -> Option<String> {
        self.display.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<String>> {
        self.display.clone()
    }
}

impl Drop for LiveTimer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn run<T, F>(
    clock: Arc<dyn Clock>,
    mut source: watch::Receiver<T>,
    segment_start: F,
    display: watch::Sender<Option<String>>,
) where
    T: Send + Sync + 'static,
    F: Fn(&T) -> Option<Timestamp> + Send + 'static,
{
    loop {
        let base = segment_start(&*source.borrow_and_update());

        let Some(start) = base else {
            display.send_replace(None);
            if source.changed().await.is_err() {
                return;
            }
            continue;
        };

        let mut ticker = tokio::time::interval(TICK);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let elapsed = milliseconds_between(start, clock.now());
                    display.send_replace(Some(format_elapsed(elapsed)));
                }
                changed = source.changed() => {
                    if changed.is_err() {
                        display.send_replace(None);
                        return;
                    }
                    let next = segment_start(&*source.borrow());
                    if next != Some(start) {
                        break;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod live_timer_tests {
    use super::*;
    use crate::modules::timesheets::core::ports::FixedClock;
    use crate::tests::fixtures::time_logs::at;
    use rstest::{fixture, rstest};
    use tokio::time::timeout;

    const WAIT: Duration = Duration::from_secs(3);

    async fn shows(rx: &mut watch::Receiver<Option<String>>, expected: Option<&str>) {
        timeout(WAIT, rx.wait_for(|d| d.as_deref() == expected))
            .await
            .unwrap_or_else(|_| panic!("display never showed {expected:?}"))
            .unwrap();
    }

    #[fixture]
    fn clock() -> Arc<FixedClock> {
        Arc::new(FixedClock::new(at(9, 0, 0)))
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_show_nothing_without_a_segment(clock: Arc<FixedClock>) {
        let timer = LiveTimer::spawn(clock);
        assert_eq!(timer.display(), None);
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_follow_the_clock_once_started(clock: Arc<FixedClock>) {
        let timer = LiveTimer::spawn(clock.clone());
        let mut rx = timer.subscribe();

        timer.set_segment_start(Some(at(8, 59, 0)));
        shows(&mut rx, Some("00:01:00")).await;

        clock.advance(chrono::Duration::seconds(61));
        shows(&mut rx, Some("00:02:01")).await;
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_restart_from_a_new_base_and_clear_on_none(clock: Arc<FixedClock>) {
        let timer = LiveTimer::spawn(clock);
        let mut rx = timer.subscribe();

        timer.set_segment_start(Some(at(7, 0, 0)));
        shows(&mut rx, Some("02:00:00")).await;

        timer.set_segment_start(Some(at(8, 30, 0)));
        shows(&mut rx, Some("00:30:00")).await;

        timer.set_segment_start(None);
        shows(&mut rx, None).await;
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_follow_an_attached_session(clock: Arc<FixedClock>) {
        let (tx, rx) = watch::channel(ActiveSessionState::default());
        let timer = LiveTimer::attach(clock, rx);
        let mut display = timer.subscribe();

        tx.send_replace(ActiveSessionState {
            is_active: true,
            current_segment_start: Some(at(8, 45, 0)),
            ..ActiveSessionState::default()
        });
        shows(&mut display, Some("00:15:00")).await;

        tx.send_replace(ActiveSessionState::default());
        shows(&mut display, None).await;
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_stop_when_dropped(clock: Arc<FixedClock>) {
        let timer = LiveTimer::spawn(clock);
        let mut rx = timer.subscribe();
        drop(timer);

        let closed = timeout(WAIT, async {
            while rx.changed().await.is_ok() {}
        })
        .await;
        assert!(closed.is_ok());
    }
}
