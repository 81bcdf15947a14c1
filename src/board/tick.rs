//! 1 ms timebase.

use embassy_time::{Duration, Ticker};
use mwd_uphole::config::SOURCE_RING_SIZE;
use mwd_uphole::source::TimerSource;
use mwd_uphole::time::TickPeriod;

use super::wake_ui;

/// Drive the tick clock and timer events from a 1 ms ticker.
pub async fn run(mut timer: TimerSource<'static, SOURCE_RING_SIZE>) -> ! {
    let mut ticker = Ticker::every(Duration::from_millis(1));
    let mut reported = 0;

    loop {
        ticker.next().await;
        let crossed = timer.on_millisecond();

        // Every low-resolution tick may make a pending event due.
        if crossed.contains(TickPeriod::Ms10) {
            wake_ui();
        }

        if timer.dropped() != reported {
            reported = timer.dropped();
            defmt::warn!("Tick: {} timer events dropped", reported);
        }
    }
}
