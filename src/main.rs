//! Uphole display/control unit firmware (nRF52840).
//!
//! Tasks:
//!   - tick    : 1 ms timebase → tick clock + TIMER_ELAPSED events
//!   - keypad  : key scan → PUSH events
//!   - link    : downhole UART lines → home repaint
//!   - buzzer  : tone playback
//!   - ui      : merges the producer rings and runs the frame machine
//!
//! Producers never touch the UI queue directly; each owns one
//! `heapless::spsc` ring and wakes the UI task.

#![no_std]
#![no_main]

mod board;

use defmt::{info, unwrap};
use embassy_executor::Spawner;
use embassy_nrf::gpio::{Level, Output, OutputDrive, Pin};
use embassy_nrf::peripherals::{PWM0, TWISPI0, UARTE0};
use embassy_nrf::pwm::SimplePwm;
use embassy_nrf::twim::{self, Twim};
use embassy_nrf::uarte::{self, UarteRx};
use embassy_nrf::{bind_interrupts, peripherals};
use heapless::spsc::Queue;
use mwd_uphole::config::{
    EVENT_QUEUE_CAPACITY, KEY_ACTIVITY_WINDOW_MS, LINK_BAUD, MAX_EVENTS_PER_POLL,
    SOURCE_RING_SIZE, TIMER_EVENT_MASK,
};
use mwd_uphole::source::{EventSender, TimerSource};
use mwd_uphole::{FrameRegistry, PeriodicEvent, UiCore, UiShared};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use board::display::{LcdUi, ToneChannel};
use board::keypad::KeypadPins;
use board::{RingConsumer, Sender, WAKE};

bind_interrupts!(struct Irqs {
    UARTE0_UART0 => uarte::InterruptHandler<peripherals::UARTE0>;
    SPIM0_SPIS0_TWIM0_TWIS0_SPI0_TWI0 => twim::InterruptHandler<peripherals::TWISPI0>;
});

type Ring = Queue<PeriodicEvent, SOURCE_RING_SIZE>;

static SHARED: UiShared = UiShared::new();
static TIMER_RING: StaticCell<Ring> = StaticCell::new();
static KEYPAD_RING: StaticCell<Ring> = StaticCell::new();
static LINK_RING: StaticCell<Ring> = StaticCell::new();
static TONES: ToneChannel = ToneChannel::new();

/// Consumer halves handed to the UI task.
struct Rings {
    timer: RingConsumer,
    keypad: RingConsumer,
    link: RingConsumer,
}

// ═══════════════════════════════════════════════════════════════════════════
// Tasks
// ═══════════════════════════════════════════════════════════════════════════

#[embassy_executor::task]
async fn tick_task(timer: TimerSource<'static, SOURCE_RING_SIZE>) -> ! {
    board::tick::run(timer).await
}

#[embassy_executor::task]
async fn keypad_task(pins: KeypadPins, sender: Sender) -> ! {
    board::keypad::run(pins, sender).await
}

#[embassy_executor::task]
async fn link_task(rx: UarteRx<'static, UARTE0>, sender: Sender) -> ! {
    board::link::run(rx, sender).await
}

#[embassy_executor::task]
async fn buzzer_task(pwm: SimplePwm<'static, PWM0>) -> ! {
    board::display::run_buzzer(pwm, TONES.receiver()).await
}

#[embassy_executor::task]
async fn ui_task(mut ui: LcdUi<Twim<'static, TWISPI0>>, mut rings: Rings) -> ! {
    let mut core: UiCore<'static, EVENT_QUEUE_CAPACITY> =
        UiCore::new(FrameRegistry::standard(), &SHARED);
    core.start(&mut ui);

    loop {
        WAKE.wait().await;

        core.merge_from(&mut rings.timer);
        core.merge_from(&mut rings.keypad);
        core.merge_from(&mut rings.link);

        // A full batch may have left ready events behind.
        if core.run_ready(&mut ui) == MAX_EVENTS_PER_POLL {
            WAKE.signal(());
        }
        let now = SHARED.now();
        if SHARED.event_flag() && !SHARED.ui_key_activity(now, KEY_ACTIVITY_WINDOW_MS) {
            SHARED.reset_event_flag();
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Entry point
// ═══════════════════════════════════════════════════════════════════════════

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("mwd-uphole starting");
    let p = embassy_nrf::init(Default::default());

    // Producer rings.
    let (timer_tx, timer_rx) = TIMER_RING.init(Queue::new()).split();
    let (keypad_tx, keypad_rx) = KEYPAD_RING.init(Queue::new()).split();
    let (link_tx, link_rx) = LINK_RING.init(Queue::new()).split();

    // LCD on TWIM0 + alarm LED.
    let i2c = Twim::new(p.TWISPI0, Irqs, p.P0_26, p.P0_27, twim::Config::default());
    let display = board::display::init(i2c);
    let alarm_led = Output::new(p.P0_14, Level::Low, OutputDrive::Standard);
    let ui = LcdUi::new(display, alarm_led, &TONES);

    // Downhole link on UARTE0; TX is unused by the UI.
    let mut link_config = uarte::Config::default();
    link_config.parity = uarte::Parity::EXCLUDED;
    link_config.baudrate = match LINK_BAUD {
        115_200 => uarte::Baudrate::BAUD115200,
        19_200 => uarte::Baudrate::BAUD19200,
        _ => uarte::Baudrate::BAUD9600,
    };
    let link = uarte::Uarte::new(p.UARTE0, Irqs, p.P0_08, p.P0_06, link_config);
    let (_link_tx, link_uart_rx) = link.split();

    let keypad_pins = KeypadPins {
        keys: [
            p.P0_02.degrade(),
            p.P0_03.degrade(),
            p.P0_04.degrade(),
            p.P0_05.degrade(),
            p.P0_28.degrade(),
            p.P0_29.degrade(),
            p.P0_30.degrade(),
            p.P0_31.degrade(),
            p.P1_01.degrade(),
            p.P1_02.degrade(),
            p.P1_03.degrade(),
            p.P1_04.degrade(),
            p.P1_05.degrade(),
            p.P1_06.degrade(),
        ],
        shift: p.P1_07.degrade(),
        survey: p.P1_08.degrade(),
    };

    let buzzer = SimplePwm::new_1ch(p.PWM0, p.P0_13);

    let rings = Rings {
        timer: timer_rx,
        keypad: keypad_rx,
        link: link_rx,
    };
    let timer = TimerSource::new(EventSender::new(timer_tx, &SHARED), TIMER_EVENT_MASK);

    unwrap!(spawner.spawn(ui_task(ui, rings)));
    unwrap!(spawner.spawn(buzzer_task(buzzer)));
    unwrap!(spawner.spawn(tick_task(timer)));
    unwrap!(spawner.spawn(keypad_task(
        keypad_pins,
        EventSender::new(keypad_tx, &SHARED)
    )));
    unwrap!(spawner.spawn(link_task(
        link_uart_rx,
        EventSender::new(link_tx, &SHARED)
    )));

    info!("mwd-uphole running");
}
