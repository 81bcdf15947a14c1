//! SSD1306 LCD, buzzer and alarm LED behind the `Ui` trait.
//!
//! Painting is synchronous (buffered draw + flush). Tones are handed to
//! the buzzer task through a small channel so a handler never waits for
//! a beep to finish.

use core::fmt::Write as _;

use defmt::warn;
use embassy_nrf::gpio::Output;
use embassy_nrf::pwm::{Prescaler, SimplePwm};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::{Channel, Receiver};
use embassy_time::{Duration, Timer};
use embedded_graphics::mono_font::ascii::FONT_6X10;
use embedded_graphics::mono_font::{MonoTextStyle, MonoTextStyleBuilder};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};
use embedded_graphics::text::Text;
use heapless::String;
use mwd_uphole::config::{TONE_ALARM, TONE_CLICK, TONE_CONFIRM, TONE_REMINDER};
use mwd_uphole::event::{AlertEvent, AlertType};
use mwd_uphole::frame::{Area, FrameId, FrameState};
use mwd_uphole::{Tone, Ui};
use ssd1306::mode::BufferedGraphicsMode;
use ssd1306::prelude::*;
use ssd1306::I2CDisplayInterface;
use ssd1306::Ssd1306;

/// Type alias for the concrete display driver.
///
/// Generic over the I²C implementation so callers pass in their HAL's
/// I²C peripheral.
pub type Display<I2C> =
    Ssd1306<I2CInterface<I2C>, DisplaySize128x64, BufferedGraphicsMode<DisplaySize128x64>>;

pub type ToneChannel = Channel<CriticalSectionRawMutex, Tone, 4>;

/// Initialise the SSD1306 display and clear the screen.
pub fn init<I2C>(i2c: I2C) -> Display<I2C>
where
    I2C: embedded_hal::i2c::I2c,
{
    let interface = I2CDisplayInterface::new(i2c);
    let mut display = Ssd1306::new(interface, DisplaySize128x64, DisplayRotation::Rotate0)
        .into_buffered_graphics_mode();
    let _ = display.init();
    display.clear_buffer();
    let _ = display.flush();
    display
}

fn text_style() -> MonoTextStyle<'static, BinaryColor> {
    MonoTextStyleBuilder::new()
        .font(&FONT_6X10)
        .text_color(BinaryColor::On)
        .build()
}

fn rect(area: Area) -> Rectangle {
    Rectangle::new(
        Point::new(area.x as i32, area.y as i32),
        Size::new(area.width as u32, area.height as u32),
    )
}

/// Baseline for a text row inside `area`.
fn row(area: Area, line: i32) -> Point {
    Point::new(area.x as i32 + 2, area.y as i32 + 9 + line * 10)
}

fn title(frame: FrameId) -> &'static str {
    match frame {
        FrameId::Startup => "MWD UPHOLE",
        FrameId::Home => "HOME",
        FrameId::Tab1 => "MAIN",
        FrameId::Tab2 => "PARAM",
        FrameId::Tab3 => "SETUP",
        FrameId::Tab4 => "DIAG",
        FrameId::Label1 => "Field 1",
        FrameId::Label2 => "Field 2",
        FrameId::Label3 => "Field 3",
        FrameId::Label4 => "Field 4",
        FrameId::Value1 | FrameId::Value2 | FrameId::Value3 | FrameId::Value4 => "",
        FrameId::Status => "",
        FrameId::Alert => "",
    }
}

/// The uphole unit's user-facing hardware.
pub struct LcdUi<I2C> {
    display: Display<I2C>,
    alarm_led: Output<'static>,
    tones: &'static ToneChannel,
}

impl<I2C> LcdUi<I2C>
where
    I2C: embedded_hal::i2c::I2c,
{
    pub fn new(display: Display<I2C>, alarm_led: Output<'static>, tones: &'static ToneChannel) -> Self {
        Self {
            display,
            alarm_led,
            tones,
        }
    }

    fn clear(&mut self, area: Area) {
        let _ = rect(area)
            .into_styled(PrimitiveStyle::with_fill(BinaryColor::Off))
            .draw(&mut self.display);
    }

    fn text(&mut self, text: &str, at: Point) {
        let _ = Text::new(text, at, text_style()).draw(&mut self.display);
    }
}

impl<I2C> Ui for LcdUi<I2C>
where
    I2C: embedded_hal::i2c::I2c,
{
    fn paint_frame(&mut self, frame: FrameId, area: Area, state: &FrameState) {
        self.clear(area);
        let mut line: String<24> = String::new();

        match frame {
            FrameId::Value1 | FrameId::Value2 | FrameId::Value3 | FrameId::Value4 => {
                let cursor = if state.cursor_on { "_" } else { " " };
                let _ = write!(line, "{:+}{}", state.edit_delta, cursor);
            }
            FrameId::Status => {
                let _ = write!(line, "up {}s", state.seconds);
            }
            FrameId::Startup => {
                let _ = write!(line, "starting {}", state.seconds);
            }
            other => {
                let _ = line.push_str(title(other));
            }
        }

        self.text(title(frame), row(area, 0));
        if !line.is_empty() && line.as_str() != title(frame) {
            let at = if title(frame).is_empty() { 0 } else { 1 };
            self.text(line.as_str(), row(area, at));
        }
        let _ = self.display.flush();
    }

    fn show_alert(&mut self, area: Area, alert: &AlertEvent) {
        self.clear(area);
        let _ = rect(area)
            .into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, 1))
            .draw(&mut self.display);

        let header = match alert.alert_type {
            AlertType::Alarm => "ALARM",
            AlertType::Confirmation => "CONFIRM",
            AlertType::Reminder => "REMINDER",
        };
        self.text(header, row(area, 0));

        let mut line: String<24> = String::new();
        let _ = write!(line, "#{} / #{}", alert.header, alert.message);
        self.text(line.as_str(), row(area, 1));

        let hint = if alert.is_alarm() { "hold ENTER" } else { "ENTER" };
        self.text(hint, row(area, 3));
        let _ = self.display.flush();
    }

    fn set_backlight(&mut self, on: bool) {
        if self.display.set_display_on(on).is_err() {
            warn!("LCD: display on/off failed");
        }
    }

    fn beep(&mut self, tone: Tone) {
        if self.tones.try_send(tone).is_err() {
            warn!("Buzzer: busy, {} skipped", tone);
        }
    }

    fn set_alarm_led(&mut self, on: bool) {
        if on {
            self.alarm_led.set_high();
        } else {
            self.alarm_led.set_low();
        }
    }
}

/// Play queued tones on the PWM buzzer.
pub async fn run_buzzer(
    mut pwm: SimplePwm<'static, embassy_nrf::peripherals::PWM0>,
    tones: Receiver<'static, CriticalSectionRawMutex, Tone, 4>,
) -> ! {
    // 16 MHz / 16 = 1 MHz PWM clock.
    pwm.set_prescaler(Prescaler::Div16);

    loop {
        let tone = tones.receive().await;
        let (hz, ms) = match tone {
            Tone::Click => TONE_CLICK,
            Tone::Confirm => TONE_CONFIRM,
            Tone::Reminder => TONE_REMINDER,
            Tone::Alarm => TONE_ALARM,
        };
        let top = (1_000_000 / hz).min(u16::MAX as u32) as u16;
        pwm.set_max_duty(top);
        pwm.set_duty(0, top / 2);
        pwm.enable();
        Timer::after(Duration::from_millis(ms)).await;
        pwm.disable();
    }
}
