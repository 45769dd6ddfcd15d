//! light-timer - programmable light timer firmware for nRF52840.
//!
//! Architecture:
//!   - High-priority interrupt executor: display multiplexing
//!   - Medium-priority interrupt executor: RTC poll / relay / blink, idle countdown
//!   - Thread-mode executor: button UI, persistence
//!
//! The RTC bus belongs to the clock task; the UI hands it work through
//! `CLOCK_REQUESTS`. All other state lives in `SHARED` as single-word atomics.

#![no_std]
#![no_main]

mod board;
mod flash;

use defmt::{info, unwrap, warn};
use defmt_rtt as _;
use panic_probe as _;

use embassy_embedded_hal::adapter::BlockingAsync;
use embassy_executor::{Executor, InterruptExecutor};
use embassy_futures::select::{select, Either};
use embassy_nrf::gpio::{AnyPin, Input, Level, Output, OutputDrive, Pull};
use embassy_nrf::interrupt;
use embassy_nrf::interrupt::{InterruptExt, Priority};
use embassy_nrf::nvmc::Nvmc;
use embassy_nrf::peripherals::TWISPI0;
use embassy_nrf::twim::{self, Twim};
use embassy_nrf::{bind_interrupts, peripherals};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;
use embassy_time::{Delay, Duration, Timer};
use static_cell::StaticCell;

use light_timer::config::{DISPLAY_REFRESH_GAP_US, IDLE_TICK_MS, SCHEDULER_TICK_MS};
use light_timer::rtc::{startup_check, Ds1307};
use light_timer::scheduler::{refresh_display, ClockRequest, ClockTask};
use light_timer::ui::{Effect, Ui};
use light_timer::SharedState;

use crate::board::{ButtonPanel, SegmentPins};
use crate::flash::FlashEeprom;

bind_interrupts!(struct Irqs {
    SPIM0_SPIS0_TWIM0_TWIS0_SPI0_TWI0 => twim::InterruptHandler<peripherals::TWISPI0>;
});

type RtcBus = Twim<'static, TWISPI0>;
type FlashBus = BlockingAsync<Nvmc<'static>>;

// ═══════════════════════════════════════════════════════════════════════════
// Shared state & task plumbing
// ═══════════════════════════════════════════════════════════════════════════

static SHARED: SharedState = SharedState::new();

/// UI → clock task.
static CLOCK_REQUESTS: Channel<CriticalSectionRawMutex, ClockRequest, 2> = Channel::new();

/// Wakes the idle task after the UI reloaded the countdown.
static IDLE_WAKE: Signal<CriticalSectionRawMutex, ()> = Signal::new();

static EXECUTOR_HIGH: InterruptExecutor = InterruptExecutor::new();
static EXECUTOR_MED: InterruptExecutor = InterruptExecutor::new();
static EXECUTOR_LOW: StaticCell<Executor> = StaticCell::new();

#[interrupt]
unsafe fn EGU1_SWI1() {
    EXECUTOR_HIGH.on_interrupt()
}

#[interrupt]
unsafe fn EGU0_SWI0() {
    EXECUTOR_MED.on_interrupt()
}

// ═══════════════════════════════════════════════════════════════════════════
// Tasks
// ═══════════════════════════════════════════════════════════════════════════

#[embassy_executor::task]
async fn display_task(mut port: SegmentPins) {
    let mut delay = Delay;
    loop {
        refresh_display(&SHARED, &mut port, &mut delay);
        Timer::after(Duration::from_micros(DISPLAY_REFRESH_GAP_US)).await;
    }
}

#[embassy_executor::task]
async fn clock_task(mut rtc: Ds1307<RtcBus>, mut relay: Output<'static>) {
    let mut task = ClockTask::new();
    loop {
        match select(
            Timer::after(Duration::from_millis(SCHEDULER_TICK_MS)),
            CLOCK_REQUESTS.receive(),
        )
        .await
        {
            Either::First(()) => task.tick(&SHARED, &mut rtc, &mut relay),
            Either::Second(request) => task.handle(request, &SHARED, &mut rtc, &mut relay),
        }
    }
}

#[embassy_executor::task]
async fn idle_task() {
    loop {
        if SHARED.idle_expired() {
            IDLE_WAKE.wait().await;
        }
        // A restart begins a fresh full period.
        match select(
            Timer::after(Duration::from_millis(IDLE_TICK_MS)),
            IDLE_WAKE.wait(),
        )
        .await
        {
            Either::First(()) => {
                SHARED.tick_idle();
            }
            Either::Second(()) => {}
        }
    }
}

#[embassy_executor::task]
async fn ui_task(
    buttons: ButtonPanel,
    mut sleep_led: Output<'static>,
    mut flash: FlashBus,
    mut store: FlashEeprom,
) {
    let mut ui = Ui::new();
    info!("UI task started");

    loop {
        let step = ui.step(buttons.read(), &SHARED);
        if step.idle_restarted {
            IDLE_WAKE.signal(());
        }

        match step.effect {
            Some(Effect::WaitForRelease) => {
                sleep_led.set_low();
                buttons.wait_for_release().await;
                SHARED.restart_idle();
                IDLE_WAKE.signal(());
            }
            Some(Effect::SetClock(time)) => CLOCK_REQUESTS.send(ClockRequest::Set(time)).await,
            Some(Effect::RefreshClock) => CLOCK_REQUESTS.send(ClockRequest::Refresh).await,
            Some(Effect::Persist(slot, time)) => {
                if let Err(e) = store.persist(&mut flash, slot, time).await {
                    warn!("Persist {:?} failed: {:?}", slot, e);
                }
            }
            None => {}
        }

        sleep_led.set_level(Level::from(ui.sleep_led(&SHARED)));
        Timer::after(Duration::from_millis(ui.poll_interval_ms())).await;
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Entry point
// ═══════════════════════════════════════════════════════════════════════════

#[cortex_m_rt::entry]
fn main() -> ! {
    info!("light-timer starting...");

    let p = embassy_nrf::init(Default::default());

    // ── Outputs ─────────────────────────────────────────────────────────
    let out = |pin: AnyPin| Output::new(pin, Level::Low, OutputDrive::Standard);
    let segments = [
        out(p.P1_01.into()),
        out(p.P1_02.into()),
        out(p.P1_03.into()),
        out(p.P1_04.into()),
        out(p.P1_05.into()),
        out(p.P1_06.into()),
        out(p.P1_07.into()),
        out(p.P1_08.into()),
    ];
    let digits = [
        out(p.P0_03.into()),
        out(p.P0_04.into()),
        out(p.P0_28.into()),
        out(p.P0_29.into()),
    ];
    let relay = out(p.P0_30.into());
    let sleep_led = out(p.P0_31.into());

    let buttons = ButtonPanel::new(
        Input::new(p.P0_11, Pull::Up),
        Input::new(p.P0_12, Pull::Up),
        Input::new(p.P0_24, Pull::Up),
    );

    // ── RTC ─────────────────────────────────────────────────────────────
    let mut twim_config = twim::Config::default();
    twim_config.frequency = twim::Frequency::K100;
    let mut rtc = Ds1307::new(Twim::new(p.TWISPI0, Irqs, p.P0_26, p.P0_27, twim_config));

    let brownout = board::brownout_detected(&mut Delay);
    if let Err(e) = rtc.start_oscillator() {
        warn!("RTC: oscillator start failed: {:?}", e);
    }
    match startup_check(&mut rtc, brownout) {
        Ok(time) => SHARED.system_time.store(time),
        Err(e) => warn!("RTC: startup check failed: {:?}", e),
    }

    // ── Stored window ───────────────────────────────────────────────────
    let mut flash = BlockingAsync::new(Nvmc::new(p.NVMC));
    let mut store = FlashEeprom::new();
    embassy_futures::block_on(store.load(&mut flash));
    if let Err(e) = light_timer::load_window(store.image(), &SHARED) {
        warn!("Window load failed: {:?}", e);
    }

    // ── Executors ───────────────────────────────────────────────────────
    interrupt::EGU1_SWI1.set_priority(Priority::P6);
    let spawner = EXECUTOR_HIGH.start(interrupt::EGU1_SWI1);
    unwrap!(spawner.spawn(display_task(SegmentPins::new(segments, digits))));

    interrupt::EGU0_SWI0.set_priority(Priority::P7);
    let spawner = EXECUTOR_MED.start(interrupt::EGU0_SWI0);
    unwrap!(spawner.spawn(clock_task(rtc, relay)));
    unwrap!(spawner.spawn(idle_task()));

    let executor = EXECUTOR_LOW.init(Executor::new());
    executor.run(|spawner| {
        unwrap!(spawner.spawn(ui_task(buttons, sleep_led, flash, store)));
    })
}
