//! RP2040 triage station board
//!
//! Pin assignment:
//!
//! | Function      | Pins              | Peripheral   |
//! |---------------|-------------------|--------------|
//! | Host link     | GPIO0 TX, GPIO1 RX| UART0        |
//! | Sensor bus    | GPIO4 SDA, GPIO5 SCL | I2C0 400 kHz |
//! | Servo 1 / 2   | GPIO14 / GPIO15   | PWM slice 7  |
//!
//! Every I2C device (Modulino knob, buzzer and pixels, VL53L4CD, LSM6DSOX,
//! HS3003 and the SH1106 OLED) shares the one blocking bus.

use core::cell::RefCell;

use defmt::*;
use embassy_embedded_hal::shared_bus::blocking::i2c::I2cDevice;
use embassy_rp::bind_interrupts;
use embassy_rp::clocks::clk_sys_freq;
use embassy_rp::i2c::{self, I2c};
use embassy_rp::peripherals::{I2C0, UART0};
use embassy_rp::pwm::{self, Pwm, PwmOutput};
use embassy_rp::uart::{BufferedInterruptHandler, Config as UartConfig, Uart};
use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use static_cell::StaticCell;

use triage_core::traits::{Board, Peripherals};

use crate::clock::UptimeClock;
use crate::drivers::{
    Hs3003, Lsm6dsox, ModulinoBuzzer, ModulinoKnob, ModulinoPixels, PwmServo, Sh1106, Vl53l4cd,
};
use crate::serial::UartLink;

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
});

const HOST_BAUD: u32 = 115_200;
const I2C_FREQUENCY_HZ: u32 = 400_000;

/// Servo PWM: integer divider and frame rate
const PWM_DIV: u8 = 64;
const SERVO_FREQUENCY_HZ: u32 = 50;

type I2cBus = Mutex<NoopRawMutex, RefCell<I2c<'static, I2C0, i2c::Blocking>>>;

/// One device's handle on the shared sensor bus
pub type SharedI2c = I2cDevice<'static, NoopRawMutex, I2c<'static, I2C0, i2c::Blocking>>;

// Static cells for the bus and UART buffers (must live forever)
static I2C_BUS: StaticCell<I2cBus> = StaticCell::new();
static TX_BUF: StaticCell<[u8; 512]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 1024]> = StaticCell::new();

/// The triage station main board
pub struct TriageBoard;

impl Board for TriageBoard {
    type Knob = ModulinoKnob<SharedI2c>;
    type Distance = Vl53l4cd<SharedI2c>;
    type Motion = Lsm6dsox<SharedI2c>;
    type Thermometer = Hs3003<SharedI2c>;
    type Servo = PwmServo<PwmOutput<'static>>;
    type Buzzer = ModulinoBuzzer<SharedI2c>;
    type Indicator = ModulinoPixels<SharedI2c>;
    type Display = Sh1106<SharedI2c>;
    type Serial = UartLink;
    type Clock = UptimeClock;
}

/// Configure the peripherals and start the sensors
///
/// Sensor start-up failures are only logged; the sampler reports and
/// masks them once the loop runs. The display is brought up by the
/// controller's boot sequence.
pub fn bring_up(p: embassy_rp::Peripherals) -> Peripherals<TriageBoard> {
    // Host link
    let mut uart_config = UartConfig::default();
    uart_config.baudrate = HOST_BAUD;

    let tx_buf = TX_BUF.init([0u8; 512]);
    let rx_buf = RX_BUF.init([0u8; 1024]);

    let uart = Uart::new_blocking(p.UART0, p.PIN_0, p.PIN_1, uart_config);
    let uart = uart.into_buffered(Irqs, tx_buf, rx_buf);
    let (tx, rx) = uart.split();
    info!("UART initialized for host link");

    // Shared sensor bus
    let mut i2c_config = i2c::Config::default();
    i2c_config.frequency = I2C_FREQUENCY_HZ;
    let i2c = I2c::new_blocking(p.I2C0, p.PIN_5, p.PIN_4, i2c_config);
    let bus: &'static I2cBus = I2C_BUS.init(Mutex::new(RefCell::new(i2c)));
    info!("I2C0 initialized");

    let mut distance = Vl53l4cd::new(I2cDevice::new(bus));
    if let Err(e) = distance.start() {
        warn!("VL53L4CD start failed: {}", e);
    }

    let mut motion = Lsm6dsox::new(I2cDevice::new(bus));
    if let Err(e) = motion.init() {
        warn!("LSM6DSOX init failed: {}", e);
    }

    let mut thermometer = Hs3003::new(I2cDevice::new(bus));
    if let Err(e) = thermometer.trigger() {
        warn!("HS3003 trigger failed: {}", e);
    }

    // Servos
    let mut pwm_config = pwm::Config::default();
    pwm_config.divider = PWM_DIV.into();
    pwm_config.top = (clk_sys_freq() / (SERVO_FREQUENCY_HZ * PWM_DIV as u32) - 1) as u16;
    let servos = Pwm::new_output_ab(p.PWM_SLICE7, p.PIN_14, p.PIN_15, pwm_config);
    let (progress_pwm, result_pwm) = servos.split();
    let progress_pwm = unwrap!(progress_pwm);
    let result_pwm = unwrap!(result_pwm);
    info!("Servo PWM initialized");

    Peripherals {
        knob: ModulinoKnob::new(I2cDevice::new(bus)),
        distance,
        motion,
        thermometer,
        progress_servo: PwmServo::new(progress_pwm),
        result_servo: PwmServo::new(result_pwm),
        buzzer: ModulinoBuzzer::new(I2cDevice::new(bus)),
        indicator: ModulinoPixels::new(I2cDevice::new(bus)),
        display: Sh1106::new(I2cDevice::new(bus)),
        serial: UartLink::new(rx, tx),
        clock: UptimeClock,
    }
}
