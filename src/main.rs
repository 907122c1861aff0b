//! # Robot skin streamer for the Adafruit KB2040
//!
//! Reads the raw capacitance matrix of the skin controller on the STEMMA QT
//! port and streams every frame over USB serial.
//!
//! The on-board NeoPixel shows the state of the link: blue while booting,
//! red while the controller does not answer, green while streaming and
//! amber when the last scan had bus faults.

#![no_std]
#![no_main]

use cortex_m_rt::entry;
use defmt_rtt as _;
use embedded_hal::timer::CountDown;
use embedded_time::duration::Extensions;
use embedded_time::fixed_point::FixedPoint;
use embedded_time::rate::Extensions as _;
use panic_halt as _;

use adafruit_kb2040::hal::clocks::{init_clocks_and_plls, Clock};
use adafruit_kb2040::hal::gpio::FunctionI2C;
use adafruit_kb2040::hal::pio::PIOExt;
use adafruit_kb2040::hal::timer::Timer;
use adafruit_kb2040::hal::usb::UsbBus;
use adafruit_kb2040::hal::watchdog::Watchdog;
use adafruit_kb2040::hal::{pac, Sio, I2C};
use adafruit_kb2040::XOSC_CRYSTAL_FREQ;
use skin_matrix::{Config, MatrixScanner};
use usb_device::class_prelude::UsbBusAllocator;
use usb_device::prelude::{UsbDeviceBuilder, UsbVidPid};
use usbd_serial::SerialPort;
use ws2812_pio::Ws2812;

mod status;
mod stream;

use status::{Status, StatusLed};
use stream::{write_frame, SerialWriter};

static mut USB_BUS: Option<UsbBusAllocator<adafruit_kb2040::hal::usb::UsbBus>> = None;

/// Polls of the USB device between two connection attempts, 10ms apart.
const RETRY_POLLS: u32 = 100;

/// Entry point to our bare-metal application.
///
/// Configures the RP2040 peripherals, the status LED, the USB serial port
/// and the skin controller, then scans the matrix in an infinite loop.
#[entry]
fn main() -> ! {
    // Configure the RP2040 peripherals

    let mut pac = pac::Peripherals::take().unwrap();
    let core = pac::CorePeripherals::take().unwrap();
    let mut watchdog = Watchdog::new(pac.WATCHDOG);

    let clocks = init_clocks_and_plls(
        XOSC_CRYSTAL_FREQ,
        pac.XOSC,
        pac.CLOCKS,
        pac.PLL_SYS,
        pac.PLL_USB,
        &mut pac.RESETS,
        &mut watchdog,
    )
    .ok()
    .unwrap();

    let sio = Sio::new(pac.SIO);

    let pins = adafruit_kb2040::Pins::new(
        pac.IO_BANK0,
        pac.PADS_BANK0,
        sio.gpio_bank0,
        &mut pac.RESETS,
    );

    let timer = Timer::new(pac.TIMER, &mut pac.RESETS);
    let mut retry_timer = timer.count_down();

    // Configure the addressable LED
    let (mut pio, sm0, _, _, _) = pac.PIO0.split(&mut pac.RESETS);
    let ws = Ws2812::new(
        pins.neopixel.into_mode(),
        &mut pio,
        sm0,
        clocks.peripheral_clock.freq(),
        timer.count_down(),
    );
    let mut led = StatusLed::new(ws);
    led.show(Status::Booting);

    let usb_bus = UsbBusAllocator::new(UsbBus::new(
        pac.USBCTRL_REGS,
        pac.USBCTRL_DPRAM,
        clocks.usb_clock,
        true,
        &mut pac.RESETS,
    ));
    unsafe {
        USB_BUS = Some(usb_bus);
    }
    let bus_ref = unsafe { USB_BUS.as_ref().unwrap() };
    let mut serial = SerialPort::new(bus_ref);
    let mut usb_dev = UsbDeviceBuilder::new(bus_ref, UsbVidPid(0x16c0, 0x27dd))
        .manufacturer("Robot Skin")
        .product("Skin Matrix Stream")
        .serial_number("SKIN0001")
        .device_class(usbd_serial::USB_CLASS_CDC)
        .build();

    // Skin controller on the STEMMA QT connector
    let config = Config::default();
    let i2c = I2C::i2c0(
        pac.I2C0,
        pins.sda.into_mode::<FunctionI2C>(),
        pins.scl.into_mode::<FunctionI2C>(),
        config.bus.frequency_hz.Hz(),
        &mut pac.RESETS,
        clocks.system_clock.freq(),
    );
    let delay = cortex_m::delay::Delay::new(core.SYST, clocks.system_clock.freq().integer());
    let mut skin = MatrixScanner::new(i2c, delay, config);
    defmt::info!(
        "skin matrix {}x{}, bus {}",
        skin.tx_count(),
        skin.rx_count(),
        config.bus
    );

    let mut raw_ready = false;
    loop {
        usb_dev.poll(&mut [&mut serial]);

        if !skin.is_initialized() || !raw_ready {
            raw_ready = skin.initialize().is_ok() && skin.enable_raw_mode(true).is_ok();
            if raw_ready {
                defmt::info!("skin controller ready");
                led.show(Status::Streaming);
                continue;
            }
            led.show(Status::ConnectionFailed);
            for _ in 0..RETRY_POLLS {
                retry_timer.start(10.milliseconds());
                let _ = nb::block!(retry_timer.wait());
                usb_dev.poll(&mut [&mut serial]);
            }
            continue;
        }

        if !skin.poll() {
            continue;
        }
        if skin.last_scan_ok() {
            led.show(Status::Streaming);
        } else {
            let health = skin.scan_health();
            defmt::warn!(
                "scan {} had {} faults",
                health.scans,
                health.last_scan_faults
            );
            led.show(Status::ScanFault);
        }

        // Frames are dropped while no terminal is attached.
        if !serial.dtr() {
            continue;
        }
        if let Some(grid) = skin.grid() {
            let mut writer = SerialWriter::new(&mut usb_dev, &mut serial);
            if write_frame(&mut writer, grid).is_err() {
                defmt::debug!("frame dropped, host not reading");
            }
        }
    }
}
