use crate::lines::LineMask;
use crate::registers::{RegisterMap, RX_COUNT, TX_COUNT};

/// Bus parameters the transport should be built with.
///
/// The scanner does not own the peripheral setup, the HAL applies these
/// when the I²C bus is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BusConfig {
    pub frequency_hz: u32,
    pub timeout_ms: u32,
}

impl BusConfig {
    /// Fast mode, 400kHz.
    pub const FAST: BusConfig = BusConfig {
        frequency_hz: 400_000,
        timeout_ms: 200,
    };
}

impl Default for BusConfig {
    fn default() -> Self {
        Self::FAST
    }
}

/// Scanner configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    pub registers: RegisterMap,
    pub bus: BusConfig,
    pub tx_lines: LineMask<TX_COUNT>,
    pub rx_lines: LineMask<RX_COUNT>,
    /// Write `mode_normal` when raw mode is switched off. The controller
    /// otherwise stays in test mode until the next `initialize`.
    pub return_to_normal_on_disable: bool,
    /// Wait after the first successful mode write.
    pub init_settle_ms: u32,
    /// Wait between selecting a TX line and reading it back.
    pub line_settle_us: u32,
}

impl Config {
    pub fn registers(mut self, registers: RegisterMap) -> Self {
        self.registers = registers;
        self
    }

    pub fn bus(mut self, bus: BusConfig) -> Self {
        self.bus = bus;
        self
    }

    pub fn tx_lines(mut self, lines: LineMask<TX_COUNT>) -> Self {
        self.tx_lines = lines;
        self
    }

    pub fn rx_lines(mut self, lines: LineMask<RX_COUNT>) -> Self {
        self.rx_lines = lines;
        self
    }

    pub fn return_to_normal_on_disable(mut self, enable: bool) -> Self {
        self.return_to_normal_on_disable = enable;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            registers: RegisterMap::SKIN_V1,
            bus: BusConfig::FAST,
            tx_lines: LineMask::all(),
            rx_lines: LineMask::all(),
            return_to_normal_on_disable: false,
            init_settle_ms: 100,
            line_settle_us: 50,
        }
    }
}
