use embedded_hal::blocking::delay::{DelayMs, DelayUs};
use embedded_hal::blocking::i2c::{Write, WriteRead};

use crate::bus::RegisterBus;
use crate::config::Config;
use crate::error::{Error, FaultKind, ScanHealth, TransactionFault};
use crate::grid::Grid;
use crate::registers::{
    physical_tx_address, sample_from_bytes, FRAME_BYTES_PER_ROW, RX_COUNT, TX_COUNT,
};

/// Raw capacitance scanner for the skin matrix.
///
/// Call [`initialize`](Self::initialize) once, switch to raw mode with
/// [`enable_raw_mode`](Self::enable_raw_mode), then call
/// [`poll`](Self::poll) from the main loop. Every successful poll rewrites
/// the grid returned by [`grid`](Self::grid).
pub struct MatrixScanner<I2C, D> {
    bus: RegisterBus<I2C>,
    delay: D,
    config: Config,
    initialized: bool,
    raw_mode: bool,
    grid: Option<Grid>,
    health: ScanHealth,
}

impl<I2C, D> MatrixScanner<I2C, D> {
    pub fn new(i2c: I2C, delay: D, config: Config) -> Self {
        Self {
            bus: RegisterBus::new(i2c, config.registers.device_address),
            delay,
            config,
            initialized: false,
            raw_mode: false,
            grid: None,
            health: ScanHealth::default(),
        }
    }

    /// Latest frame, or `None` until raw mode has been requested once.
    pub fn grid(&self) -> Option<&Grid> {
        self.grid.as_ref()
    }

    pub const fn tx_count(&self) -> usize {
        TX_COUNT
    }

    pub const fn rx_count(&self) -> usize {
        RX_COUNT
    }

    /// Rows of the grid.
    pub fn active_tx_count(&self) -> usize {
        self.config.tx_lines.active_count()
    }

    /// Columns of the grid.
    pub fn active_rx_count(&self) -> usize {
        self.config.rx_lines.active_count()
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn is_raw_mode(&self) -> bool {
        self.raw_mode
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn scan_health(&self) -> &ScanHealth {
        &self.health
    }

    pub fn last_scan_ok(&self) -> bool {
        self.health.last_scan_ok()
    }

    /// Gives back the bus and the delay provider.
    pub fn release(self) -> (I2C, D) {
        (self.bus.release(), self.delay)
    }
}

impl<I2C, D, E> MatrixScanner<I2C, D>
where
    I2C: Write<Error = E> + WriteRead<Error = E>,
    D: DelayMs<u32> + DelayUs<u32>,
{
    /// Puts the controller in normal mode and turns on auto calibration.
    ///
    /// Fails with [`Error::Connection`] if the controller does not answer
    /// the mode write. Running it again repeats the whole sequence.
    pub fn initialize(&mut self) -> Result<(), Error<E>> {
        let regs = self.config.registers;
        if let Err(e) = self.bus.write_register(regs.mode, regs.mode_normal) {
            #[cfg(feature = "defmt")]
            defmt::error!("I2C connection to skin controller failed, check SDA/SCL");
            self.initialized = false;
            return Err(Error::Connection(e));
        }
        self.delay.delay_ms(self.config.init_settle_ms);
        self.initialized = true;

        // Calibration is best effort, the controller scans without it.
        if self
            .bus
            .write_register(regs.calibration, regs.calibration_auto)
            .is_err()
        {
            #[cfg(feature = "defmt")]
            defmt::warn!("auto calibration not acknowledged");
        }
        Ok(())
    }

    /// Requests raw data mode on or off.
    ///
    /// The first call allocates the grid, whatever `enable` is. The
    /// controller is only switched to test mode once initialized.
    pub fn enable_raw_mode(&mut self, enable: bool) -> Result<(), Error<E>> {
        self.raw_mode = enable;
        if self.grid.is_none() {
            self.grid = Grid::new(self.active_tx_count(), self.active_rx_count());
        }
        if !self.initialized {
            return Ok(());
        }

        let regs = self.config.registers;
        if enable {
            self.bus
                .write_register(regs.mode, regs.mode_test)
                .map_err(Error::Transaction)?;
            #[cfg(feature = "defmt")]
            defmt::info!("skin mode set to raw data stream");
        } else if self.config.return_to_normal_on_disable {
            self.bus
                .write_register(regs.mode, regs.mode_normal)
                .map_err(Error::Transaction)?;
            #[cfg(feature = "defmt")]
            defmt::info!("skin mode set to normal");
        }
        Ok(())
    }

    /// Scans the matrix if the controller is initialized and in raw mode.
    ///
    /// Returns true if a scan was performed. Bus failures during the scan
    /// are reported through [`scan_health`](Self::scan_health).
    pub fn poll(&mut self) -> bool {
        if !self.initialized || !self.raw_mode {
            return false;
        }
        self.scan_matrix();
        true
    }

    fn scan_matrix(&mut self) {
        let Self {
            bus,
            delay,
            config,
            grid,
            health,
            ..
        } = self;
        let grid = match grid.as_mut() {
            Some(grid) => grid,
            None => return,
        };
        let regs = config.registers;
        health.begin_scan();

        if bus.write_register(regs.mode, regs.scan_trigger).is_err() {
            record_fault(
                health,
                TransactionFault {
                    register: regs.mode,
                    kind: FaultKind::Write,
                    tx_line: None,
                },
            );
        }

        let mut buffer = [0u8; FRAME_BYTES_PER_ROW];
        for (row, tx) in config.tx_lines.iter_active().enumerate() {
            if bus
                .write_register(regs.tx_select, physical_tx_address(tx))
                .is_err()
            {
                record_fault(
                    health,
                    TransactionFault {
                        register: regs.tx_select,
                        kind: FaultKind::Write,
                        tx_line: Some(tx as u8),
                    },
                );
            }
            // Analog front end settles after switching the drive line.
            delay.delay_us(config.line_settle_us);

            if bus.read_registers(regs.rx_data, &mut buffer).is_err() {
                // Keep the previous samples of this row.
                record_fault(
                    health,
                    TransactionFault {
                        register: regs.rx_data,
                        kind: FaultKind::BurstRead,
                        tx_line: Some(tx as u8),
                    },
                );
                continue;
            }

            if let Some(samples) = grid.row_mut(row) {
                for (slot, rx) in samples.iter_mut().zip(config.rx_lines.iter_active()) {
                    *slot = sample_from_bytes(buffer[2 * rx], buffer[2 * rx + 1]);
                }
            }
        }
    }
}

fn record_fault(health: &mut ScanHealth, fault: TransactionFault) {
    #[cfg(feature = "defmt")]
    defmt::warn!("scan fault: {}", fault);
    health.record(fault);
}
