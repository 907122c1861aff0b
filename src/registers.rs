//! Register map of the skin controller.
//!
//! The controller is an FT5x06-family touch chip driven in its factory test
//! mode, where the TX/RX matrix can be read one drive line at a time.

/// Number of TX (drive) lines on the skin.
pub const TX_COUNT: usize = 21;
/// Number of RX (sense) lines on the skin.
pub const RX_COUNT: usize = 12;
/// Cells in the full physical matrix.
pub const CELL_COUNT: usize = TX_COUNT * RX_COUNT;
/// Bytes returned by one burst read of a TX row, two per RX line.
pub const FRAME_BYTES_PER_ROW: usize = 2 * RX_COUNT;

/// Addresses and values of the controller registers used by the scanner.
///
/// Kept as one table so a new controller revision is a new constant rather
/// than a hunt for literals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RegisterMap {
    /// 7-bit I²C address of the controller.
    pub device_address: u8,
    pub mode: u8,
    pub mode_normal: u8,
    pub mode_test: u8,
    /// Test mode with the data-read toggle bit set. Writing it latches a
    /// fresh frame.
    pub scan_trigger: u8,
    pub calibration: u8,
    pub calibration_auto: u8,
    pub tx_select: u8,
    /// First register of the RX burst, high byte first.
    pub rx_data: u8,
}

impl RegisterMap {
    pub const SKIN_V1: RegisterMap = RegisterMap {
        device_address: 0x38,
        mode: 0x00,
        mode_normal: 0x00,
        mode_test: 0x40,
        scan_trigger: 0xC0,
        calibration: 0xA7,
        calibration_auto: 0x04,
        tx_select: 0x01,
        rx_data: 0x10,
    };
}

impl Default for RegisterMap {
    fn default() -> Self {
        Self::SKIN_V1
    }
}

/// Value to write to the TX select register for a logical TX line.
///
/// TX lines are wired in reverse on the skin, so logical line 0 is
/// physical line `TX_COUNT - 1`.
pub const fn physical_tx_address(logical: usize) -> u8 {
    (TX_COUNT - 1 - logical) as u8
}

/// Combines the big-endian byte pair of one RX line into a sample.
pub const fn sample_from_bytes(high: u8, low: u8) -> u16 {
    ((high as u16) << 8) | low as u16
}
