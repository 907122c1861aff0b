/// Errors returned by the scanner, wrapping the bus error `E`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// The controller did not acknowledge the initial mode write. Usually a
    /// wiring fault on SDA/SCL or a missing pull-up.
    Connection(E),
    /// A mode write outside of a scan failed.
    Transaction(E),
}

impl<E> Error<E> {
    /// The underlying bus error.
    pub fn bus_error(&self) -> &E {
        match self {
            Error::Connection(e) | Error::Transaction(e) => e,
        }
    }
}

/// Direction of a failed bus transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FaultKind {
    Write,
    BurstRead,
}

/// A transaction that failed during a scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TransactionFault {
    pub register: u8,
    pub kind: FaultKind,
    /// Logical TX line being scanned, `None` for the scan trigger.
    pub tx_line: Option<u8>,
}

/// Health counters of the scan loop.
///
/// Transactions inside a scan are never retried and never abort the scan,
/// so this is the only place their failures show up.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ScanHealth {
    /// Scans performed.
    pub scans: u32,
    /// Scans with at least one failed transaction.
    pub failed_scans: u32,
    /// Failed transactions over all scans.
    pub failed_transactions: u32,
    /// Failed transactions during the most recent scan.
    pub last_scan_faults: u8,
    pub last_fault: Option<TransactionFault>,
}

impl ScanHealth {
    pub(crate) fn begin_scan(&mut self) {
        self.scans = self.scans.wrapping_add(1);
        self.last_scan_faults = 0;
    }

    pub(crate) fn record(&mut self, fault: TransactionFault) {
        if self.last_scan_faults == 0 {
            self.failed_scans = self.failed_scans.wrapping_add(1);
        }
        self.last_scan_faults = self.last_scan_faults.saturating_add(1);
        self.failed_transactions = self.failed_transactions.wrapping_add(1);
        self.last_fault = Some(fault);
    }

    /// True if the most recent scan completed without a failed transaction.
    pub fn last_scan_ok(&self) -> bool {
        self.last_scan_faults == 0
    }
}
