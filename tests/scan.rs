use embedded_hal_mock::delay::MockNoop;
use embedded_hal_mock::i2c::{Mock as I2cMock, Transaction};
use embedded_hal_mock::MockError;
use skin_matrix::registers::physical_tx_address;
use skin_matrix::{Config, FaultKind, LineMask, MatrixScanner, RX_COUNT, TX_COUNT};
use std::io::ErrorKind;

const ADDR: u8 = 0x38;

/// Sample the fake controller reports for a physical cell.
fn cell(tx: usize, rx: usize, frame: u16) -> u16 {
    frame * 0x1000 + (tx as u16) * 0x20 + rx as u16
}

fn row_bytes(tx: usize, frame: u16) -> Vec<u8> {
    (0..RX_COUNT)
        .flat_map(|rx| cell(tx, rx, frame).to_be_bytes())
        .collect()
}

fn startup() -> Vec<Transaction> {
    vec![
        Transaction::write(ADDR, vec![0x00, 0x00]),
        Transaction::write(ADDR, vec![0xA7, 0x04]),
        Transaction::write(ADDR, vec![0x00, 0x40]),
    ]
}

fn scan(tx_lines: &LineMask<TX_COUNT>, frame: u16) -> Vec<Transaction> {
    let mut t = vec![Transaction::write(ADDR, vec![0x00, 0xC0])];
    for tx in tx_lines.iter_active() {
        t.push(Transaction::write(ADDR, vec![0x01, physical_tx_address(tx)]));
        t.push(Transaction::write_read(ADDR, vec![0x10], row_bytes(tx, frame)));
    }
    t
}

fn started(expectations: &[Transaction], config: Config) -> MatrixScanner<I2cMock, MockNoop> {
    let mut skin = MatrixScanner::new(I2cMock::new(expectations), MockNoop::new(), config);
    skin.initialize().unwrap();
    skin.enable_raw_mode(true).unwrap();
    skin
}

fn finish(skin: MatrixScanner<I2cMock, MockNoop>) {
    let (mut i2c, _) = skin.release();
    i2c.done();
}

#[test]
fn full_matrix_scan() {
    let all = LineMask::all();
    let mut expectations = startup();
    expectations.extend(scan(&all, 0));
    let mut skin = started(&expectations, Config::default());

    assert!(skin.poll());
    assert!(skin.last_scan_ok());

    let grid = skin.grid().unwrap();
    assert_eq!((grid.rows(), grid.cols()), (TX_COUNT, RX_COUNT));
    for tx in 0..TX_COUNT {
        for rx in 0..RX_COUNT {
            assert_eq!(grid.get(tx, rx), Some(cell(tx, rx, 0)));
        }
    }
    finish(skin);
}

#[test]
fn row_is_decoded_high_byte_first() {
    let all = LineMask::all();
    let mut expectations = startup();
    let mut t = scan(&all, 0);
    let mut first_row = vec![0u8; 2 * RX_COUNT];
    first_row[0] = 0x12;
    first_row[1] = 0x34;
    t[2] = Transaction::write_read(ADDR, vec![0x10], first_row);
    expectations.extend(t);
    let mut skin = started(&expectations, Config::default());

    assert!(skin.poll());
    assert_eq!(skin.grid().unwrap().get(0, 0), Some(0x1234));
    assert_eq!(skin.grid().unwrap().get(0, 1), Some(0));
    finish(skin);
}

#[test]
fn disabled_lines_are_compacted() {
    let tx_lines = LineMask::all().with_disabled(0).with_disabled(7);
    let rx_lines = LineMask::all().with_disabled(3).with_disabled(11);
    let config = Config::default().tx_lines(tx_lines).rx_lines(rx_lines);

    let mut expectations = startup();
    expectations.extend(scan(&tx_lines, 0));
    let mut skin = started(&expectations, config);
    assert!(skin.poll());

    let grid = skin.grid().unwrap();
    assert_eq!(grid.rows(), 19);
    assert_eq!(grid.cols(), 10);
    assert_eq!(grid.len(), 19 * 10);
    for i in 0..grid.rows() {
        for j in 0..grid.cols() {
            let tx = tx_lines.nth_active(i).unwrap();
            let rx = rx_lines.nth_active(j).unwrap();
            assert_eq!(grid.get(i, j), Some(cell(tx, rx, 0)));
        }
    }
    // Row 0 is physical line 1, column 3 is physical line 4.
    assert_eq!(grid.get(0, 3), Some(cell(1, 4, 0)));
    finish(skin);
}

#[test]
fn every_poll_rewrites_the_grid() {
    let all = LineMask::all();
    let mut expectations = startup();
    expectations.extend(scan(&all, 0));
    expectations.extend(scan(&all, 1));
    let mut skin = started(&expectations, Config::default());

    assert!(skin.poll());
    assert_eq!(skin.grid().unwrap().get(5, 5), Some(cell(5, 5, 0)));
    assert!(skin.poll());
    let grid = skin.grid().unwrap();
    for tx in 0..TX_COUNT {
        for rx in 0..RX_COUNT {
            assert_eq!(grid.get(tx, rx), Some(cell(tx, rx, 1)));
        }
    }
    assert_eq!(skin.scan_health().scans, 2);
    finish(skin);
}

#[test]
fn failed_burst_read_keeps_previous_row() {
    let all = LineMask::all();
    let mut expectations = startup();
    expectations.extend(scan(&all, 0));
    let mut second = scan(&all, 1);
    // Burst read of logical row 2: trigger, then (select, read) pairs.
    second[2 * 2 + 2] = Transaction::write_read(ADDR, vec![0x10], vec![0; 2 * RX_COUNT])
        .with_error(MockError::Io(ErrorKind::Other));
    expectations.extend(second);
    let mut skin = started(&expectations, Config::default());

    assert!(skin.poll());
    assert!(skin.poll());
    assert!(!skin.last_scan_ok());

    let grid = skin.grid().unwrap();
    assert_eq!(grid.get(1, 0), Some(cell(1, 0, 1)));
    assert_eq!(grid.get(2, 0), Some(cell(2, 0, 0)));
    assert_eq!(grid.get(3, 0), Some(cell(3, 0, 1)));

    let health = skin.scan_health();
    assert_eq!(health.scans, 2);
    assert_eq!(health.failed_scans, 1);
    assert_eq!(health.failed_transactions, 1);
    let fault = health.last_fault.unwrap();
    assert_eq!(fault.register, 0x10);
    assert_eq!(fault.kind, FaultKind::BurstRead);
    assert_eq!(fault.tx_line, Some(2));
    finish(skin);
}

#[test]
fn failed_writes_do_not_abort_the_scan() {
    let all = LineMask::all();
    let mut expectations = startup();
    let mut t = scan(&all, 0);
    t[0] = Transaction::write(ADDR, vec![0x00, 0xC0]).with_error(MockError::Io(ErrorKind::Other));
    t[1] = Transaction::write(ADDR, vec![0x01, physical_tx_address(0)])
        .with_error(MockError::Io(ErrorKind::Other));
    expectations.extend(t);
    let mut skin = started(&expectations, Config::default());

    assert!(skin.poll());
    assert_eq!(skin.grid().unwrap().get(0, 0), Some(cell(0, 0, 0)));

    let health = skin.scan_health();
    assert_eq!(health.failed_transactions, 2);
    assert_eq!(health.last_scan_faults, 2);
    let fault = health.last_fault.unwrap();
    assert_eq!(fault.register, 0x01);
    assert_eq!(fault.kind, FaultKind::Write);
    assert_eq!(fault.tx_line, Some(0));
    finish(skin);
}

#[test]
fn raw_mode_requested_before_initialize() {
    let all = LineMask::all();
    let mut expectations = vec![
        Transaction::write(ADDR, vec![0x00, 0x00]),
        Transaction::write(ADDR, vec![0xA7, 0x04]),
    ];
    expectations.extend(scan(&all, 0));
    let mut skin = MatrixScanner::new(
        I2cMock::new(&expectations),
        MockNoop::new(),
        Config::default(),
    );

    // No mode write happens while uninitialized.
    skin.enable_raw_mode(true).unwrap();
    assert!(!skin.poll());

    // The flag survives initialization. Test mode is never written here,
    // only the scan trigger at the start of each scan.
    skin.initialize().unwrap();
    assert!(skin.poll());
    finish(skin);
}
