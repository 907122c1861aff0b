use skin_matrix::Grid;
use ufmt::{uWrite, uwrite};
use usb_device::bus::UsbBus;
use usb_device::device::UsbDevice;
use usb_device::UsbError;
use usbd_serial::SerialPort;

/// USB polls allowed while the endpoint buffer stays full.
const MAX_STALLS: u32 = 1_000;

/// Blocking text writer over the CDC-ACM port.
///
/// Keeps the USB device serviced while waiting for the host to drain the
/// endpoint, and gives up with `WouldBlock` if it never does.
pub(crate) struct SerialWriter<'a, 'b, B: UsbBus> {
    device: &'a mut UsbDevice<'b, B>,
    serial: &'a mut SerialPort<'b, B>,
}

impl<'a, 'b, B: UsbBus> SerialWriter<'a, 'b, B> {
    pub(crate) fn new(device: &'a mut UsbDevice<'b, B>, serial: &'a mut SerialPort<'b, B>) -> Self {
        Self { device, serial }
    }
}

impl<'a, 'b, B: UsbBus> uWrite for SerialWriter<'a, 'b, B> {
    type Error = UsbError;

    fn write_str(&mut self, s: &str) -> Result<(), UsbError> {
        let mut bytes = s.as_bytes();
        let mut stalls = 0;
        while !bytes.is_empty() {
            match self.serial.write(bytes) {
                Ok(n) => {
                    bytes = &bytes[n..];
                    stalls = 0;
                }
                Err(UsbError::WouldBlock) => {
                    stalls += 1;
                    if stalls > MAX_STALLS {
                        return Err(UsbError::WouldBlock);
                    }
                    self.device.poll(&mut [&mut *self.serial]);
                }
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }
}

/// Writes one frame as `F,<rows>,<cols>,<s0>,<s1>,...\r\n`.
pub(crate) fn write_frame<W: uWrite>(w: &mut W, grid: &Grid) -> Result<(), W::Error> {
    uwrite!(w, "F,{},{}", grid.rows(), grid.cols())?;
    for sample in grid.as_slice() {
        uwrite!(w, ",{}", *sample)?;
    }
    w.write_str("\r\n")
}
