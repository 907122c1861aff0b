use core::iter::once;
use smart_leds::{brightness, SmartLedsWrite, RGB8};

/// What the on-board NeoPixel shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, defmt::Format)]
pub(crate) enum Status {
    Booting,
    ConnectionFailed,
    Streaming,
    ScanFault,
}

impl Status {
    fn color(self) -> RGB8 {
        match self {
            Status::Booting => RGB8 { r: 0, g: 0, b: 255 },
            Status::ConnectionFailed => RGB8 { r: 255, g: 0, b: 0 },
            Status::Streaming => RGB8 { r: 0, g: 255, b: 0 },
            Status::ScanFault => RGB8 { r: 255, g: 96, b: 0 },
        }
    }
}

pub(crate) struct StatusLed<WS> {
    ws: WS,
    status: Option<Status>,
}

impl<WS> StatusLed<WS>
where
    WS: SmartLedsWrite,
    <WS as SmartLedsWrite>::Color: From<RGB8>,
{
    pub(crate) fn new(ws: WS) -> Self {
        Self { ws, status: None }
    }

    /// Updates the LED, skipping the write if nothing changed.
    pub(crate) fn show(&mut self, status: Status) {
        if self.status == Some(status) {
            return;
        }
        if self.ws.write(brightness(once(status.color()), 32)).is_err() {
            defmt::warn!("status led write failed");
            return;
        }
        self.status = Some(status);
    }
}
