use embedded_hal::blocking::i2c::{Write, WriteRead};

/// Register access to the controller at a fixed I²C address.
pub struct RegisterBus<I2C> {
    i2c: I2C,
    address: u8,
}

impl<I2C> RegisterBus<I2C> {
    pub fn new(i2c: I2C, address: u8) -> Self {
        Self { i2c, address }
    }

    pub fn address(&self) -> u8 {
        self.address
    }

    pub fn release(self) -> I2C {
        self.i2c
    }

    pub fn write_register<E>(&mut self, register: u8, value: u8) -> Result<(), E>
    where
        I2C: Write<Error = E>,
    {
        #[cfg(feature = "defmt")]
        defmt::trace!("write 0x{:02x} <- 0x{:02x}", register, value);
        self.i2c.write(self.address, &[register, value])
    }

    /// Burst read starting at `register`, filling `buf` in arrival order.
    ///
    /// The register address and the read share one transaction with a
    /// repeated start, so the controller cannot be re-addressed in between.
    pub fn read_registers<E>(&mut self, register: u8, buf: &mut [u8]) -> Result<(), E>
    where
        I2C: WriteRead<Error = E>,
    {
        self.i2c.write_read(self.address, &[register], buf)
    }
}
