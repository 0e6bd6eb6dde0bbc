//! Debug console: `ufmt` output over any blocking-capable serial writer.

use embedded_hal::serial;
use ufmt::uWrite;

pub struct SerialConsole<W> {
    serial: W,
}

impl<W> SerialConsole<W>
where
    W: serial::Write<u8>,
{
    pub fn new(serial: W) -> Self {
        Self { serial }
    }

    pub fn write_byte(&mut self, byte: u8) -> Result<(), W::Error> {
        nb::block!(self.serial.write(byte))
    }

    pub fn free(self) -> W {
        self.serial
    }
}

impl<W> uWrite for SerialConsole<W>
where
    W: serial::Write<u8>,
{
    type Error = W::Error;

    fn write_str(&mut self, s: &str) -> Result<(), Self::Error> {
        for byte in s.bytes() {
            self.write_byte(byte)?;
        }
        Ok(())
    }
}
