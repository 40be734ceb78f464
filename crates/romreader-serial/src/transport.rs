//! Link layer abstraction for ROM transfers
//!
//! The transfer loop only needs to write a command and perform blocking
//! reads with a timeout, so any byte stream can stand in for the serial
//! port (tests use a scripted in-memory link).

use crate::error::Result;

/// A byte-oriented, point-to-point link to a ROM reader
pub trait Link {
    /// Write all of `data` to the link
    fn write_all(&mut self, data: &[u8]) -> Result<()>;

    /// Blocking read of up to `buf.len()` bytes
    ///
    /// Returns the number of bytes read, or 0 if the read timeout elapsed
    /// without any data arriving.
    fn read_chunk(&mut self, buf: &mut [u8]) -> Result<usize>;
}

pub mod serial {
    //! Serial port link implementation

    use super::*;
    use crate::error::TransferError;
    use crate::settings::LinkSettings;
    use serialport::{FlowControl, SerialPort, SerialPortType};
    use std::io::{Read, Write};

    /// Serial port link
    ///
    /// The port is closed when this value is dropped.
    pub struct SerialLink {
        device: String,
        port: Box<dyn SerialPort>,
    }

    impl SerialLink {
        /// Open and configure a serial port
        pub fn open(device: &str, settings: &LinkSettings) -> Result<Self> {
            let port = serialport::new(device, settings.baud_rate)
                .data_bits(settings.data_bits)
                .parity(settings.parity)
                .stop_bits(settings.stop_bits)
                .flow_control(FlowControl::None)
                .timeout(settings.read_timeout)
                .open()
                .map_err(|source| TransferError::LinkOpen {
                    device: device.to_string(),
                    source,
                })?;

            log::info!(
                "Opened serial port {} at {} baud",
                device,
                settings.baud_rate
            );

            Ok(Self {
                device: device.to_string(),
                port,
            })
        }

        /// Name of the port this link was opened on
        pub fn device(&self) -> &str {
            &self.device
        }
    }

    impl Link for SerialLink {
        fn write_all(&mut self, data: &[u8]) -> Result<()> {
            self.port.write_all(data)?;
            self.port.flush()?;
            Ok(())
        }

        fn read_chunk(&mut self, buf: &mut [u8]) -> Result<usize> {
            match self.port.read(buf) {
                Ok(n) => Ok(n),
                Err(e) if e.kind() == std::io::ErrorKind::TimedOut => Ok(0),
                Err(e) => Err(TransferError::from(e)),
            }
        }
    }

    impl Drop for SerialLink {
        fn drop(&mut self) {
            log::debug!("Closing serial port {}", self.device);
        }
    }

    /// A serial port present on the system
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct PortInfo {
        /// Name to pass to [`SerialLink::open`]
        pub name: String,
        /// Human-readable description
        pub description: String,
    }

    /// Enumerate available serial ports
    pub fn list_ports() -> Result<Vec<PortInfo>> {
        let ports = serialport::available_ports()?;
        Ok(ports
            .into_iter()
            .map(|p| PortInfo {
                description: describe(&p.port_type),
                name: p.port_name,
            })
            .collect())
    }

    fn describe(port_type: &SerialPortType) -> String {
        match port_type {
            SerialPortType::UsbPort(usb) => {
                let product = usb.product.as_deref().unwrap_or("USB serial");
                match usb.manufacturer.as_deref() {
                    Some(mfr) => format!(
                        "{} ({}) [{:04X}:{:04X}]",
                        product, mfr, usb.vid, usb.pid
                    ),
                    None => format!("{} [{:04X}:{:04X}]", product, usb.vid, usb.pid),
                }
            }
            SerialPortType::PciPort => "PCI serial".to_string(),
            SerialPortType::BluetoothPort => "Bluetooth serial".to_string(),
            SerialPortType::Unknown => "Serial port".to_string(),
        }
    }
}

#[cfg(test)]
pub(crate) mod mock {
    //! Scripted link for unit tests

    use super::*;
    use std::collections::VecDeque;

    /// Returns queued chunks on read and records every write.
    ///
    /// Once the queue is empty every read behaves like a timeout.
    #[derive(Default)]
    pub struct MockLink {
        chunks: VecDeque<std::result::Result<Vec<u8>, std::io::ErrorKind>>,
        pub writes: Vec<Vec<u8>>,
        pub reads: usize,
    }

    impl MockLink {
        pub fn new() -> Self {
            Self::default()
        }

        /// Queue data to be returned by a read
        pub fn queue(&mut self, data: &[u8]) -> &mut Self {
            self.chunks.push_back(Ok(data.to_vec()));
            self
        }

        /// Queue an I/O failure
        pub fn queue_error(&mut self, kind: std::io::ErrorKind) -> &mut Self {
            self.chunks.push_back(Err(kind));
            self
        }

        pub fn pending(&self) -> usize {
            self.chunks.len()
        }
    }

    impl Link for MockLink {
        fn write_all(&mut self, data: &[u8]) -> Result<()> {
            self.writes.push(data.to_vec());
            Ok(())
        }

        fn read_chunk(&mut self, buf: &mut [u8]) -> Result<usize> {
            self.reads += 1;
            match self.chunks.pop_front() {
                None => Ok(0),
                Some(Err(kind)) => Err(std::io::Error::from(kind).into()),
                Some(Ok(mut data)) => {
                    let n = data.len().min(buf.len());
                    buf[..n].copy_from_slice(&data[..n]);
                    if n < data.len() {
                        self.chunks.push_front(Ok(data.split_off(n)));
                    }
                    Ok(n)
                }
            }
        }
    }
}
