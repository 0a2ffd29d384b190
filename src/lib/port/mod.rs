#[cfg(target_os = "linux")]
mod linux;
#[cfg(target_os = "macos")]
mod macos;

#[cfg(target_os = "linux")]
use linux::is_port_open;
#[cfg(target_os = "macos")]
use macos::is_port_open;

pub use serialport::SerialPort;

use anyhow::Result;
use core::time::Duration;
use log::debug;
use serialport::{self, ClearBuffer, DataBits, FlowControl, Parity, SerialPortType, StopBits};
use thiserror::Error;

use crate::protocol::Link;

#[derive(Error, Debug)]
pub enum OpenPortError {
    #[error("no usb serial adapter found")]
    NoCompatiblePort,
    #[error("{port_name:?} busy")]
    PortBusy { port_name: String },
}

#[derive(PartialEq)]
struct UsbId(u16, u16);

static COMPATIBLE_IDS: &[UsbId] = &[
    UsbId(0x0403, 0x6001), // FTDI FT232R USB UART
    UsbId(0x0403, 0x6015), // FTDI FT231X
    UsbId(0x067b, 0x2303), // Prolific PL2303
    UsbId(0x1a86, 0x7523), // QinHeng Electronics HL-340 USB-Serial adapter
    UsbId(0x10c4, 0xea60), // Silicon Labs CP210x
];

#[cfg(not(any(target_os = "linux", target_os = "macos")))]
fn is_port_open(_port_name: &str) -> bool {
    false
}

/// Opens `port_name` (or the first known adapter for "auto") as 8N1 without
/// flow control and drops whatever is waiting in the input buffer.
pub fn open_port(
    port_name: &str,
    baudrate: u32,
    force: bool,
    timeout: Duration,
) -> Result<Box<dyn SerialPort>> {
    let true_name: String = if port_name == "auto" {
        guess_port()?
    } else {
        port_name.to_string()
    };

    if !force && is_port_open(&true_name) {
        return Err(OpenPortError::PortBusy {
            port_name: true_name,
        }
        .into());
    }

    let port = serialport::new(&true_name, baudrate)
        .data_bits(DataBits::Eight)
        .stop_bits(StopBits::One)
        .parity(Parity::None)
        .flow_control(FlowControl::None)
        .timeout(timeout)
        .open()?;

    port.clear(ClearBuffer::Input)?;

    debug!("open_port OK: {} @ {} baud", &true_name, baudrate);
    Ok(port)
}

impl Link for dyn SerialPort {
    fn discard_input(&mut self) -> std::io::Result<()> {
        Ok(self.clear(ClearBuffer::Input)?)
    }
}

fn guess_port() -> Result<String> {
    serialport::available_ports()?
        .into_iter()
        .filter(|info| match &info.port_type {
            SerialPortType::UsbPort(usb_info) => {
                COMPATIBLE_IDS.contains(&UsbId(usb_info.vid, usb_info.pid))
            }
            SerialPortType::Unknown | SerialPortType::PciPort | SerialPortType::BluetoothPort => {
                false
            }
        })
        .map(|info| info.port_name)
        .find(|name| !is_port_open(name))
        .ok_or_else(|| OpenPortError::NoCompatiblePort.into())
}
