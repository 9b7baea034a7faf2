use tokio_serial::{SerialPortType, available_ports};
use tracing::info;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    info!("Listing serial ports...\n");

    match available_ports() {
        Ok(ports) => {
            if ports.is_empty() {
                info!("No serial ports found.");
            }
            for (index, port) in ports.iter().enumerate() {
                info!("Port #{}: {}", index + 1, port.port_name);
                match &port.port_type {
                    SerialPortType::UsbPort(usb) => {
                        info!("  USB VID: {:#06x}, PID: {:#06x}", usb.vid, usb.pid);
                        info!(
                            "  Manufacturer: {}",
                            usb.manufacturer.as_deref().unwrap_or("<Not available>")
                        );
                        info!("  Product: {}", usb.product.as_deref().unwrap_or("<Not available>"));
                        info!(
                            "  Serial: {}",
                            usb.serial_number.as_deref().unwrap_or("<Not available>")
                        );
                    }
                    SerialPortType::PciPort => info!("  Type: PCI"),
                    SerialPortType::BluetoothPort => info!("  Type: Bluetooth"),
                    SerialPortType::Unknown => info!("  Type: Unknown"),
                }
                info!("---");
            }
        }
        Err(e) => {
            eprintln!("Error listing serial ports: {:?}", e);
        }
    }
}
