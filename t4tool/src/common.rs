use t4lib::protocol::{decode_frame, DeviceMessage};
use t4lib::{ClientError, ClientStd};

pub type RigClient = ClientStd<Box<dyn serialport::SerialPort>>;

#[derive(clap::Args, Debug, Clone)]
pub struct SerialPortArgs {
    /// Serial device the rig controller is attached to.
    #[arg(short = 'D', long, default_value_t = default_serial_port())]
    device: String,
    #[arg(short, long, default_value_t = t4lib::protocol::BAUD_RATE)]
    baud: u32,
    /// Per-read timeout, milliseconds.
    #[arg(long, default_value_t = 1000)]
    timeout: u64,
}

pub fn default_serial_port() -> String {
    if let Ok(infos) = serialport::available_ports() {
        for info in infos {
            #[cfg(target_os = "macos")]
            if info.port_name.ends_with(".Bluetooth-Incoming-Port") {
                // these ports are almost always *not* what we want
                continue;
            }

            #[cfg(target_os = "macos")]
            if info.port_name.starts_with("/dev/tty.") {
                // macos ports with tty. have flow control we don't use
                // use cu. ports instead!
                continue;
            }

            return info.port_name.clone();
        }
    }

    // not great, but reasonable fallback
    "/dev/ttyACM0".to_owned()
}

impl SerialPortArgs {
    pub fn open(&self) -> anyhow::Result<RigClient> {
        let mut port = serialport::new(&self.device, self.baud).open()?;
        port.set_timeout(std::time::Duration::from_millis(self.timeout))?;
        tracing::debug!(device = %self.device, baud = self.baud, "opened rig link");
        Ok(t4lib::Client::new_std(port))
    }
}

pub fn e_hexdump(prefix: &str, bytes: &[u8]) {
    for s in hexdump::hexdump_iter(bytes) {
        if !prefix.is_empty() {
            eprintln!("{} {}", prefix, s);
        } else {
            eprintln!("{}", s);
        }
    }
}

/// Read until a reply with the given correlation id shows up. Frames
/// that fail to decode are dumped and skipped; unrelated replies are
/// logged and skipped. The port's own read timeout bounds the wait.
pub fn wait_for_reply(client: &mut RigClient, id: u8) -> anyhow::Result<DeviceMessage> {
    loop {
        let frames = match client.read_frames() {
            Ok(frames) => frames,
            Err(ClientError::Io(e)) if e.kind() == std::io::ErrorKind::TimedOut => {
                anyhow::bail!("timed out waiting for a reply (id {})", id);
            }
            Err(e) => return Err(e.into()),
        };

        for frame in frames {
            match decode_frame(&frame) {
                Ok(msg) if msg.id == id => return Ok(msg),
                Ok(msg) => {
                    tracing::info!(?msg, "skipping unrelated message");
                }
                Err(e) => {
                    eprintln!("undecodable frame: {}", e);
                    e_hexdump("  ", &frame);
                }
            }
        }
    }
}

/// Bail if the device reported an error, otherwise pretty-print.
pub fn report_reply(msg: &DeviceMessage) -> anyhow::Result<()> {
    if msg.is_error() {
        anyhow::bail!("device reported {:?} (id {})", msg.error, msg.id);
    }
    println!("{:?}", msg);
    Ok(())
}
