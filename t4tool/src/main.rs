use clap::Parser;

use t4lib::protocol::{marker, modio, Echo, ModIoFreq, ModIoPullup};

mod common;

trait ToolRun {
    fn run(&self) -> anyhow::Result<()>;
}

#[derive(Parser, Debug)]
#[command(about = "Poke the Teensy 4 behavioral rig over its serial link")]
struct ToolOptions {
    #[command(subcommand)]
    command: ToolCommand,
}

#[derive(clap::Subcommand, Debug)]
enum ToolCommand {
    /// Ping the rig controller.
    Echo(EchoOpts),
    /// Register a ModIO board on an I2C port.
    Create(CreateOpts),
    /// Release a previously created board.
    Remove(RemoveOpts),
    /// Read a board's digital pins once.
    Read(ReadOpts),
    /// Start streaming digital reads on change.
    StartRead(StartReadOpts),
    /// Stop a continuous digital read.
    StopRead(StopReadOpts),
    /// Set a board's relays.
    Write(WriteOpts),
    /// Move a board to a new I2C address.
    SetAddress(SetAddressOpts),
    /// Enable the stream marker on a pair of pins.
    MarkerEnable(MarkerEnableOpts),
    /// Disable the stream marker.
    MarkerDisable(MarkerDisableOpts),
    /// Pulse a fresh marker code.
    Mark(MarkOpts),
    /// Print every message the rig sends, forever.
    Listen(ListenOpts),
}

impl ToolRun for ToolCommand {
    fn run(&self) -> anyhow::Result<()> {
        use ToolCommand::*;
        match self {
            Echo(o) => o.run(),
            Create(o) => o.run(),
            Remove(o) => o.run(),
            Read(o) => o.run(),
            StartRead(o) => o.run(),
            StopRead(o) => o.run(),
            Write(o) => o.run(),
            SetAddress(o) => o.run(),
            MarkerEnable(o) => o.run(),
            MarkerDisable(o) => o.run(),
            Mark(o) => o.run(),
            Listen(o) => o.run(),
        }
    }
}

/// Everything a one-shot request needs: the link, plus the correlation
/// id to stamp on the outgoing frame.
#[derive(clap::Args, Debug)]
struct RequestArgs {
    #[command(flatten)]
    link: common::SerialPortArgs,
    #[arg(short, long, default_value_t = 0)]
    id: u8,
}

impl RequestArgs {
    fn round_trip<M>(&self, msg: &M) -> anyhow::Result<()>
    where
        M: t4lib::protocol::MessageSerialize,
    {
        let mut client = self.link.open()?;
        client.send(self.id, msg)?;
        let reply = common::wait_for_reply(&mut client, self.id)?;
        common::report_reply(&reply)
    }
}

#[derive(clap::Args, Debug)]
struct EchoOpts {
    #[command(flatten)]
    request: RequestArgs,
}

impl ToolRun for EchoOpts {
    fn run(&self) -> anyhow::Result<()> {
        self.request.round_trip(&Echo)
    }
}

#[derive(clap::ValueEnum, Debug, Clone, Copy)]
enum FreqArg {
    #[value(name = "100k")]
    Freq100k,
    #[value(name = "400k")]
    Freq400k,
    #[value(name = "1m")]
    Freq1M,
}

impl From<FreqArg> for ModIoFreq {
    fn from(arg: FreqArg) -> Self {
        match arg {
            FreqArg::Freq100k => Self::Freq100k,
            FreqArg::Freq400k => Self::Freq400k,
            FreqArg::Freq1M => Self::Freq1M,
        }
    }
}

#[derive(clap::ValueEnum, Debug, Clone, Copy)]
enum PullupArg {
    Disabled,
    #[value(name = "22k")]
    Enabled22kOhm,
    #[value(name = "47k")]
    Enabled47kOhm,
    #[value(name = "100k")]
    Enabled100kOhm,
}

impl From<PullupArg> for ModIoPullup {
    fn from(arg: PullupArg) -> Self {
        match arg {
            PullupArg::Disabled => Self::Disabled,
            PullupArg::Enabled22kOhm => Self::Enabled22kOhm,
            PullupArg::Enabled47kOhm => Self::Enabled47kOhm,
            PullupArg::Enabled100kOhm => Self::Enabled100kOhm,
        }
    }
}

#[derive(clap::Args, Debug)]
struct CreateOpts {
    #[command(flatten)]
    request: RequestArgs,
    /// I2C controller index on the rig.
    port: u8,
    /// I2C bus address of the board.
    address: u8,
    #[arg(long, value_enum, default_value_t = FreqArg::Freq100k)]
    freq: FreqArg,
    #[arg(long, value_enum, default_value_t = PullupArg::Disabled)]
    pullup: PullupArg,
}

impl ToolRun for CreateOpts {
    fn run(&self) -> anyhow::Result<()> {
        self.request.round_trip(&modio::Create {
            port: self.port,
            address: self.address,
            freq: self.freq.into(),
            pullup: self.pullup.into(),
        })
    }
}

#[derive(clap::Args, Debug)]
struct RemoveOpts {
    #[command(flatten)]
    request: RequestArgs,
    port: u8,
    address: u8,
}

impl ToolRun for RemoveOpts {
    fn run(&self) -> anyhow::Result<()> {
        self.request.round_trip(&modio::Remove {
            port: self.port,
            address: self.address,
        })
    }
}

#[derive(clap::Args, Debug)]
struct ReadOpts {
    #[command(flatten)]
    request: RequestArgs,
    port: u8,
    address: u8,
}

impl ToolRun for ReadOpts {
    fn run(&self) -> anyhow::Result<()> {
        self.request.round_trip(&modio::ReadDigital {
            port: self.port,
            address: self.address,
        })
    }
}

#[derive(clap::Args, Debug)]
struct StartReadOpts {
    #[command(flatten)]
    request: RequestArgs,
    port: u8,
    address: u8,
}

impl ToolRun for StartReadOpts {
    fn run(&self) -> anyhow::Result<()> {
        self.request.round_trip(&modio::ReadDigitalContStart {
            port: self.port,
            address: self.address,
        })
    }
}

#[derive(clap::Args, Debug)]
struct StopReadOpts {
    #[command(flatten)]
    request: RequestArgs,
    port: u8,
    address: u8,
}

impl ToolRun for StopReadOpts {
    fn run(&self) -> anyhow::Result<()> {
        self.request.round_trip(&modio::ReadDigitalContStop {
            port: self.port,
            address: self.address,
        })
    }
}

#[derive(clap::Args, Debug)]
struct WriteOpts {
    #[command(flatten)]
    request: RequestArgs,
    port: u8,
    address: u8,
    /// Relay states, lowest relay first, 0 or 1 each.
    #[arg(value_parser = clap::value_parser!(u8).range(0..=1), num_args = 1..=4)]
    relays: Vec<u8>,
}

impl ToolRun for WriteOpts {
    fn run(&self) -> anyhow::Result<()> {
        let states: Vec<bool> = self.relays.iter().map(|&r| r != 0).collect();
        self.request.round_trip(&modio::WriteDigital::new(
            self.port,
            self.address,
            &states,
        )?)
    }
}

#[derive(clap::Args, Debug)]
struct SetAddressOpts {
    #[command(flatten)]
    request: RequestArgs,
    port: u8,
    address: u8,
    new_address: u8,
}

impl ToolRun for SetAddressOpts {
    fn run(&self) -> anyhow::Result<()> {
        self.request.round_trip(&modio::ChangeAddress {
            port: self.port,
            address: self.address,
            new_address: self.new_address,
        })
    }
}

#[derive(clap::Args, Debug)]
struct MarkerEnableOpts {
    #[command(flatten)]
    request: RequestArgs,
    /// Pulse duration, device clock ticks.
    duration: u32,
    clock_pin: u8,
    data_pin: u8,
}

impl ToolRun for MarkerEnableOpts {
    fn run(&self) -> anyhow::Result<()> {
        self.request.round_trip(&marker::Enable {
            duration: self.duration,
            clock_pin: self.clock_pin,
            data_pin: self.data_pin,
        })
    }
}

#[derive(clap::Args, Debug)]
struct MarkerDisableOpts {
    #[command(flatten)]
    request: RequestArgs,
}

impl ToolRun for MarkerDisableOpts {
    fn run(&self) -> anyhow::Result<()> {
        self.request.round_trip(&marker::Disable)
    }
}

#[derive(clap::Args, Debug)]
struct MarkOpts {
    #[command(flatten)]
    request: RequestArgs,
}

impl ToolRun for MarkOpts {
    fn run(&self) -> anyhow::Result<()> {
        self.request.round_trip(&marker::Mark)
    }
}

#[derive(clap::Args, Debug)]
struct ListenOpts {
    #[command(flatten)]
    link: common::SerialPortArgs,
}

impl ToolRun for ListenOpts {
    fn run(&self) -> anyhow::Result<()> {
        let mut client = self.link.open()?;

        loop {
            let frames = match client.read_frames() {
                Ok(frames) => frames,
                Err(t4lib::ClientError::Io(e))
                    if e.kind() == std::io::ErrorKind::TimedOut =>
                {
                    continue;
                }
                Err(t4lib::ClientError::UnexpectedEof) => return Ok(()),
                Err(e) => return Err(e.into()),
            };

            for frame in frames {
                match t4lib::protocol::decode_frame(&frame) {
                    Ok(msg) => println!("{:?}", msg),
                    Err(e) => {
                        eprintln!("undecodable frame: {}", e);
                        common::e_hexdump("  ", &frame);
                    }
                }
            }
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    ToolOptions::parse().command.run()
}
