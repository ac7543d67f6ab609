use std::path::PathBuf;

use structopt::StructOpt;

use rcswitch_shared::{
    codeword::{self, Code, CodeWord},
    SerialLink, PROTOCOLS,
};

mod capture;
mod encode;
mod irsend;
mod playback;
mod vcdutils;

#[derive(Debug, StructOpt)]
#[structopt(name = "rcswitch", about = "Remote switch transceiver tool")]
struct Opt {
    /// Serial device of the bridge. Defaults to the first port found or /dev/ttyACM0
    #[structopt(long = "device", parse(from_os_str))]
    serial: Option<PathBuf>,
    #[structopt(short, long)]
    debug: bool,
    #[structopt(subcommand)]
    cmd: CliCommand,
}

#[derive(StructOpt, Debug)]
enum CliCommand {
    /// List the built-in protocols
    Protocols,
    /// Print the pulse train of a word. Optionally write it to a vcd file
    Encode {
        #[structopt(flatten)]
        word: WordOpt,
        #[structopt(long, parse(from_os_str))]
        vcd: Option<PathBuf>,
    },
    /// Print the codeword of a switch family command
    Codeword {
        #[structopt(subcommand)]
        family: Family,
    },
    /// Decode the edges of a vcd file
    Playback {
        #[structopt(parse(from_os_str))]
        path: PathBuf,
        /// Receive tolerance in percent
        #[structopt(long, default_value = "60")]
        tolerance: u8,
    },
    /// Transmit a word with the bridge
    Send {
        #[structopt(flatten)]
        word: WordOpt,
    },
    /// Print what the bridge receives
    Receive {
        /// Interrupt line of the receiver on the bridge
        #[structopt(long, default_value = "0")]
        line: u8,
        /// Receive tolerance in percent
        #[structopt(long, default_value = "60")]
        tolerance: u8,
    },
}

#[derive(StructOpt, Debug)]
pub struct WordOpt {
    #[structopt(short, long, default_value = "1")]
    protocol: u8,
    /// Base pulse length in microseconds, defaults to the protocol's
    #[structopt(long)]
    pulse_length: Option<u32>,
    #[structopt(short, long, default_value = "10")]
    repeat: u32,
    /// Word is binary instead of tri-state
    #[structopt(short, long)]
    binary: bool,
    word: String,
}

impl WordOpt {
    pub fn code(&self) -> anyhow::Result<Code> {
        let code = if self.binary {
            codeword::encode_binary(&self.word)
        } else {
            codeword::encode_tristate(&self.word)
        };
        code.map_err(|err| anyhow::anyhow!("{}: {}", self.word, err))
    }
}

#[derive(StructOpt, Debug)]
enum Family {
    /// Two rows of 5 DIP switches, e.g. `a 11001 01000`
    A {
        group: String,
        device: String,
        #[structopt(long)]
        off: bool,
    },
    /// Address and channel 1 to 4
    B {
        address: u8,
        channel: u8,
        #[structopt(long)]
        off: bool,
    },
    /// Intertechno: family a to p, group and device 1 to 4
    C {
        family: char,
        group: u8,
        device: u8,
        #[structopt(long)]
        off: bool,
    },
    /// REV: group a to d, device 1 to 3
    D {
        group: char,
        device: u8,
        #[structopt(long)]
        off: bool,
    },
}

impl Family {
    fn codeword(&self) -> Result<CodeWord, rcswitch_shared::Error> {
        match self {
            Family::A { group, device, off } => codeword::codeword_a(group, device, !off),
            Family::B {
                address,
                channel,
                off,
            } => codeword::codeword_b(*address, *channel, !off),
            Family::C {
                family,
                group,
                device,
                off,
            } => codeword::codeword_c(*family, *group, *device, !off),
            Family::D { group, device, off } => codeword::codeword_d(*group, *device, !off),
        }
    }
}

fn main() -> anyhow::Result<()> {
    let opt = Opt::from_args();

    let loglevel = if opt.debug {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::new()
        .filter_level(loglevel)
        .parse_default_env()
        .init();

    match opt.cmd {
        CliCommand::Protocols => {
            for (index, protocol) in PROTOCOLS.iter().enumerate() {
                println!(
                    "{:2}  {:4} us  sync {:?}  zero {:?}  one {:?}{}",
                    index + 1,
                    protocol.pulse_length,
                    (protocol.sync.high, protocol.sync.low),
                    (protocol.zero.high, protocol.zero.low),
                    (protocol.one.high, protocol.one.low),
                    if protocol.inverted { "  inverted" } else { "" },
                );
            }
            Ok(())
        }
        CliCommand::Encode { word, vcd } => encode::command_encode(&word, vcd.as_deref()),
        CliCommand::Codeword { family } => {
            let codeword = family
                .codeword()
                .map_err(|err| anyhow::anyhow!("{:?}: {}", family, err))?;
            let code = codeword.code()?;
            println!("{}\t{:#x}\t{} bits", codeword, code.value, code.bit_length);
            Ok(())
        }
        CliCommand::Playback { path, tolerance } => {
            let messages = playback::command(&path, tolerance)?;
            if messages.is_empty() {
                println!("No message decoded");
            }
            for msg in messages {
                println!(
                    "Value: {:#x}\tBits: {}\tProtocol: {}\tDelay: {} us",
                    msg.value, msg.bit_length, msg.protocol, msg.delay
                );
            }
            Ok(())
        }
        CliCommand::Send { word } => {
            let mut link = connect(opt.serial)?;
            irsend::transmit(&mut link, &word)
        }
        CliCommand::Receive { line, tolerance } => {
            let mut link = connect(opt.serial)?;
            capture::command_receive(&mut link, line, tolerance)
        }
    }
}

fn connect(serial: Option<PathBuf>) -> anyhow::Result<SerialLink> {
    let path = if let Some(path) = serial {
        path
    } else {
        SerialLink::list_ports()
            .ok()
            .and_then(|ports| ports.first().map(|port| PathBuf::from(&port.port_name)))
            .unwrap_or_else(|| PathBuf::from("/dev/ttyACM0"))
    };

    log::info!("Connecting to {}", path.display());

    let mut link = SerialLink::new();
    link.connect(&path)?;
    Ok(link)
}
