use rcswitch_shared::{
    message::{Command, Info, Reply, TransmitRequest},
    SerialLink,
};

use crate::WordOpt;

pub fn transmit(link: &mut SerialLink, opt: &WordOpt) -> anyhow::Result<()> {
    link.send_command(&Command::Info)?;
    match link.read_reply()? {
        Reply::Info {
            info: Info { transmitter, .. },
        } if !transmitter => anyhow::bail!("Bridge has no transmitter"),
        Reply::Info { info } => log::debug!("Bridge {:?}", info),
        other => anyhow::bail!("Unexpected reply {:?}", other),
    }

    let request = TransmitRequest {
        protocol: opt.protocol,
        pulse_length: opt.pulse_length.unwrap_or(0),
        repeat: opt.repeat,
        code: opt.code()?,
    };

    log::info!("Sending: {:?}", request);

    link.send_command(&Command::Transmit(request))?;
    match link.read_reply()? {
        Reply::Ok => {
            log::info!("Got ok");
            Ok(())
        }
        Reply::Error { code } => anyhow::bail!("Transmit failed: {:?}", code),
        other => anyhow::bail!("Unexpected reply {:?}", other),
    }
}
