use rcswitch_shared::{
    message::{Command, Reply},
    SerialLink,
};

/// Put the bridge in receive mode and print every message until interrupted.
pub fn command_receive(link: &mut SerialLink, line: u8, tolerance: u8) -> anyhow::Result<()> {
    log::info!("Receiving on line {}, tolerance {}%", line, tolerance);

    link.send_command(&Command::Receive { line, tolerance })?;
    link.reply_ok()?;

    loop {
        match link.read_reply() {
            Ok(Reply::Received { message }) => {
                log::debug!("Got {:?}", message);
                println!(
                    "Value: {:#x}\tBits: {}\tProtocol: {}\tDelay: {} us",
                    message.value, message.bit_length, message.protocol, message.delay
                );
            }
            Ok(reply) => log::warn!("Unexpected reply {:?}", reply),
            Err(err) if err.kind() == std::io::ErrorKind::InvalidData => continue,
            Err(err) => return Err(err.into()),
        }
    }
}
