use std::{fs::File, path::Path};

use rcswitch_shared::{trace::PulseTrace, Inbox, MessageQueue, RcSwitch};

use crate::{vcdutils::VcdWriter, WordOpt};

/// Run the transmitter on a recording pin and print what it sent.
pub fn command_encode(opt: &WordOpt, vcd_path: Option<&Path>) -> anyhow::Result<()> {
    let code = opt.code()?;
    let trace = PulseTrace::new();
    let inbox = Inbox::new();
    let mut queue = MessageQueue::new();
    let (_, messages) = queue.split();

    let mut switch = RcSwitch::new(trace.delay(), &inbox, messages);
    switch.enable_transmit(trace.pin());
    switch.select_protocol(opt.protocol);
    if let Some(pulse_length) = opt.pulse_length {
        switch.set_pulse_length(pulse_length);
    }
    switch.set_repeat_transmit(opt.repeat);

    switch.transmit(code)?;

    println!(
        "Value: {:#x}\tBits: {}\tProtocol: {:?}",
        code.value,
        code.bit_length,
        switch.protocol()
    );

    for (level, us) in trace.pulses() {
        println!("{}\t{}", if level { "high" } else { "low" }, us);
    }
    println!("Total: {} us", trace.duration());

    if let Some(path) = vcd_path {
        let mut file = File::create(path)?;
        let mut vcd = VcdWriter::new(&mut file);
        vcd.init()?;
        vcd.write_edges(&trace.edges())?;
        log::info!("Wrote {}", path.display());
    }

    Ok(())
}
