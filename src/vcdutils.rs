use std::fs::File;
use std::io;
use std::io::ErrorKind::InvalidInput;
use std::path::Path;

use vcd::{self, SimulationCommand, TimescaleUnit, Value};

/// Scope and name of the wire carrying the receiver output.
const WIRE: [&str; 2] = ["top", "rf"];

pub struct VcdWriter<'a> {
    vcd: vcd::Writer<&'a mut File>,
    timestamp: u64,
    wire_id: vcd::IdCode,
}

impl<'a> VcdWriter<'a> {
    /// Create a new vcd writer with a 1 us timescale
    pub fn new(file: &'a mut File) -> Self {
        let vcd = vcd::Writer::new(file);

        Self {
            vcd,
            timestamp: 0,
            wire_id: vcd::IdCode::FIRST,
        }
    }

    pub fn init(&mut self) -> io::Result<()> {
        let writer = &mut self.vcd;

        writer.timescale(1, TimescaleUnit::US)?;
        writer.add_module(WIRE[0])?;

        let id = writer.add_wire(1, WIRE[1])?;
        self.wire_id = id;

        writer.upscope()?;
        writer.enddefinitions()?;

        // The line idles low
        writer.begin(SimulationCommand::Dumpvars)?;
        writer.change_scalar(id, Value::V0)?;
        writer.end()?;

        Ok(())
    }

    /// Write `(timestamp, level)` edges, timestamps relative to the end of
    /// the previous write.
    pub fn write_edges(&mut self, edges: &[(u64, bool)]) -> io::Result<()> {
        for (ts, high) in edges {
            self.write_value(*ts, *high)?;
        }

        let last = edges.last().map_or(0, |(ts, _)| *ts);
        self.add_offset(last + 20_000);

        Ok(())
    }

    pub fn write_value(&mut self, ts: u64, high: bool) -> io::Result<()> {
        let offseted_ts = self.timestamp + ts;

        self.vcd.timestamp(offseted_ts)?;
        let value = if high { Value::V1 } else { Value::V0 };
        self.vcd.change_scalar(self.wire_id, value)?;

        Ok(())
    }

    pub fn add_offset(&mut self, offset: u64) {
        self.timestamp += offset;
    }
}

/// Nanoseconds per vcd time unit.
fn ns_per_tick(timescale: Option<(u32, TimescaleUnit)>) -> io::Result<u64> {
    let Some((scale, unit)) = timescale else {
        // No timescale, take the ticks as microseconds
        return Ok(1_000);
    };

    let unit_ns = match unit {
        TimescaleUnit::S => 1_000_000_000,
        TimescaleUnit::MS => 1_000_000,
        TimescaleUnit::US => 1_000,
        TimescaleUnit::NS => 1,
        TimescaleUnit::PS | TimescaleUnit::FS => {
            return Err(io::Error::new(
                InvalidInput,
                format!("unsupported timescale {:?}", unit),
            ))
        }
    };

    Ok(u64::from(scale) * unit_ns)
}

/// Read the level changes of the `top.rf` wire as `(microseconds, level)`.
pub fn vcdfile_to_vec(path: &Path) -> io::Result<Vec<(u64, bool)>> {
    let file = io::BufReader::new(File::open(path)?);
    let mut parser = vcd::Parser::new(file);

    let header = parser.parse_header()?;
    let data = header
        .find_var(&WIRE)
        .ok_or_else(|| io::Error::new(InvalidInput, "no wire top.rf"))?
        .code;

    log::debug!("Timescale {:?}", header.timescale);
    let ns_per_tick = ns_per_tick(header.timescale)?;

    let mut current_ts = 0;
    let mut level = None;
    let mut res: Vec<(u64, bool)> = Vec::new();

    for command_result in parser {
        use vcd::Command::*;
        let command = command_result?;
        match command {
            ChangeScalar(i, v) if i == data => {
                let one = v == Value::V1;
                // Only transitions are edges
                if level.replace(one) != Some(one) {
                    res.push((current_ts * ns_per_tick / 1_000, one));
                }
            }
            Timestamp(ts) => current_ts = ts,
            _ => (),
        }
    }

    Ok(res)
}
