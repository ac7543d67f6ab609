use std::{io, path::Path, time::Duration};

use serialport::{SerialPort, SerialPortInfo};

use crate::message::{Command, Reply, BAUD_RATE, MAX_FRAME_LEN};

/// Host end of the serial link to a bridge board.
pub struct SerialLink {
    port: Option<Box<dyn SerialPort>>,
    /// Bytes read past the end of the last frame
    pending: Vec<u8>,
}

impl SerialLink {
    pub fn new() -> Self {
        SerialLink {
            port: None,
            pending: Vec::new(),
        }
    }

    pub fn list_ports() -> Result<Vec<SerialPortInfo>, serialport::Error> {
        serialport::available_ports()
    }

    pub fn connect<P: AsRef<Path>>(&mut self, path: P) -> Result<(), serialport::Error> {
        let path = path.as_ref().to_string_lossy();
        let port = serialport::new(path, BAUD_RATE)
            .timeout(Duration::from_millis(100))
            .open()?;

        self.port.replace(port);
        self.pending.clear();

        Ok(())
    }

    pub fn send_command(&mut self, cmd: &Command) -> io::Result<()> {
        let mut buf = [0u8; MAX_FRAME_LEN];
        let frame = cmd
            .to_frame(&mut buf)
            .map_err(|err| io::Error::new(io::ErrorKind::InvalidInput, err.to_string()))?;

        log::debug!("Sending {:?} ({} bytes)", cmd, frame.len());

        self.port
            .as_mut()
            .ok_or(io::ErrorKind::NotConnected)?
            .write_all(frame)
    }

    /// Block until a complete reply frame arrived.
    pub fn read_reply(&mut self) -> io::Result<Reply> {
        let port = self.port.as_mut().ok_or(io::ErrorKind::NotConnected)?;
        let mut recvbuf = [0u8; 256];

        loop {
            if let Some(end) = self.pending.iter().position(|b| *b == 0) {
                let mut frame: Vec<u8> = self.pending.drain(..=end).collect();

                return Reply::from_frame(&mut frame).map_err(|err| {
                    log::warn!("Dropping bad frame {:x?}: {}", frame, err);
                    io::Error::new(io::ErrorKind::InvalidData, err.to_string())
                });
            }

            match port.read(&mut recvbuf) {
                Ok(readlen) => self.pending.extend_from_slice(&recvbuf[..readlen]),
                Err(ref e) if e.kind() == io::ErrorKind::TimedOut => continue,
                Err(e) => return Err(e),
            }
        }
    }

    pub fn reply_ok(&mut self) -> io::Result<()> {
        match self.read_reply()? {
            Reply::Ok => Ok(()),
            other => {
                log::warn!("Expected Ok, got {:?}", other);
                Err(io::ErrorKind::InvalidData.into())
            }
        }
    }
}

impl Default for SerialLink {
    fn default() -> Self {
        Self::new()
    }
}
