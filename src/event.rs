//! Event system - raw keyboard decoding and the gallery event channel

use std::collections::VecDeque;
use std::io::{self, Read};
use std::sync::mpsc::Sender;

const ESC: u8 = 0x1b;
const ETX: u8 = 0x03;
const EOT: u8 = 0x04;

/// A logical key press the gallery understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    Quit,
    Next,
    Prev,
    ScaleUp,
    ScaleDown,
    ResetScale,
    ToggleMetadata,
}

/// Everything the gallery loop reacts to, from any thread
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEvent {
    /// Keyboard command
    Key(Command),
    /// Terminal was resized
    Resize,
    /// Input stream reached end of file or failed
    InputClosed,
    /// Termination signal (signal number)
    Terminate(i32),
}

/// Decode every recognized key in a chunk of raw input
///
/// Unknown bytes and sequences are dropped. A CSI sequence is consumed up to
/// its final byte so parameters (`ESC [ 1 ; 5 C`, `ESC [ 20 ~`) never leak
/// through as plain characters. A truncated sequence at the end of the chunk
/// is discarded.
pub fn decode_keys(bytes: &[u8]) -> Vec<Command> {
    let mut commands = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] != ESC {
            if let Some(cmd) = decode_byte(bytes[i]) {
                commands.push(cmd);
            }
            i += 1;
            continue;
        }

        match bytes.get(i + 1) {
            Some(b'[') => {
                // Parameter and intermediate bytes, then one final byte
                let mut end = i + 2;
                while end < bytes.len() && (0x20..=0x3f).contains(&bytes[end]) {
                    end += 1;
                }
                let Some(&last) = bytes.get(end) else {
                    break;
                };
                if end == i + 2 {
                    if let Some(cmd) = decode_arrow(last) {
                        commands.push(cmd);
                    }
                }
                i = end + 1;
            }
            // SS3 or Alt+key: two or three bytes, none of them ours
            Some(b'O') => i += 3,
            Some(_) => i += 2,
            None => break,
        }
    }

    commands
}

fn decode_byte(byte: u8) -> Option<Command> {
    match byte {
        b'q' | b'Q' | ETX | EOT => Some(Command::Quit),
        b'+' => Some(Command::ScaleUp),
        b'-' => Some(Command::ScaleDown),
        b'0' => Some(Command::ResetScale),
        b'\r' | b' ' => Some(Command::ToggleMetadata),
        _ => None,
    }
}

fn decode_arrow(final_byte: u8) -> Option<Command> {
    match final_byte {
        b'A' => Some(Command::ScaleUp),
        b'B' => Some(Command::ScaleDown),
        b'C' => Some(Command::Next),
        b'D' => Some(Command::Prev),
        _ => None,
    }
}

/// Blocking reader turning raw terminal bytes into commands
pub struct InputDriver<R> {
    reader: R,
    buf: [u8; 64],
    pending: VecDeque<Command>,
}

impl<R: Read> InputDriver<R> {
    pub fn new(reader: R) -> Self {
        InputDriver {
            reader,
            buf: [0; 64],
            pending: VecDeque::new(),
        }
    }

    /// Block until the next command, or `None` once the stream is closed
    pub fn next_command(&mut self) -> io::Result<Option<Command>> {
        loop {
            if let Some(cmd) = self.pending.pop_front() {
                return Ok(Some(cmd));
            }

            let n = match self.reader.read(&mut self.buf) {
                Ok(0) => return Ok(None),
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            self.pending.extend(decode_keys(&self.buf[..n]));
        }
    }

    /// Forward commands into `events` until input closes or the receiver goes away
    pub fn pump(mut self, events: Sender<AppEvent>) {
        loop {
            let event = match self.next_command() {
                Ok(Some(cmd)) => AppEvent::Key(cmd),
                Ok(None) => AppEvent::InputClosed,
                Err(e) => {
                    log::warn!("input read failed: {}", e);
                    AppEvent::InputClosed
                }
            };
            let closed = event == AppEvent::InputClosed;
            if events.send(event).is_err() || closed {
                return;
            }
        }
    }
}
