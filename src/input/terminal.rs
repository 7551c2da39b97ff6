use std::io::{self, Read};
use std::mem::MaybeUninit;
use std::os::unix::io::RawFd;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use log::{debug, warn};

use super::editor::{Key, KeySource};

pub const DEFAULT_WIDTH: usize = 80;

pub fn is_tty(fd: RawFd) -> bool {
    // SAFETY: isatty only inspects the descriptor.
    unsafe { libc::isatty(fd) == 1 }
}

/// Puts a terminal into raw mode and restores the saved settings on drop.
///
/// Canonical mode, echo and signal keys are turned off; output processing
/// is left on so `\n` from background output still returns the carriage.
pub struct RawMode {
    fd: RawFd,
    saved: libc::termios,
}

impl RawMode {
    pub fn enable(fd: RawFd) -> io::Result<Self> {
        let mut termios = MaybeUninit::<libc::termios>::uninit();
        // SAFETY: tcgetattr fully initialises `termios` when it returns 0.
        let saved = unsafe {
            if libc::tcgetattr(fd, termios.as_mut_ptr()) != 0 {
                return Err(io::Error::last_os_error());
            }
            termios.assume_init()
        };

        let mut raw = saved;
        raw.c_lflag &= !(libc::ICANON | libc::ECHO | libc::ISIG | libc::IEXTEN);
        raw.c_iflag &= !(libc::IXON | libc::ICRNL);
        raw.c_cc[libc::VMIN] = 1;
        raw.c_cc[libc::VTIME] = 0;

        // SAFETY: `raw` is a valid termios derived from the current settings.
        if unsafe { libc::tcsetattr(fd, libc::TCSANOW, &raw) } != 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(Self { fd, saved })
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        // SAFETY: restores settings previously read from the same descriptor.
        if unsafe { libc::tcsetattr(self.fd, libc::TCSANOW, &self.saved) } != 0 {
            warn!("failed to restore terminal mode: {}", io::Error::last_os_error());
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DecodeState {
    Ground,
    Escape,
    /// `ESC [` or `ESC O`, waiting for the final byte.
    Sequence,
    Utf8 { needed: usize },
}

/// Turns raw terminal bytes into [`Key`]s.
#[derive(Debug)]
pub struct KeyDecoder {
    state: DecodeState,
    pending: Vec<u8>,
}

impl Default for KeyDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyDecoder {
    pub fn new() -> Self {
        Self {
            state: DecodeState::Ground,
            pending: Vec::with_capacity(4),
        }
    }

    /// Feeds one byte; returns a key once a complete one has been read.
    /// Unrecognised escape sequences are swallowed.
    pub fn feed(&mut self, byte: u8) -> Option<Key> {
        match self.state {
            DecodeState::Ground => self.ground(byte),
            DecodeState::Escape => {
                self.state = match byte {
                    b'[' | b'O' => DecodeState::Sequence,
                    _ => DecodeState::Ground,
                };
                None
            }
            DecodeState::Sequence => {
                // parameters and intermediates until the final byte
                if !(0x40..=0x7e).contains(&byte) {
                    return None;
                }
                self.state = DecodeState::Ground;
                match byte {
                    b'A' => Some(Key::Up),
                    b'B' => Some(Key::Down),
                    b'C' => Some(Key::Right),
                    b'D' => Some(Key::Left),
                    _ => {
                        debug!("ignoring escape sequence ending in {:#x}", byte);
                        None
                    }
                }
            }
            DecodeState::Utf8 { needed } => {
                if byte & 0xc0 != 0x80 {
                    self.pending.clear();
                    self.state = DecodeState::Ground;
                    return self.ground(byte);
                }
                self.pending.push(byte);
                if needed > 1 {
                    self.state = DecodeState::Utf8 { needed: needed - 1 };
                    return None;
                }
                self.state = DecodeState::Ground;
                let key = std::str::from_utf8(&self.pending)
                    .ok()
                    .and_then(|s| s.chars().next())
                    .map(Key::Char);
                self.pending.clear();
                key
            }
        }
    }

    fn ground(&mut self, byte: u8) -> Option<Key> {
        match byte {
            0x1b => {
                self.state = DecodeState::Escape;
                None
            }
            0x03 => Some(Key::Interrupt),
            0x04 => Some(Key::Eof),
            b'\t' => Some(Key::Tab),
            b'\r' | b'\n' => Some(Key::Enter),
            0x7f | 0x08 => Some(Key::Backspace),
            0x20..=0x7e => Some(Key::Char(char::from(byte))),
            0xc0..=0xf7 => {
                let needed = match byte {
                    0xc0..=0xdf => 1,
                    0xe0..=0xef => 2,
                    _ => 3,
                };
                self.pending.clear();
                self.pending.push(byte);
                self.state = DecodeState::Utf8 { needed };
                None
            }
            _ => None,
        }
    }
}

/// Keys read from a byte stream, normally stdin in raw mode.
pub struct ByteKeys<R> {
    reader: R,
    decoder: KeyDecoder,
}

impl<R: Read> ByteKeys<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            decoder: KeyDecoder::new(),
        }
    }
}

impl<R: Read> KeySource for ByteKeys<R> {
    fn next_key(&mut self) -> io::Result<Option<Key>> {
        let mut byte = [0u8; 1];
        loop {
            match self.reader.read(&mut byte) {
                Ok(0) => return Ok(None),
                Ok(_) => {
                    if let Some(key) = self.decoder.feed(byte[0]) {
                        return Ok(Some(key));
                    }
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
    }
}

/// Terminal column count, re-queried after `SIGWINCH`.
pub struct TerminalWidth {
    fd: RawFd,
    resized: Arc<AtomicBool>,
    width: usize,
}

impl TerminalWidth {
    pub fn new(fd: RawFd) -> Self {
        let resized = Arc::new(AtomicBool::new(false));
        if let Err(e) = signal_hook::flag::register(signal_hook::consts::SIGWINCH, Arc::clone(&resized)) {
            warn!("cannot watch terminal resizes: {}", e);
        }
        Self {
            fd,
            resized,
            width: query_width(fd).unwrap_or(DEFAULT_WIDTH),
        }
    }

    pub fn get(&mut self) -> usize {
        if self.resized.swap(false, Ordering::Relaxed) {
            self.width = query_width(self.fd).unwrap_or(self.width);
            debug!("terminal resized to {} columns", self.width);
        }
        self.width
    }
}

fn query_width(fd: RawFd) -> Option<usize> {
    let mut size = MaybeUninit::<libc::winsize>::zeroed();
    // SAFETY: TIOCGWINSZ writes a winsize into the provided buffer.
    let rc = unsafe { libc::ioctl(fd, libc::TIOCGWINSZ, size.as_mut_ptr()) };
    if rc != 0 {
        return None;
    }
    // SAFETY: zero-initialised and filled in by a successful ioctl.
    let size = unsafe { size.assume_init() };
    (size.ws_col > 0).then_some(usize::from(size.ws_col))
}
