//! Byte sources and the lazy packet iterator

use crate::{FrameOutcome, Framer, Packet};
use std::io::{self, Read};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Byte source closed")]
    Closed,

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Anything that can yield single bytes with a bounded wait.
pub trait ByteSource {
    /// Read one byte. `Ok(None)` means the read timed out with no data and is
    /// not an error.
    fn read_byte(&mut self) -> Result<Option<u8>, SourceError>;
}

impl<S: ByteSource + ?Sized> ByteSource for &mut S {
    fn read_byte(&mut self) -> Result<Option<u8>, SourceError> {
        (**self).read_byte()
    }
}

impl<S: ByteSource + ?Sized> ByteSource for Box<S> {
    fn read_byte(&mut self) -> Result<Option<u8>, SourceError> {
        (**self).read_byte()
    }
}

/// Adapts a blocking [`Read`] with a read timeout.
///
/// `TimedOut`, `WouldBlock` and `Interrupted` count as a timeout tick; a zero
/// length read means the stream ended.
#[derive(Debug)]
pub struct IoSource<R> {
    inner: R,
}

impl<R: Read> IoSource<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read> ByteSource for IoSource<R> {
    fn read_byte(&mut self) -> Result<Option<u8>, SourceError> {
        let mut buf = [0u8; 1];
        match self.inner.read(&mut buf) {
            Ok(0) => Err(SourceError::Closed),
            Ok(_) => {
                let [byte] = buf;
                Ok(Some(byte))
            }
            Err(e)
                if matches!(
                    e.kind(),
                    io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted
                ) =>
            {
                Ok(None)
            }
            Err(e) => Err(SourceError::Io(e)),
        }
    }
}

/// Lazy, unbounded sequence of packets read from a [`ByteSource`].
///
/// Yields the source's terminal error once, then ends.
#[derive(Debug)]
pub struct Packets<S> {
    framer: Framer,
    source: S,
    finished: bool,
}

impl<S: ByteSource> Packets<S> {
    pub fn new(framer: Framer, source: S) -> Self {
        Self {
            framer,
            source,
            finished: false,
        }
    }

    pub fn framer(&self) -> &Framer {
        &self.framer
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn into_parts(self) -> (Framer, S) {
        (self.framer, self.source)
    }

    /// Read until a packet, a timeout tick or the terminal error.
    ///
    /// Returns `Some(Ok(None))` for each timeout so callers can do periodic
    /// work while the line is idle. [`Iterator::next`] skips those ticks.
    pub fn next_or_timeout(&mut self) -> Option<Result<Option<Packet>, SourceError>> {
        if self.finished {
            return None;
        }

        loop {
            match self.source.read_byte() {
                Ok(None) => {
                    self.framer.record_timeout();
                    return Some(Ok(None));
                }
                Ok(Some(byte)) => match self.framer.push(byte) {
                    FrameOutcome::Packet(packet) => return Some(Ok(Some(packet))),
                    FrameOutcome::Rejected(e) => debug!("Ignoring candidate frame: {}", e),
                    FrameOutcome::Pending => {}
                },
                Err(e) => {
                    self.finished = true;
                    return Some(Err(e));
                }
            }
        }
    }
}

impl<S: ByteSource> Iterator for Packets<S> {
    type Item = Result<Packet, SourceError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.next_or_timeout()? {
                Ok(Some(packet)) => return Some(Ok(packet)),
                Ok(None) => {}
                Err(e) => return Some(Err(e)),
            }
        }
    }
}

impl Framer {
    /// Turn this framer into a packet iterator over `source`.
    pub fn packets<S: ByteSource>(self, source: S) -> Packets<S> {
        Packets::new(self, source)
    }
}

pub mod mock {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[derive(Debug)]
    enum Scripted {
        Byte(u8),
        Timeout,
        Fail(io::ErrorKind),
    }

    /// Scripted byte source for tests. Reports [`SourceError::Closed`] once
    /// the script runs out.
    #[derive(Debug, Default)]
    pub struct ScriptedSource {
        script: VecDeque<Scripted>,
        reads: usize,
        released: Arc<AtomicBool>,
    }

    impl ScriptedSource {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn from_bytes(data: &[u8]) -> Self {
            Self::new().bytes(data)
        }

        pub fn bytes(mut self, data: &[u8]) -> Self {
            self.script.extend(data.iter().copied().map(Scripted::Byte));
            self
        }

        pub fn packet(self, packet: Packet) -> Self {
            self.bytes(&packet.encode())
        }

        pub fn timeout(mut self) -> Self {
            self.script.push_back(Scripted::Timeout);
            self
        }

        pub fn fail(mut self, kind: io::ErrorKind) -> Self {
            self.script.push_back(Scripted::Fail(kind));
            self
        }

        pub fn reads(&self) -> usize {
            self.reads
        }

        /// Flag set when this source is dropped.
        pub fn release_flag(&self) -> Arc<AtomicBool> {
            Arc::clone(&self.released)
        }
    }

    impl ByteSource for ScriptedSource {
        fn read_byte(&mut self) -> Result<Option<u8>, SourceError> {
            self.reads = self.reads.saturating_add(1);
            match self.script.pop_front() {
                Some(Scripted::Byte(byte)) => Ok(Some(byte)),
                Some(Scripted::Timeout) => Ok(None),
                Some(Scripted::Fail(kind)) => Err(SourceError::Io(io::Error::new(
                    kind,
                    "scripted failure",
                ))),
                None => Err(SourceError::Closed),
            }
        }
    }

    impl Drop for ScriptedSource {
        fn drop(&mut self) {
            self.released.store(true, Ordering::SeqCst);
        }
    }
}
