//! Output sinks for reporters

use parking_lot::Mutex;
use std::io::{self, Write};
use std::sync::Arc;

/// Where a reporter writes its progress and summary
pub type OutputSink = Box<dyn Write + Send>;

pub fn stdout() -> OutputSink {
    Box::new(io::stdout())
}

/// In-memory sink whose clones share one buffer.
///
/// Hand one clone to a reporter and keep the other to read what was written.
#[derive(Clone, Default)]
pub struct SharedBuffer {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl SharedBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.buffer.lock()).into_owned()
    }

    pub fn clear(&self) {
        self.buffer.lock().clear();
    }

    pub fn sink(&self) -> OutputSink {
        Box::new(self.clone())
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
