//! Shared open/closed codeplug state
//!
//! Radio firmware keeps one active codeplug that UI and voice prompt code
//! both reach into. [`CodeplugSession`] gives that shape an explicit state
//! machine: operations on a closed session fail with
//! [`CodeplugError::NotOpen`] and opening twice fails with
//! [`CodeplugError::AlreadyOpen`].

use crate::codeplug::Codeplug;
use crate::error::{CodeplugError, Result};
use crate::io::CodeplugFile;
use parking_lot::Mutex;
use std::path::Path;
use tracing::info;

#[derive(Default)]
pub struct CodeplugSession {
    current: Mutex<Option<Codeplug<CodeplugFile>>>,
}

impl CodeplugSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty codeplug file; the session state is not changed
    pub fn create<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        Codeplug::create(path)
    }

    /// Open `path` as the active codeplug
    pub fn open<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut current = self.current.lock();
        if current.is_some() {
            return Err(CodeplugError::AlreadyOpen);
        }

        *current = Some(Codeplug::open(path)?);
        Ok(())
    }

    /// Close the active codeplug, flushing it
    pub fn close(&self) -> Result<()> {
        let codeplug = self.current.lock().take().ok_or(CodeplugError::NotOpen)?;
        info!("Closing session codeplug {}", codeplug.path().display());
        codeplug.close()
    }

    pub fn is_open(&self) -> bool {
        self.current.lock().is_some()
    }

    /// Run `f` against the active codeplug
    ///
    /// The session lock is held for the duration of `f`, so each call sees
    /// and leaves a codeplug no other thread is halfway through editing.
    pub fn with<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Codeplug<CodeplugFile>) -> Result<T>,
    {
        let mut current = self.current.lock();
        let codeplug = current.as_mut().ok_or(CodeplugError::NotOpen)?;
        f(codeplug)
    }
}
