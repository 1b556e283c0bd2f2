//! Cooperative shutdown flag shared between a signal handler and a loop.
//!
//! Loops poll [`Shutdown::is_requested`] once per iteration; nothing is
//! interrupted mid-cycle, so a moisture sensor that is powered when the
//! signal lands still finishes its cycle and ends with the enable line low.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use log::info;

#[derive(Debug, Clone, Default)]
pub struct Shutdown {
    flag: Arc<AtomicBool>,
}

impl Shutdown {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask every loop holding a clone of this handle to stop.
    pub fn request(&self) {
        self.flag.store(true, Ordering::Release);
    }

    pub fn is_requested(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }

    /// Route SIGINT / SIGTERM / SIGHUP into this handle.
    ///
    /// May only be called once per process.
    pub fn install_signal_handler(&self) -> Result<(), ctrlc::Error> {
        let handle = self.clone();
        ctrlc::set_handler(move || {
            info!("shutdown requested");
            handle.request();
        })
    }
}
