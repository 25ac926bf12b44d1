//! Termination signal handling
//!
//! SIGTERM and SIGINT only raise a flag; the poll loop checks it between
//! ticks and shuts down in order.

use std::sync::atomic::{AtomicBool, Ordering};

use nix::libc;
use nix::sys::signal::{sigaction, SaFlags, SigAction, SigHandler, SigSet, Signal};

static SHUTDOWN: AtomicBool = AtomicBool::new(false);

extern "C" fn request_shutdown(_signal: libc::c_int) {
    SHUTDOWN.store(true, Ordering::SeqCst);
}

/// Install the termination handlers and return the flag they raise
pub fn install() -> nix::Result<&'static AtomicBool> {
    let action = SigAction::new(
        SigHandler::Handler(request_shutdown),
        SaFlags::SA_RESTART,
        SigSet::empty(),
    );
    for signal in [Signal::SIGTERM, Signal::SIGINT] {
        // SAFETY: the handler only stores to an atomic, which is
        // async-signal-safe.
        unsafe { sigaction(signal, &action)? };
    }
    Ok(&SHUTDOWN)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sigterm_raises_flag() {
        let flag = install().unwrap();
        assert!(!flag.load(Ordering::SeqCst));

        nix::sys::signal::raise(Signal::SIGTERM).unwrap();
        assert!(flag.load(Ordering::SeqCst));
        SHUTDOWN.store(false, Ordering::SeqCst);
    }
}
