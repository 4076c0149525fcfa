//! Process-interrupt flag.
//!
//! SIGINT and SIGTERM only set [`INTERRUPTED`]; the control loop checks it
//! at the top of every tick and shuts down through its normal path.

use std::sync::atomic::{AtomicBool, Ordering};

pub static INTERRUPTED: AtomicBool = AtomicBool::new(false);

/// Route SIGINT/SIGTERM to [`INTERRUPTED`].
#[cfg(unix)]
pub fn install() {
    unsafe {
        libc::signal(libc::SIGINT,  on_signal as libc::sighandler_t);
        libc::signal(libc::SIGTERM, on_signal as libc::sighandler_t);
    }
}

#[cfg(not(unix))]
pub fn install() {}

#[cfg(unix)]
extern "C" fn on_signal(_sig: libc::c_int) {
    INTERRUPTED.store(true, Ordering::SeqCst);
}

pub fn interrupted() -> bool {
    INTERRUPTED.load(Ordering::SeqCst)
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn sigint_sets_flag() {
        install();
        INTERRUPTED.store(false, Ordering::SeqCst);
        unsafe { libc::raise(libc::SIGINT); }
        assert!(interrupted());
        INTERRUPTED.store(false, Ordering::SeqCst);
    }
}
