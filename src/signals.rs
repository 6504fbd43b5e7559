//! Ctrl+C handling
//!
//! The parent must survive SIGINT while the child handles it, so the handler
//! only records that an interrupt happened.

use std::sync::atomic::{AtomicBool, Ordering};

static INTERRUPTED: AtomicBool = AtomicBool::new(false);

/// Install the Ctrl+C handler. A second Ctrl+C exits immediately.
pub fn install() {
    ctrlc::set_handler(move || {
        set_interrupted();

        static SECOND_CTRL_C: AtomicBool = AtomicBool::new(false);
        if SECOND_CTRL_C.swap(true, Ordering::SeqCst) {
            std::process::exit(crate::status::ExitStatus::Interrupted as i32);
        }
    })
    .ok();
}

#[inline]
pub fn was_interrupted() -> bool {
    INTERRUPTED.load(Ordering::SeqCst)
}

#[inline]
pub fn set_interrupted() {
    INTERRUPTED.store(true, Ordering::SeqCst);
}
