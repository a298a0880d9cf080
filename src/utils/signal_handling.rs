use std::sync::{
    Once,
    atomic::{AtomicBool, Ordering},
};

static RECEIVED_CTRL_C: AtomicBool = AtomicBool::new(false);
static HANDLER: Once = Once::new();

/// Installs the ctrl-c handler. Binaries running long computations should call
/// this once at startup; without it [`received_ctrl_c`] stays false and the
/// process terminates with the default signal behavior.
pub fn initialize() {
    HANDLER.call_once(|| {
        let _ = ctrlc::set_handler(|| RECEIVED_CTRL_C.store(true, Ordering::SeqCst));
    });
}

/// Returns true once a termination signal was observed.
pub fn received_ctrl_c() -> bool {
    RECEIVED_CTRL_C.load(Ordering::SeqCst)
}
