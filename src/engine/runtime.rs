use std::sync::atomic::{AtomicBool, Ordering};

static INITIALIZED: AtomicBool = AtomicBool::new(false);

/// Proof that [`init`] ran. Required to construct a
/// [`MotionEngine`](super::MotionEngine).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Runtime {
    _private: (),
}

/// One-time process-wide setup, invoked by the application's composition
/// root. Later calls are no-ops that return a token as well.
pub fn init() -> Runtime {
    let first = INITIALIZED
        .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
        .is_ok();
    if first {
        log::info!(
            "folio-motion {} initialized",
            env!("CARGO_PKG_VERSION")
        );
    }
    Runtime { _private: () }
}

/// Whether [`init`] has run in this process.
#[must_use]
pub fn is_initialized() -> bool {
    INITIALIZED.load(Ordering::Acquire)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_is_idempotent() {
        let a = init();
        let b = init();
        assert!(is_initialized());
        assert_eq!(a, b);
    }
}
