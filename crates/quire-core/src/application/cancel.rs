//! Caller-supplied cancellation.

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use crate::{application::ApplicationError, error::QuireResult};

/// Cooperative cancellation flag shared between a caller and the work it
/// started. Clones observe the same flag.
///
/// Services call [`Cancellation::check`] before every storage call and file
/// read or write.
#[derive(Debug, Clone, Default)]
pub struct Cancellation {
    flag: Arc<AtomicBool>,
}

impl Cancellation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    /// `Err(Cancelled)` once [`cancel`](Self::cancel) has been called.
    pub fn check(&self) -> QuireResult<()> {
        if self.is_cancelled() {
            Err(ApplicationError::Cancelled.into())
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_the_flag() {
        let token = Cancellation::new();
        let seen_by_worker = token.clone();

        assert!(seen_by_worker.check().is_ok());
        token.cancel();
        assert!(seen_by_worker.is_cancelled());
        assert!(seen_by_worker.check().unwrap_err().is_cancelled());
    }
}
