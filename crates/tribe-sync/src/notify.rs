use crate::error::Failure;

/// User-facing alert surface (a dialog, a toast, a status line).
pub trait Notifier: Send + Sync {
    fn alert(&self, failure: &Failure);
}

