use merch_core::PublishResult;

/// Decides whether a freshly created draft should be made active.
///
/// Injected into [`crate::Coordinator::run`] so the status-change step is
/// deterministic under test. Declining is a normal outcome: the record stays
/// draft and the run still succeeds.
pub trait PublishConfirmation {
    fn confirm(&mut self, result: &PublishResult) -> bool;
}

/// A fixed answer. `false` is the default decision.
impl PublishConfirmation for bool {
    fn confirm(&mut self, _result: &PublishResult) -> bool {
        *self
    }
}
