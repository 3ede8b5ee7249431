//! Presentation seam.
//!
//! The worker hands the session to a [`Presenter`] after every change. What
//! the presenter renders, and where it delivers it, is up to the host.
use battle_core::BattleSession;

pub trait Presenter: Send + Sync {
    fn present(&self, session: &BattleSession);
}

/// Discards every view. Used when the host only consumes events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullPresenter;

impl Presenter for NullPresenter {
    fn present(&self, _session: &BattleSession) {}
}
