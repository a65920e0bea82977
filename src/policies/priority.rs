//! # Priority tiers.
//!
//! [`Priority`] decides **when** a binding runs relative to other bindings for the
//! same event kind within one dispatch call.
//!
//! Tiers are visited in ascending order; within a tier, bindings run in
//! registration order:
//! ```text
//! Earliest → Early → Normal → Late → Latest → Monitor
//! ```
//!
//! ## Choosing a tier
//! - `Earliest` / `Early`: validation and vetoes (cancel before others act)
//! - `Normal`: regular handling (default)
//! - `Late` / `Latest`: handlers that want the final say on mutable state
//! - `Monitor`: observe the outcome only; always runs last and should not cancel

/// Ordering tier of a handler binding.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Priority {
    Earliest,
    Early,
    #[default]
    Normal,
    Late,
    Latest,
    /// Runs after every other tier.
    Monitor,
}

impl Priority {
    /// Number of tiers.
    pub const COUNT: usize = 6;

    /// All tiers in visiting order.
    pub const ALL: [Priority; Priority::COUNT] = [
        Priority::Earliest,
        Priority::Early,
        Priority::Normal,
        Priority::Late,
        Priority::Latest,
        Priority::Monitor,
    ];

    /// Position of the tier in visiting order (`0..COUNT`).
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            Priority::Earliest => "earliest",
            Priority::Early => "early",
            Priority::Normal => "normal",
            Priority::Late => "late",
            Priority::Latest => "latest",
            Priority::Monitor => "monitor",
        }
    }
}

/// How a binding reacts to an event that is already cancelled when its turn comes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CancelPolicy {
    /// Invoke the handler regardless of the cancellation latch (default).
    #[default]
    ReceiveCancelled,
    /// Skip the handler if the event is cancellable and currently cancelled.
    SkipCancelled,
}

impl CancelPolicy {
    /// Maps the classic `ignore_cancelled` flag: `true` → [`CancelPolicy::SkipCancelled`].
    #[inline]
    pub const fn from_ignore_cancelled(ignore_cancelled: bool) -> Self {
        if ignore_cancelled {
            CancelPolicy::SkipCancelled
        } else {
            CancelPolicy::ReceiveCancelled
        }
    }

    #[inline]
    pub const fn ignores_cancelled(self) -> bool {
        matches!(self, CancelPolicy::SkipCancelled)
    }
}
