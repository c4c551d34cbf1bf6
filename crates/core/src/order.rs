//! Order status machine.
//!
//! Orders move strictly forward through [`PROGRESSION`]. A provider may jump
//! several steps at once; nobody may move an order backwards. `Cancelled` is
//! reachable from every non-terminal status and, like `Delivered`, is final.
//!
//! Who may trigger a transition depends on the acting [`Role`]:
//!
//! | Role | Allowed |
//! |------|---------|
//! | Customer | `Placed -> Cancelled` only |
//! | Provider | any forward transition, or cancel |
//! | Admin | none (read-only) |

use thiserror::Error;

use crate::types::{OrderStatus, Role};

/// The forward status sequence. `Cancelled` is not part of it.
pub const PROGRESSION: [OrderStatus; 5] = [
    OrderStatus::Placed,
    OrderStatus::Preparing,
    OrderStatus::Ready,
    OrderStatus::OutForDelivery,
    OrderStatus::Delivered,
];

/// Reasons a status transition is refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TransitionError {
    /// The order is already delivered or cancelled.
    #[error("order is already {0} and can no longer change")]
    Terminal(OrderStatus),

    /// The target is not later in the sequence than the current status.
    #[error("cannot move an order from {from} back to {to}")]
    NotForward { from: OrderStatus, to: OrderStatus },

    /// The acting role may not perform this transition.
    #[error("{role} accounts cannot change an order from {from} to {to}")]
    NotPermitted {
        role: Role,
        from: OrderStatus,
        to: OrderStatus,
    },
}

impl OrderStatus {
    /// Position in [`PROGRESSION`], or `None` for `Cancelled`.
    #[must_use]
    pub fn step(self) -> Option<usize> {
        PROGRESSION.iter().position(|status| *status == self)
    }

    /// Whether no further transition is possible.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled)
    }

    /// Every status this one may move to, regardless of role.
    ///
    /// All later statuses in the sequence followed by `Cancelled`; empty for
    /// terminal statuses.
    #[must_use]
    pub fn next_statuses(self) -> Vec<Self> {
        if self.is_terminal() {
            return Vec::new();
        }
        let Some(step) = self.step() else {
            return Vec::new();
        };

        PROGRESSION
            .iter()
            .skip(step + 1)
            .copied()
            .chain(std::iter::once(Self::Cancelled))
            .collect()
    }

    /// Whether `target` is a legal next status from `self`.
    #[must_use]
    pub fn can_advance_to(self, target: Self) -> bool {
        self.next_statuses().contains(&target)
    }
}

/// Statuses the given role may move an order to from `current`.
#[must_use]
pub fn allowed_transitions(role: Role, current: OrderStatus) -> Vec<OrderStatus> {
    match role {
        Role::Customer if current == OrderStatus::Placed => vec![OrderStatus::Cancelled],
        Role::Customer | Role::Admin => Vec::new(),
        Role::Provider => current.next_statuses(),
    }
}

/// Check that `role` may move an order from `current` to `target`.
///
/// # Errors
///
/// Returns [`TransitionError::Terminal`] for delivered or cancelled orders,
/// [`TransitionError::NotForward`] for targets that are not strictly later in
/// the sequence (or cancel), and [`TransitionError::NotPermitted`] when the
/// transition is legal but not for this role.
pub fn authorize_transition(
    role: Role,
    current: OrderStatus,
    target: OrderStatus,
) -> Result<(), TransitionError> {
    if current.is_terminal() {
        return Err(TransitionError::Terminal(current));
    }
    if !current.can_advance_to(target) {
        return Err(TransitionError::NotForward {
            from: current,
            to: target,
        });
    }
    if !allowed_transitions(role, current).contains(&target) {
        return Err(TransitionError::NotPermitted {
            role,
            from: current,
            to: target,
        });
    }
    Ok(())
}
