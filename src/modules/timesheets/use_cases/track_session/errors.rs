use crate::modules::timesheets::core::ports::GatewayError;
use thiserror::Error;

/// A guard that stopped a mutation before any remote call was made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Precondition {
    #[error("the selected date is not today")]
    NotToday,

    #[error("already clocked in")]
    AlreadyClockedIn,

    #[error("today's time log is already clocked out")]
    DayClosed,

    #[error("not clocked in")]
    NotClockedIn,

    #[error("end the current break before clocking out")]
    OnBreak,

    #[error("already on a break")]
    AlreadyOnBreak,

    #[error("not on a break")]
    NotOnBreak,

    #[error("no break type selected")]
    NoBreakTypeSelected,

    #[error("another attendance change is still in progress")]
    MutationInFlight,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("precondition not met: {0}")]
    PreconditionNotMet(Precondition),

    #[error(transparent)]
    Remote(#[from] GatewayError),
}

impl From<Precondition> for SessionError {
    fn from(p: Precondition) -> Self {
        SessionError::PreconditionNotMet(p)
    }
}
