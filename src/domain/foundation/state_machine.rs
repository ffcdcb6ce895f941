//! Status enums with a fixed transition table.

use std::fmt;

/// A status enum whose legal moves are a static successor table.
pub trait StateMachine: Sized + Copy + PartialEq + fmt::Debug + 'static {
    /// States reachable from `self` in one step.
    fn successors(&self) -> &'static [Self];

    fn can_transition_to(&self, target: &Self) -> bool {
        self.successors().contains(target)
    }

    /// Returns `target` if the move is legal.
    fn transition_to(&self, target: Self) -> Result<Self, InvalidTransition<Self>> {
        if self.can_transition_to(&target) {
            Ok(target)
        } else {
            Err(InvalidTransition {
                from: *self,
                to: target,
            })
        }
    }

    fn is_terminal(&self) -> bool {
        self.successors().is_empty()
    }
}

/// A move the successor table does not allow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidTransition<S> {
    pub from: S,
    pub to: S,
}

impl<S: fmt::Debug> fmt::Display for InvalidTransition<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cannot move from {:?} to {:?}", self.from, self.to)
    }
}

impl<S: fmt::Debug> std::error::Error for InvalidTransition<S> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Ignition {
        Off,
        Running,
        Seized,
    }

    impl StateMachine for Ignition {
        fn successors(&self) -> &'static [Self] {
            match self {
                Ignition::Off => &[Ignition::Running],
                Ignition::Running => &[Ignition::Off, Ignition::Seized],
                Ignition::Seized => &[],
            }
        }
    }

    #[test]
    fn legal_move_returns_target() {
        assert_eq!(Ignition::Off.transition_to(Ignition::Running), Ok(Ignition::Running));
    }

    #[test]
    fn illegal_move_reports_both_ends() {
        let err = Ignition::Off.transition_to(Ignition::Seized).unwrap_err();
        assert_eq!(err.from, Ignition::Off);
        assert_eq!(err.to, Ignition::Seized);
        assert_eq!(err.to_string(), "cannot move from Off to Seized");
    }

    #[test]
    fn terminal_states_have_no_successors() {
        assert!(Ignition::Seized.is_terminal());
        assert!(!Ignition::Running.is_terminal());
    }
}
