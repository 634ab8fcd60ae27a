use super::Discrete;
use super::GameParams;
use super::Pots;
use super::Seat;
use super::State;

/// What must happen after an action has been applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Transition {
    /// Same street, next seat to act.
    ShiftTurn,
    /// Betting round is over, deal the next street.
    ShiftStreet,
    /// Nobody can act anymore but cards are still to come.
    ShiftStreetUntilEnd,
    /// Hand is over.
    Finish,
}

impl std::fmt::Display for Transition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ShiftTurn => write!(f, "ShiftTurn"),
            Self::ShiftStreet => write!(f, "ShiftStreet"),
            Self::ShiftStreetUntilEnd => write!(f, "ShiftStreetUntilEnd"),
            Self::Finish => write!(f, "Finish"),
        }
    }
}

/// Betting-rules state machine consumed by tree expansion.
pub trait Rules {
    /// State after the forced blinds, ready for the first voluntary action.
    fn blinds(&self, params: &GameParams) -> crate::Result<State>;
    /// Ascending discrete actions available to the seat to act.
    fn legal(&self, params: &GameParams, state: &State) -> Vec<Discrete>;
    /// Applies `action` for the seat to act, leaving the turn unchanged.
    fn apply(&self, params: &GameParams, state: &State, action: Discrete) -> crate::Result<State>;
    fn classify(&self, params: &GameParams, state: &State) -> Transition;
    fn advance_turn(&self, params: &GameParams, state: &mut State) -> crate::Result<()>;
    fn advance_street(&self, params: &GameParams, state: &mut State) -> crate::Result<()>;
    fn pots(&self, seats: &[Seat]) -> Pots;
}
