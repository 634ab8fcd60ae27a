use super::*;
use crate::Chips;
use crate::Error;
use crate::Result;
use crate::same;
use std::collections::BTreeMap;

/// No-Limit Hold'em betting rules over pot-relative discrete actions.
#[derive(Debug, Clone, Copy, Default)]
pub struct Holdem;

impl Holdem {
    /// Concrete actions the seat to act may take, each with the amount it
    /// requires (the minimum, for bets and raises).
    pub fn options(&self, params: &GameParams, state: &State) -> BTreeMap<Action, Chips> {
        let mut options = BTreeMap::new();
        if state.street > params.terminal {
            return options;
        }
        let stack = state.stack(params);
        let call = state.call;
        let limit = params.max_actions as usize
            + match state.street {
                Street::Pref => crate::BLIND_ACTIONS as usize,
                _ => 0,
            };
        let capped = state.actions as usize + 1 >= limit;
        if same(call, 0.) {
            options.insert(Action::Check, 0.);
            if !capped {
                if stack > params.big_blind() {
                    options.insert(Action::Bet, params.big_blind());
                }
                options.insert(Action::AllIn, stack);
            }
            return options;
        }
        options.insert(Action::Fold, 0.);
        if capped {
            options.insert(Action::Call, call.min(stack));
            return options;
        }
        if stack < call {
            options.insert(Action::Call, stack);
            return options;
        }
        let mut raise = call;
        if state.biggest.amount > 0. {
            if state.biggest.action.is_bet() {
                raise += state.biggest.amount;
            }
            if state.biggest.action.is_raise() {
                raise = state.biggest.addition + state.biggest.amount;
            }
        }
        let behind = (0..state.seats.len())
            .filter(|i| *i != state.turn as usize)
            .map(|i| state.behind(params, i))
            .fold(0., Chips::max);
        if raise < stack && behind > 0. {
            options.insert(Action::Raise, raise);
        }
        options.insert(Action::Call, call);
        if call < stack && behind > 0. {
            options.insert(Action::AllIn, stack);
        }
        options
    }

    /// Discrete actions with the chips each would put in, ascending.
    pub fn discrete(&self, params: &GameParams, state: &State) -> Vec<(Discrete, Chips)> {
        let options = self.options(params, state);
        let mut actions = Vec::<(Discrete, Chips)>::new();
        let mut insert = |action: Discrete, amount: Chips| {
            match actions.iter_mut().find(|(a, _)| *a == action) {
                Some(slot) => slot.1 = amount,
                None => actions.push((action, amount)),
            }
        };
        if options.contains_key(&Action::Fold) {
            insert(Discrete::FOLD, 0.);
        }
        if options.contains_key(&Action::Check) {
            insert(Discrete::CHECK, 0.);
        }
        let opening = state.street == Street::Pref && state.actions == crate::BLIND_ACTIONS;
        if let Some(amount) = options.get(&Action::Call) {
            if !opening || params.limp {
                insert(Discrete::CALL, *amount);
            }
        }
        let raise = options
            .get(&Action::Bet)
            .or(options.get(&Action::Raise))
            .copied()
            .unwrap_or(0.);
        if let Some(amount) = options.get(&Action::AllIn) {
            insert(Discrete::ALL_IN, *amount);
        }
        if let Some(sizes) = params
            .bet_sizes
            .get(state.bets as usize)
            .or(params.bet_sizes.last())
        {
            let stack = state.stack(params);
            let pot = state.pot();
            if !same(raise, 0.) {
                if params.min_bet {
                    insert(Discrete::bet(raise / pot), raise);
                }
                for size in sizes.iter() {
                    let amount = pot * size;
                    if amount < raise || amount > stack {
                        continue;
                    }
                    insert(Discrete::bet(*size), amount);
                }
            }
        }
        actions.sort_by(|a, b| a.0.order(&b.0));
        actions
    }

    /// Concrete action and amount a discrete action stands for.
    pub fn concrete(&self, params: &GameParams, state: &State, action: Discrete) -> (Action, Chips) {
        match action.value() {
            -3.0 => (Action::Fold, 0.),
            -1.0 => (Action::Check, 0.),
            -2.0 => (Action::Call, state.call),
            -4.0 => (Action::AllIn, state.stack(params)),
            multiple => {
                let scale = 10f32.powi(crate::BET_PRECISION);
                let amount = (state.pot() * multiple * scale).round() / scale;
                match same(state.call, 0.) {
                    true => (Action::Bet, amount),
                    false => (Action::Raise, amount),
                }
            }
        }
    }

    /// Applies a concrete action for the seat to act, after validation.
    pub fn act(&self, params: &GameParams, state: &State, action: Action, amount: Chips) -> Result<State> {
        if state.street > params.terminal {
            return Err(Error::Transition(format!("cannot act on {}", state.street)));
        }
        self.validate(params, state, action, amount)?;
        let turn = state.turn as usize;
        let stack = state.stack(params);
        let mut seat = state.seats[turn];
        let mut amount = amount;
        if action == Action::AllIn || amount >= stack {
            amount = stack;
            seat.status = Status::AllIn;
        }
        if action == Action::Fold {
            seat.status = Status::Folded;
        }
        seat.paid += amount;
        let mut next = state.clone();
        next.seats[turn] = seat;
        next.actions += 1;
        next.committed[turn] += amount;
        next.acted[turn] += 1;
        next.last[turn] = action;
        if amount > state.biggest.amount {
            next.biggest = Commitment {
                amount,
                addition: amount - state.biggest.amount,
                action,
            };
        }
        if matches!(action, Action::Bet | Action::Raise) {
            next.bets += 1;
        }
        Ok(next)
    }

    fn validate(&self, params: &GameParams, state: &State, action: Action, amount: Chips) -> Result<()> {
        let options = self.options(params, state);
        let stack = state.stack(params);
        let seat = state.turn;
        let illegal = |why: String| Err(Error::Transition(format!("seat {}: {}", seat, why)));
        if !options.contains_key(&action) && !action.is_blind() {
            return illegal(format!("illegal {}", action));
        }
        let least = options.get(&action).copied().unwrap_or(0.);
        match action {
            Action::Check | Action::Fold if !same(amount, 0.) => illegal(format!("{} for {}", action, amount)),
            Action::Call if !same(amount, least) => illegal(format!("call {} must be {}", amount, least)),
            Action::Raise | Action::Bet if amount < least => illegal(format!("{} {} below {}", action, amount, least)),
            Action::AllIn if !same(amount, stack) => illegal(format!("all-in {} must be {}", amount, stack)),
            _ if amount > stack => illegal(format!("{} {} exceeds stack {}", action, amount, stack)),
            _ => Ok(()),
        }
    }

    /// Active seats that still owe a decision this street.
    pub fn pending(&self, state: &State) -> usize {
        if state.seats.count(Seat::is_live) == 1 {
            return 0;
        }
        let most = state.committed.iter().copied().fold(0., Chips::max);
        state
            .seats
            .iter()
            .enumerate()
            .filter(|(_, s)| s.is_waiting())
            .filter(|(i, _)| {
                state.committed[*i] < most
                    || state.acted[*i] == 0
                    || (state.street == Street::Pref
                        && state.acted[*i] == 1
                        && state.last[*i] == Action::BigBlind)
            })
            .count()
    }

    fn opening_seat(&self, state: &mut State) {
        let (button, small, big) = state.positions();
        if state.seats.len() == 2 {
            state.turn = match state.street {
                Street::Pref => small,
                _ => big,
            };
            return;
        }
        let before = match state.street {
            Street::Pref => button,
            _ => big,
        };
        if let Some(seat) = state.seats.waiting_from(before as usize + 1) {
            state.turn = seat as u8;
        }
    }
}

impl Rules for Holdem {
    fn blinds(&self, params: &GameParams) -> Result<State> {
        let mut state = State::new(params);
        state.turn = state.positions().1;
        let mut state = self.act(params, &state, Action::SmallBlind, params.small_blind)?;
        self.advance_turn(params, &mut state)?;
        let mut state = self.act(params, &state, Action::BigBlind, params.big_blind())?;
        self.advance_turn(params, &mut state)?;
        Ok(state)
    }

    fn legal(&self, params: &GameParams, state: &State) -> Vec<Discrete> {
        self.discrete(params, state)
            .into_iter()
            .map(|(action, _)| action)
            .collect()
    }

    fn apply(&self, params: &GameParams, state: &State, action: Discrete) -> Result<State> {
        let (action, amount) = self.concrete(params, state, action);
        self.act(params, state, action, amount)
    }

    fn classify(&self, params: &GameParams, state: &State) -> Transition {
        let pending = self.pending(state);
        let acted = state.acted.iter().map(|n| *n as usize).sum::<usize>();
        if pending > 1 || (pending == 1 && acted > 0) {
            return Transition::ShiftTurn;
        }
        if state.seats.count(Seat::is_waiting) > 1 {
            return match state.street >= params.terminal {
                true => Transition::Finish,
                false => Transition::ShiftStreet,
            };
        }
        if state.seats.count(Seat::is_live) <= 1 {
            return Transition::Finish;
        }
        match state.street < params.terminal {
            true => Transition::ShiftStreetUntilEnd,
            false => Transition::Finish,
        }
    }

    fn advance_turn(&self, params: &GameParams, state: &mut State) -> Result<()> {
        let next = state
            .seats
            .waiting_from(state.turn as usize + 1)
            .ok_or_else(|| Error::Transition(String::from("no seat left to act")))?;
        state.turn = next as u8;
        let most = state.committed.iter().copied().fold(0., Chips::max);
        let owed = (most - state.committed[next]).max(0.);
        state.call = owed.min(state.behind(params, next));
        Ok(())
    }

    fn advance_street(&self, _: &GameParams, state: &mut State) -> Result<()> {
        state.street = state.street.next();
        if state.street == Street::Done {
            return Ok(());
        }
        self.opening_seat(state);
        let n = state.seats.len();
        state.actions = 0;
        state.bets = 0;
        state.committed = vec![0.; n];
        state.acted = vec![0; n];
        state.last = vec![Action::None; n];
        state.biggest = Commitment::default();
        state.call = 0.;
        Ok(())
    }

    fn pots(&self, seats: &[Seat]) -> Pots {
        let mut shoved = seats.indices(Seat::is_shoved);
        shoved.sort_by(|a, b| seats[*a as usize].paid.total_cmp(&seats[*b as usize].paid));
        let mut sides = Vec::<Pot>::new();
        for i in shoved {
            let level = seats[i as usize].paid;
            let amount = level - sides.iter().map(|p| p.amount).sum::<Chips>();
            let eligible = (0..seats.len())
                .filter(|j| seats[*j].paid >= level && seats[*j].is_live())
                .map(|j| j as u8)
                .collect();
            sides.push(Pot::from((amount, eligible)));
        }
        let most = seats.paid_max();
        let eligible = (0..seats.len())
            .filter(|j| same(seats[*j].paid, most) && seats[*j].is_live())
            .map(|j| j as u8)
            .collect();
        let main = Pot::from((
            seats.paid_sum() - sides.iter().map(|p| p.amount).sum::<Chips>(),
            eligible,
        ));
        Pots::from(std::iter::once(main).chain(sides).collect::<Vec<_>>())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> GameParams {
        GameParams {
            players: 2,
            max_actions: 2,
            button: 0,
            small_blind: 1.,
            bet_sizes: vec![],
            stacks: vec![100., 100.],
            terminal: Street::Flop,
            min_bet: false,
            limp: true,
        }
    }

    #[test]
    fn blinds_leave_small_blind_to_act() {
        let state = Holdem.blinds(&params()).unwrap();
        assert_eq!(state.turn, 0);
        assert_eq!(state.call, 1.);
        assert_eq!(state.actions, 2);
        assert_eq!(state.seats[0].paid, 1.);
        assert_eq!(state.seats[1].paid, 2.);
        assert_eq!(state.biggest.action, Action::BigBlind);
    }

    #[test]
    fn limping_is_offered_only_when_allowed() {
        let state = Holdem.blinds(&params()).unwrap();
        assert_eq!(
            Holdem.legal(&params(), &state),
            vec![Discrete::ALL_IN, Discrete::FOLD, Discrete::CALL]
        );
        let strict = GameParams {
            limp: false,
            ..params()
        };
        assert_eq!(
            Holdem.legal(&strict, &state),
            vec![Discrete::ALL_IN, Discrete::FOLD]
        );
    }

    #[test]
    fn sized_bets_respect_minimum_raise() {
        let params = GameParams {
            bet_sizes: vec![vec![0.5, 1., 3.]],
            ..params()
        };
        let state = Holdem.blinds(&params).unwrap();
        let actions = Holdem.discrete(&params, &state);
        // pot of 3 with a minimum raise to 3: half pot is too small
        assert!(actions.iter().any(|(a, c)| *a == Discrete::bet(1.) && *c == 3.));
        assert!(actions.iter().any(|(a, _)| *a == Discrete::bet(3.)));
        assert!(!actions.iter().any(|(a, _)| *a == Discrete::bet(0.5)));
    }

    #[test]
    fn shove_then_fold_finishes() {
        let params = params();
        let state = Holdem.blinds(&params).unwrap();
        let shove = Holdem.apply(&params, &state, Discrete::ALL_IN).unwrap();
        assert_eq!(shove.seats[0], Seat::from((100., Status::AllIn)));
        assert_eq!(Holdem.classify(&params, &shove), Transition::ShiftTurn);
        let mut shove = shove;
        Holdem.advance_turn(&params, &mut shove).unwrap();
        assert_eq!(shove.turn, 1);
        assert_eq!(Holdem.legal(&params, &shove), vec![Discrete::FOLD, Discrete::CALL]);
        let fold = Holdem.apply(&params, &shove, Discrete::FOLD).unwrap();
        assert_eq!(Holdem.classify(&params, &fold), Transition::Finish);
        assert_eq!(fold.pot(), 102.);
    }

    #[test]
    fn limp_check_deals_the_flop() {
        let params = params();
        let state = Holdem.blinds(&params).unwrap();
        let mut limp = Holdem.apply(&params, &state, Discrete::CALL).unwrap();
        assert_eq!(Holdem.classify(&params, &limp), Transition::ShiftTurn);
        Holdem.advance_turn(&params, &mut limp).unwrap();
        assert_eq!(Holdem.legal(&params, &limp), vec![Discrete::CHECK]);
        let mut check = Holdem.apply(&params, &limp, Discrete::CHECK).unwrap();
        assert_eq!(Holdem.classify(&params, &check), Transition::ShiftStreet);
        Holdem.advance_street(&params, &mut check).unwrap();
        assert_eq!(check.street, Street::Flop);
        assert_eq!(check.turn, 1);
        assert_eq!(check.committed, vec![0., 0.]);
        assert_eq!(
            Holdem.legal(&params, &check),
            vec![Discrete::ALL_IN, Discrete::CHECK]
        );
    }

    #[test]
    fn illegal_actions_are_rejected() {
        let params = params();
        let state = Holdem.blinds(&params).unwrap();
        assert!(Holdem.act(&params, &state, Action::Check, 0.).is_err());
        assert!(Holdem.act(&params, &state, Action::Call, 5.).is_err());
        assert!(Holdem.act(&params, &state, Action::Raise, 2.).is_err());
    }

    #[test]
    fn side_pots_follow_all_in_levels() {
        let seats = [
            Seat::from((75., Status::Active)),
            Seat::from((50., Status::Folded)),
            Seat::from((25., Status::AllIn)),
        ];
        let pots = Holdem.pots(&seats);
        assert_eq!(pots.len(), 2);
        assert_eq!(pots[0], Pot::from((125., vec![0])));
        assert_eq!(pots[1], Pot::from((25., vec![0, 2])));
        assert_eq!(pots.total(), seats.paid_sum());
    }
}
