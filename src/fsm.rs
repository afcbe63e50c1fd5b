/// Minimal finite-state-machine container.
///
/// `S` is the state type (usually an enum whose variants carry their own
/// timers). The machine tracks the current and previous state and whether the
/// current state was entered this tick. Transition rules live on the state
/// type itself (`impl S { fn next(..) }`), and entry effects are applied by
/// the system that drives the machine when [`just_entered`] is set.
///
/// [`just_entered`]: StateMachine::just_entered
#[derive(Debug, Clone)]
pub struct StateMachine<S: Clone> {
    pub state: S,
    pub previous: S,
    entered_this_tick: bool,
}

impl<S: Clone> StateMachine<S> {
    /// `just_entered()` is `false` for the initial state; nothing was entered.
    pub fn new(initial: S) -> Self {
        Self {
            previous: initial.clone(),
            state: initial,
            entered_this_tick: false,
        }
    }

    /// Transition to `next` only if it is a different variant from the
    /// current state (compared by discriminant). Returns whether it moved.
    pub fn go(&mut self, next: S) -> bool {
        if std::mem::discriminant(&self.state) == std::mem::discriminant(&next) {
            return false;
        }
        self.previous = std::mem::replace(&mut self.state, next);
        self.entered_this_tick = true;
        true
    }

    /// Clear the entry flag. Call once per tick before evaluating transitions.
    pub fn tick(&mut self) {
        self.entered_this_tick = false;
    }

    pub fn just_entered(&self) -> bool {
        self.entered_this_tick
    }
}
