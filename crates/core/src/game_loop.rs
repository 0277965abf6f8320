//! Clock-driven wrapper around [`GameState`].
//!
//! The runner calls [`GameLoop::tick`] on every poll timeout and
//! [`GameLoop::dispatch`] for every mapped key. Both read the time from the
//! injected [`Clock`], so tests drive the same loop with a [`crate::ManualClock`].

use crate::clock::Clock;
use crate::game_state::GameState;
use crate::snapshot::GameSnapshot;
use crate::types::{CoreEvent, GameAction};

#[derive(Debug, Clone)]
pub struct GameLoop<C: Clock> {
    state: GameState,
    clock: C,
}

impl<C: Clock> GameLoop<C> {
    pub fn new(seed: u32, clock: C) -> Self {
        let state = GameState::new(seed, clock.now_ms());
        Self { state, clock }
    }

    /// Wrap an existing session
    pub fn with_state(state: GameState, clock: C) -> Self {
        Self { state, clock }
    }

    /// Gravity tick at the clock's current time
    pub fn tick(&mut self) -> bool {
        let now = self.clock.now_ms();
        self.state.tick(now)
    }

    /// Apply one player action at the clock's current time
    pub fn dispatch(&mut self, action: GameAction) -> bool {
        let now = self.clock.now_ms();
        self.state.apply_action(action, now)
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn snapshot(&self) -> GameSnapshot {
        self.state.snapshot()
    }

    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        self.state.snapshot_into(out);
    }

    pub fn take_events(&mut self) -> Vec<CoreEvent> {
        self.state.take_events()
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::types::GameStatus;

    #[test]
    fn gravity_follows_the_clock() {
        let mut game = GameLoop::new(42, ManualClock::new(0));
        let y0 = game.state().active().y;

        game.clock_mut().advance(1000);
        assert!(!game.tick());
        game.clock_mut().advance(1);
        assert!(game.tick());
        assert_eq!(game.state().active().y, y0 + 1);
    }

    #[test]
    fn dispatch_uses_clock_time() {
        let mut game = GameLoop::new(42, ManualClock::new(500));
        assert!(game.dispatch(GameAction::TogglePause));
        assert_eq!(game.state().status(), GameStatus::Paused);

        game.clock_mut().set(9000);
        assert!(game.dispatch(GameAction::TogglePause));
        assert_eq!(game.state().last_drop_ms(), 9000);
    }
}
