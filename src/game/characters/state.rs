// Locomotion state machine

use std::fmt;

/// Locomotion mode the character is in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LocomotionState {
    /// Standing or walking on a surface
    #[default]
    Ground,
    /// Jumping or falling
    Air,
    /// Running along a wall to the side
    WallRun,
    /// Reserved; no behaviour or entry transition yet
    WallClimb,
    /// Reserved; no behaviour or entry transition yet
    Swim,
}

impl LocomotionState {
    /// Whether the side-wall probes run in this state
    pub fn probes_walls(&self) -> bool {
        matches!(self, Self::Air | Self::WallRun)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Ground => "ground",
            Self::Air => "air",
            Self::WallRun => "wall_run",
            Self::WallClimb => "wall_climb",
            Self::Swim => "swim",
        }
    }
}

impl fmt::Display for LocomotionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Facts the transition guards are evaluated against, sampled after the
/// state's behaviour ran for the frame
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TransitionGuards {
    pub grounded: bool,
    /// A wall is within reach on either side
    pub wall_present: bool,
    /// Forward component of the latched move input
    pub forward_input: f32,
}

/// Next state for `state` under `guards`, or `None` to stay.
///
/// Guards are checked in a fixed order and the first match wins.
pub fn evaluate_transition(
    state: LocomotionState,
    guards: &TransitionGuards,
) -> Option<LocomotionState> {
    match state {
        LocomotionState::Ground => (!guards.grounded).then_some(LocomotionState::Air),
        LocomotionState::Air => {
            if guards.grounded {
                Some(LocomotionState::Ground)
            } else if guards.wall_present && guards.forward_input > 0.0 {
                Some(LocomotionState::WallRun)
            } else {
                None
            }
        }
        LocomotionState::WallRun => {
            if guards.grounded {
                Some(LocomotionState::Ground)
            } else if !guards.wall_present || guards.forward_input <= 0.0 {
                Some(LocomotionState::Air)
            } else {
                None
            }
        }
        LocomotionState::WallClimb => guards.grounded.then_some(LocomotionState::Ground),
        LocomotionState::Swim => None,
    }
}

/// Current and previous state plus time spent in the current one
#[derive(Debug)]
pub struct LocomotionStateMachine {
    current_state: LocomotionState,
    previous_state: LocomotionState,
    state_time: f32,
}

impl Default for LocomotionStateMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl LocomotionStateMachine {
    pub fn new() -> Self {
        Self::starting_in(LocomotionState::Ground)
    }

    pub fn starting_in(state: LocomotionState) -> Self {
        Self {
            current_state: state,
            previous_state: state,
            state_time: 0.0,
        }
    }

    pub fn state(&self) -> LocomotionState {
        self.current_state
    }

    pub fn previous_state(&self) -> LocomotionState {
        self.previous_state
    }

    /// Seconds spent in the current state
    pub fn state_time(&self) -> f32 {
        self.state_time
    }

    /// Move to `new_state`. Returns false (and does nothing) if already there.
    pub fn transition(&mut self, new_state: LocomotionState) -> bool {
        if self.current_state == new_state {
            return false;
        }
        log::debug!("Locomotion {} -> {}", self.current_state, new_state);
        self.previous_state = self.current_state;
        self.current_state = new_state;
        self.state_time = 0.0;
        true
    }

    /// Force transition even to the same state (resets state time)
    pub fn force_transition(&mut self, new_state: LocomotionState) {
        log::debug!("Locomotion forced {} -> {}", self.current_state, new_state);
        self.previous_state = self.current_state;
        self.current_state = new_state;
        self.state_time = 0.0;
    }

    /// Accumulate time in the current state
    pub fn tick(&mut self, dt: f32) {
        self.state_time += dt;
    }

    /// Evaluate the current state's guards and take the transition, if any
    pub fn apply_guards(&mut self, guards: &TransitionGuards) -> Option<LocomotionState> {
        let next = evaluate_transition(self.current_state, guards)?;
        self.transition(next);
        Some(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn guards(grounded: bool, wall_present: bool, forward_input: f32) -> TransitionGuards {
        TransitionGuards {
            grounded,
            wall_present,
            forward_input,
        }
    }

    #[test]
    fn test_initial_state() {
        let sm = LocomotionStateMachine::new();
        assert_eq!(sm.state(), LocomotionState::Ground);
        assert_eq!(sm.previous_state(), LocomotionState::Ground);
    }

    #[test]
    fn test_state_transition() {
        let mut sm = LocomotionStateMachine::new();
        assert!(sm.transition(LocomotionState::Air));
        assert_eq!(sm.state(), LocomotionState::Air);
        assert_eq!(sm.previous_state(), LocomotionState::Ground);
        assert!(!sm.transition(LocomotionState::Air));
    }

    #[test]
    fn test_transition_resets_state_time() {
        let mut sm = LocomotionStateMachine::new();
        sm.tick(0.25);
        sm.transition(LocomotionState::Air);
        assert_eq!(sm.state_time(), 0.0);
        sm.tick(0.1);
        assert_eq!(sm.state_time(), 0.1);
    }

    #[test]
    fn test_force_transition_resets_time() {
        let mut sm = LocomotionStateMachine::starting_in(LocomotionState::Swim);
        sm.tick(0.5);
        sm.force_transition(LocomotionState::Swim);
        assert_eq!(sm.state_time(), 0.0);
        assert_eq!(sm.previous_state(), LocomotionState::Swim);
    }

    #[test]
    fn test_ground_guards() {
        assert_eq!(
            evaluate_transition(LocomotionState::Ground, &guards(false, true, 1.0)),
            Some(LocomotionState::Air)
        );
        assert_eq!(
            evaluate_transition(LocomotionState::Ground, &guards(true, true, 1.0)),
            None
        );
    }

    #[test]
    fn test_air_guards() {
        assert_eq!(
            evaluate_transition(LocomotionState::Air, &guards(false, true, 0.5)),
            Some(LocomotionState::WallRun)
        );
        // Wall without forward input stays airborne
        assert_eq!(
            evaluate_transition(LocomotionState::Air, &guards(false, true, 0.0)),
            None
        );
        assert_eq!(
            evaluate_transition(LocomotionState::Air, &guards(false, false, 1.0)),
            None
        );
    }

    #[test]
    fn test_landing_beats_wall_entry() {
        // Grounded next to a wall with forward input: first guard wins
        assert_eq!(
            evaluate_transition(LocomotionState::Air, &guards(true, true, 1.0)),
            Some(LocomotionState::Ground)
        );
        assert_eq!(
            evaluate_transition(LocomotionState::WallRun, &guards(true, false, 0.0)),
            Some(LocomotionState::Ground)
        );
    }

    #[test]
    fn test_wall_run_guards() {
        assert_eq!(
            evaluate_transition(LocomotionState::WallRun, &guards(false, true, 1.0)),
            None
        );
        assert_eq!(
            evaluate_transition(LocomotionState::WallRun, &guards(false, false, 1.0)),
            Some(LocomotionState::Air)
        );
        assert_eq!(
            evaluate_transition(LocomotionState::WallRun, &guards(false, true, -0.2)),
            Some(LocomotionState::Air)
        );
    }

    #[test]
    fn test_reserved_states() {
        assert_eq!(
            evaluate_transition(LocomotionState::WallClimb, &guards(true, false, 0.0)),
            Some(LocomotionState::Ground)
        );
        assert_eq!(
            evaluate_transition(LocomotionState::WallClimb, &guards(false, true, 1.0)),
            None
        );
        assert_eq!(
            evaluate_transition(LocomotionState::Swim, &guards(true, true, 1.0)),
            None
        );
    }

    #[test]
    fn test_apply_guards() {
        let mut sm = LocomotionStateMachine::starting_in(LocomotionState::Air);
        assert_eq!(
            sm.apply_guards(&guards(false, true, 1.0)),
            Some(LocomotionState::WallRun)
        );
        assert_eq!(sm.previous_state(), LocomotionState::Air);
        assert_eq!(sm.apply_guards(&guards(false, true, 1.0)), None);
        assert_eq!(sm.state(), LocomotionState::WallRun);
    }

    #[test]
    fn test_state_names() {
        assert_eq!(LocomotionState::WallRun.to_string(), "wall_run");
        assert!(LocomotionState::Air.probes_walls());
        assert!(!LocomotionState::Ground.probes_walls());
        assert!(LocomotionState::WallRun.probes_walls());
        assert!(!LocomotionState::Swim.probes_walls());
    }
}
