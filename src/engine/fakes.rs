// Deterministic in-memory ports for locomotion tests

use glam::Vec3;
use std::cell::RefCell;
use std::rc::Rc;

use super::ports::{CollisionFlags, LayerMask, MoveResult, Mover, RayCast, RayHit};

#[derive(Debug, Default)]
struct MoverState {
    position: Vec3,
    /// Origin height of a flat floor, if any
    floor: Option<f32>,
    /// Overrides the floor test when set
    forced_grounded: Option<bool>,
    grounded: bool,
    moves: Vec<Vec3>,
}

/// Mover over an optional infinite flat floor. Clones share state so a test
/// can keep a handle after boxing one into a character.
#[derive(Debug, Clone, Default)]
pub struct FakeMover {
    state: Rc<RefCell<MoverState>>,
}

impl FakeMover {
    pub fn on_floor(position: Vec3, floor: f32) -> Self {
        let mover = Self::default();
        {
            let mut state = mover.state.borrow_mut();
            state.position = position;
            state.floor = Some(floor);
            state.grounded = position.y <= floor;
        }
        mover
    }

    pub fn floating(position: Vec3) -> Self {
        let mover = Self::default();
        mover.state.borrow_mut().position = position;
        mover
    }

    pub fn force_grounded(&self, grounded: Option<bool>) {
        self.state.borrow_mut().forced_grounded = grounded;
    }

    pub fn moves(&self) -> Vec<Vec3> {
        self.state.borrow().moves.clone()
    }

    pub fn last_move(&self) -> Option<Vec3> {
        self.state.borrow().moves.last().copied()
    }
}

impl Mover for FakeMover {
    fn move_with_collision(&mut self, displacement: Vec3) -> MoveResult {
        let mut state = self.state.borrow_mut();
        state.moves.push(displacement);
        state.position += displacement;

        let mut landed = false;
        if let Some(floor) = state.floor {
            if state.position.y <= floor {
                state.position.y = floor;
                landed = true;
            }
        }
        state.grounded = state.forced_grounded.unwrap_or(landed);

        MoveResult {
            is_grounded: state.grounded,
            collision_flags: CollisionFlags {
                below: state.grounded,
                ..Default::default()
            },
        }
    }

    fn position(&self) -> Vec3 {
        self.state.borrow().position
    }

    fn is_grounded(&self) -> bool {
        self.state.borrow().grounded
    }
}

#[derive(Debug, Clone, Copy)]
struct ScriptedRay {
    direction: Vec3,
    layers: LayerMask,
    hit: RayHit,
}

/// Ray caster answering from a script keyed by direction and layer
#[derive(Debug, Clone, Default)]
pub struct FakeRayCast {
    rays: Rc<RefCell<Vec<ScriptedRay>>>,
}

impl FakeRayCast {
    pub fn new() -> Self {
        Self::default()
    }

    /// Any cast along `direction` that can see `layers` reports `hit`
    pub fn add(&self, direction: Vec3, layers: LayerMask, hit: RayHit) {
        self.rays.borrow_mut().push(ScriptedRay {
            direction: direction.normalize(),
            layers,
            hit,
        });
    }

    pub fn clear(&self) {
        self.rays.borrow_mut().clear();
    }
}

impl RayCast for FakeRayCast {
    fn cast(
        &self,
        _origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        layer_mask: Option<LayerMask>,
    ) -> Option<RayHit> {
        self.rays
            .borrow()
            .iter()
            .find(|ray| {
                ray.direction.dot(direction) > 0.999
                    && layer_mask.map_or(true, |mask| mask.intersects(ray.layers))
                    && ray.hit.distance <= max_distance
            })
            .map(|ray| ray.hit)
    }
}
