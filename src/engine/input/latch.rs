// Single-slot input latch shared between input callbacks and the simulation

use glam::Vec2;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/// One frame's view of the player's input
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InputState {
    /// Movement axis, x = strafe, y = forward, roughly [-1, 1] each
    pub move_axis: Vec2,
    /// Whether the jump button is held
    pub jump_held: bool,
}

impl InputState {
    /// True iff the movement axis is non-zero
    pub fn is_movement_active(&self) -> bool {
        self.move_axis.x != 0.0 || self.move_axis.y != 0.0
    }
}

/// Latest-sample input store.
///
/// Writers (input callbacks) may fire at any time; the simulation samples
/// once per tick. There is no queue: the last write before a sample wins.
/// Both axis components are packed into one atomic word so a sample never
/// observes x from one write and y from another.
#[derive(Debug)]
pub struct InputLatch {
    move_bits: AtomicU64,
    jump_held: AtomicBool,
    accepting: AtomicBool,
}

fn pack(axis: Vec2) -> u64 {
    ((axis.x.to_bits() as u64) << 32) | axis.y.to_bits() as u64
}

fn unpack(bits: u64) -> Vec2 {
    Vec2::new(f32::from_bits((bits >> 32) as u32), f32::from_bits(bits as u32))
}

impl InputLatch {
    /// Create a latch; it ignores writes until opened
    pub fn new() -> Self {
        Self {
            move_bits: AtomicU64::new(pack(Vec2::ZERO)),
            jump_held: AtomicBool::new(false),
            accepting: AtomicBool::new(false),
        }
    }

    /// Start accepting writes
    pub fn open(&self) {
        self.accepting.store(true, Ordering::Release);
    }

    /// Stop accepting writes and drop any held input
    pub fn close(&self) {
        self.accepting.store(false, Ordering::Release);
        self.move_bits.store(pack(Vec2::ZERO), Ordering::Release);
        self.jump_held.store(false, Ordering::Release);
    }

    pub fn is_open(&self) -> bool {
        self.accepting.load(Ordering::Acquire)
    }

    /// Movement callback
    pub fn write_move(&self, axis: Vec2) {
        if self.is_open() {
            self.move_bits.store(pack(axis), Ordering::Release);
        }
    }

    /// Jump button callback
    pub fn write_jump(&self, held: bool) {
        if self.is_open() {
            self.jump_held.store(held, Ordering::Release);
        }
    }

    /// Read the current sample
    pub fn sample(&self) -> InputState {
        InputState {
            move_axis: unpack(self.move_bits.load(Ordering::Acquire)),
            jump_held: self.jump_held.load(Ordering::Acquire),
        }
    }
}

impl Default for InputLatch {
    fn default() -> Self {
        Self::new()
    }
}
