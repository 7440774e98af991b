// Input plumbing between the host's event pump and the simulation
//
// ## Architecture
//
// - `action`: input events, the `InputSource` subscription trait and an
//   in-process hub implementing it
// - `latch`: single-slot, last-write-wins store sampled once per tick
//
// ## Usage Example
//
// ```rust
// use std::sync::Arc;
// use wallrunner::engine::input::{InputHub, InputLatch, InputSource};
//
// let mut hub = InputHub::new();
// let latch = Arc::new(InputLatch::new());
// latch.open();
// hub.subscribe(Arc::clone(&latch));
//
// // From the event pump
// hub.push_jump(true);
//
// // Once per tick
// assert!(latch.sample().jump_held);
// ```

pub mod action;
pub mod latch;

// Re-export commonly used types
pub use action::{InputEvent, InputHub, InputSource, SubscriptionId};
pub use latch::{InputLatch, InputState};
