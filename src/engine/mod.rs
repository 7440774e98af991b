// Engine modules: ports, physics, input, frame pacing, camera

pub mod camera;
#[cfg(test)]
pub(crate) mod fakes;
pub mod game_loop;
pub mod input;
pub mod physics;
pub mod ports;
