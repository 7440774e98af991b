// Third-person locomotion controller: walking, jumping, slope sliding and
// wall-running over a rapier3d world

pub mod core;
pub mod engine;
pub mod game;
