// Game-side logic built on the engine ports

pub mod characters;
