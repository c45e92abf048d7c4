pub mod events;
pub mod materials;
pub mod physics;
pub mod sandbox;
pub mod spawn;
pub mod time;

pub use events::{Collision, CollisionListener};
pub use physics::PhysicsWorld;
pub use sandbox::{BoxPair, Sandbox};
pub use spawn::{BoxSpec, SpawnArea};
pub use time::{FixedTimestep, FrameClock, FrameTime};
