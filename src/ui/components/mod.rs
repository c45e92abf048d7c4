pub mod buttons;
pub mod status;

pub use buttons::*;
pub use status::*;
