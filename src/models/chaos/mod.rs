//! Chaotic systems: the double pendulum and the Lorenz attractor.
//!
//! Both decouple their integration step from the frame delta. The double
//! pendulum splits each frame into fixed sub-steps; the Lorenz flow always
//! advances at a constant fine step, a fixed number of times per frame.

mod double_pendulum;
mod lorenz;

pub use double_pendulum::DoublePendulum;
pub use lorenz::LorenzAttractor;
