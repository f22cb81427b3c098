//! The FIFO peripheral under synthesis: its address map, the golden
//! reference simulator, and the declared abstraction.

pub mod defs;
pub mod model;
pub mod sim;

pub use model::{build, FifoIla};
pub use sim::FifoSim;
