//! Signal processing for the sampling demo and the Hilbert sigmoid plot.
//!
//! Everything here is a pure recomputation over small buffers. The same
//! code serves the browser (via WASM) and native tests.

pub mod sampling;
pub mod signum;
pub mod sinc;
