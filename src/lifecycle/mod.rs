//! Lifecycle management for background tasks.
//!
//! # Data Flow
//! ```text
//! Startup:
//!     Load config → build limiters → spawn sweepers (each subscribes)
//!
//! Shutdown:
//!     trigger() → sweepers leave their loops → handles complete
//! ```

pub mod shutdown;
pub mod startup;

pub use shutdown::Shutdown;
pub use startup::ShieldRuntime;
