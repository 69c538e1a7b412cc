//! Services layer (ports + adapters).
//!
//! - `ports`: pure contracts/types used across the app (kernel-facing).
//! - `adapters`: OS/runtime specific implementations (IO/async).
//! - `bus`: completion messages from the host back to the kernel.

pub mod adapters;
pub mod bus;
pub mod ports;

pub use bus::{host_bus, HostBusReceiver, HostBusSender, HostMessage};
