pub mod builder;
pub mod client;
pub mod descriptor;
pub mod executor;
pub mod hit_count;
pub mod memory;
pub mod transport;

pub use builder::page_count;
pub use client::*;
pub use descriptor::*;
pub use executor::*;
pub use memory::MemoryTransport;
pub use transport::*;
