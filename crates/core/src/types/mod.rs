//! Shared type definitions.

pub mod asset;
pub mod id;
pub mod money;
pub mod order;
pub mod product;

pub use asset::*;
pub use id::*;
pub use money::*;
pub use order::*;
pub use product::*;
