//! Service clients used by route handlers.

pub mod email;
pub mod storage;
