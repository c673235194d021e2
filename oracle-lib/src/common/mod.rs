//! # Common Module
//! Protocol constants and hashing primitives shared by the header chain
//! verification code.

pub mod constants;
pub mod hashes;
