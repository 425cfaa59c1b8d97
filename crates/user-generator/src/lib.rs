//! Fake user generator for the user-sync bulk loader.
//!
//! This crate provides the `UserGenerator` which produces deterministic
//! synthetic users. Each record is a pure function of the seed and its
//! logical index, so the loaded data does not depend on how the index space
//! is split between workers.
//!
//! # Architecture
//!
//! ```text
//!   seed + start index
//!          │
//!          ▼
//! ┌─────────────────┐
//! │  UserGenerator  │
//! │                 │
//! │  - seed         │
//! │  - index        │
//! │  - StdRng/index │
//! └────────┬────────┘
//!          │
//!          ▼
//!    UserRecord { first_name, last_name, email, address }
//! ```
//!
//! # Example
//!
//! ```rust
//! use user_generator::UserGenerator;
//!
//! let mut generator = UserGenerator::new(42).with_start_index(1_000);
//! let user = generator.next_user();
//! assert!(user.email.contains("1000@"));
//! ```

pub mod generator;
pub mod generators;

pub use generator::{UserGenerator, UserIterator};
