//! Translation between [`ApplicationState`](crate::domain::ApplicationState)
//! and the three stored tables.
//!
//! Both directions are pure: the dispatcher does the store I/O and hands
//! whole tables to and from this module.

mod decode;
mod encode;
pub mod master_key;

pub use decode::{DecodeReport, FieldDecodeError, TableSnapshot, decode_state};
pub use encode::{EncodedState, encode_state};
