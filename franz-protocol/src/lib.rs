//! A crate containing all the shared Kafka protocol definitions.

pub mod api_keys;
pub mod batch;
pub mod codec;
pub mod error;
pub mod error_codes;
pub mod messages;
pub mod primitives;

mod primitives_prop_test;

pub use api_keys::*;
pub use codec::*;
pub use error::*;
pub use error_codes::*;
pub use messages::*;
pub use primitives::*;
