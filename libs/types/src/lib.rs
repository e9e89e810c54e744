//! Types library for the threshold custody contracts
//!
//! Identity and quantity types shared by every contract module. These are
//! frozen: changing their serialized form breaks persisted snapshots.
//!
//! # Modules
//! - `ids`: Account identities (`Address`) and execution receipts (`ExecutionId`)
//! - `numeric`: Non-negative quantities (`Amount`)

pub mod ids;
pub mod numeric;

// Library version constant
pub const LIB_VERSION: &str = "1.0.0";

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::ids::*;
    pub use crate::numeric::*;
}
