//! Field transformation for user import records.
//!
//! Reshapes validated flat rows (`personal_address_primary_city`,
//! `requestPreference_holdShelf`, ...) into the nested records accepted by
//! FOLIO's `/user-import`, pruning nulls and empty structures.
//!
//! The transformation is pure and order-preserving: the same frame always
//! yields byte-identical JSON.

mod error;
mod record;
mod transformer;

pub use error::{Result, TransformError};
pub use record::{UserRecord, prune};
pub use transformer::{transform, transform_with_schema};
