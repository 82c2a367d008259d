//! Contact directory data model.
//! - `Contact` is the record every storage backend persists.
//! - `EditContact` is its partial-update counterpart.
//! - Field validation rules shared by the HTTP layer.

pub mod errors;
pub mod contact;
pub mod validation;

pub use contact::{Contact, EditContact, FilterRequest};
