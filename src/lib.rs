//! Request/response contract for managed disks and service accounts
//!
//! Every request type validates itself through [`Validate`] before it is
//! handed to a backend, and every result type can describe itself as a
//! [`Table`] for terminal display.
//!
//! # Module Structure
//!
//! - [`constants`] - Name bounds, disk size ceiling and syntax patterns
//! - [`types`] - `Id`, `Status`, `Empty` and age formatting
//! - [`validator`] - Rule accumulator and the `Validate` trait
//! - [`disk`] - Disk requests and results
//! - [`service_account`] - Service-account and key requests and results
//! - [`table`] - Tabular rendering
//! - [`rpc`] - Backend traits, `Context` and the validating `Client`

pub mod constants;
pub mod disk;
pub mod error;
pub mod rpc;
pub mod service_account;
pub mod table;
pub mod types;
pub mod validator;

pub use error::{Error, Result};
pub use table::Table;
pub use types::{age, Empty, Id, Status};
pub use validator::Validate;
