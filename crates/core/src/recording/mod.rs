//! Build-time call recording
//!
//! A [`Recorder`] session hands out recording proxies for declared contracts;
//! calls issued on a proxy are validated and appended to the ledger of one
//! service-contract method instead of being executed.

pub mod ledger;
pub mod proxy;
pub mod recorder;
pub(crate) mod validate;

// Re-export commonly used types
pub use ledger::{Argument, MethodLedger, StoredCall};
pub use proxy::{CallOutcome, RecordingProxy};
pub use recorder::{MethodLedgerRef, Recorder};
