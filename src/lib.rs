//! Kraken REST response decoding and order construction.
//!
//! Provides typed decoders for the Kraken Spot REST API's heterogeneous
//! JSON (positional tuples, cursor-paged series, sparse objects) and a
//! validating builder for single- and multi-leg order submissions. HTTP
//! transport and request signing live outside this crate: callers hand in
//! raw response text and receive parameter maps ready for posting.

pub mod batch;
pub mod error;
pub mod format;
pub mod json;
pub mod models;
pub mod wallet;

pub use batch::{OrderBatchList, OrderLeg, ParamMap};
pub use error::{KervielError, Result};
pub use models::KrakenResponse;
pub use wallet::{BalanceAsset, Wallet};
