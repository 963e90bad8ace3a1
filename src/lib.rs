//! A minimal S3-compatible object storage server backed by the local
//! filesystem.
//!
//! The crate provides three building blocks:
//!
//! + [`S3Service`]: SigV4 verification, request dispatch and XML rendering
//! + [`S3Storage`]: the storage abstraction consumed by the service
//! + [`storages::fs::FileSystem`]: the filesystem backend
//!
//! ```no_run
//! use s3_lite::storages::fs::FileSystem;
//! use s3_lite::{S3Service, SimpleAuth};
//!
//! # fn main() -> std::io::Result<()> {
//! let storage = FileSystem::new("./data")?;
//! let mut service = S3Service::new(storage);
//!
//! let mut auth = SimpleAuth::new();
//! auth.register("access".into(), "secret".into());
//! service.set_auth(auth);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![deny(
    missing_docs,
    missing_debug_implementations,
    clippy::all,
    clippy::pedantic
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::similar_names
)]
#![cfg_attr(test, allow(
    clippy::panic, // Panic when fatal failures occur
    clippy::unwrap_used, // Tests need `unwrap`
    clippy::indexing_slicing, // Fail fast
))]

#[macro_use]
pub(crate) mod utils;

mod auth;
mod chunked_stream;
mod errors;
mod ops;
mod output;
mod service;
mod storage;

pub use self::auth::{S3Auth, SimpleAuth};
pub use self::errors::{S3Error, S3ErrorCode, S3Result};
pub use self::output::S3Output;
pub use self::service::{S3Service, SharedS3Service};
pub use self::storage::S3Storage;

pub mod data_structures;
pub mod dto;
pub mod headers;
pub mod limits;
pub mod path;
pub mod query;
pub mod signature_v4;
pub mod storages;

pub(crate) use hyper::Body;

/// Request type
pub(crate) type Request = hyper::Request<Body>;

/// Response type
pub(crate) type Response = hyper::Response<Body>;

/// `Box<dyn std::error::Error + Send + Sync + 'static>`
pub(crate) type BoxStdError = Box<dyn std::error::Error + Send + Sync + 'static>;
