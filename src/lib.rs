#[macro_use]
extern crate serde;

pub mod config;
pub mod error;
pub mod s3;
pub mod s3_constant;
pub mod s3_context;
pub mod s3_signer;
pub mod s3_string_to_sign;

pub use config::*;
pub use error::*;
pub use s3::*;
pub use s3_constant::*;
pub use s3_context::*;
pub use s3_signer::*;
pub use s3_string_to_sign::*;
