//! HTTP inbound adapter exposing the users REST API and the front-end.

pub mod assets;
pub mod error;
pub mod schemas;
pub mod state;
pub mod users;
pub mod validation;

pub use error::ApiResult;
