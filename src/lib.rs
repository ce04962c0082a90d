//! Credentialed Sellsy v2 API client.
//!
//! [`SellsyClient`] exchanges client credentials for a bearer token, refreshes it lazily when it
//! expires, picks the request content type per endpoint, and retries transient failures with
//! exponential backoff. Lower-level pieces ([`auth::TokenManager`], [`executor::RequestExecutor`],
//! [`transport::HttpTransport`]) are public for embedders that need their own wiring.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod executor;
pub mod obs;
pub mod retry;
pub mod transport;

pub use client::SellsyClient;
pub use executor::{ApiRequest, QueryParams, RequestBody, ResponseMode};

mod _prelude {
	pub use std::{
		collections::BTreeMap,
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		sync::Arc,
		time::Duration as StdDuration,
	};

	pub use async_lock::Mutex as AsyncMutex;
	pub use parking_lot::RwLock;
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use serde_json::Value;
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use tokio_util::sync::CancellationToken;
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

pub use reqwest;
pub use tokio_util::sync::CancellationToken;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _};
