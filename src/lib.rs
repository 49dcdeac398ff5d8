//! cardbridge library.
//!
//! Typed service contracts for image-occlusion notes and localisation,
//! an in-process binding ([`app::service::Backend`]) and an external RPC
//! binding ([`rpc::client::RpcClient`] talking to [`rpc::engine::RpcEngine`]).

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod config;
pub mod error;
pub mod i18n;
pub mod notes;
pub mod rpc;
pub mod services;

pub use error::{BackendError, Result};
pub use services::{I18nService, ImageOcclusionService};
