//! # x911-provider
//!
//! Typed request builder for the emergency-services (911) operations of a
//! SOAP telecom back-office API: address validation, location management,
//! provisioning and lookup for telephone numbers (DIDs).
//!
//! The crate validates arguments, assembles the action id and argument set,
//! and hands both to an [`AccountExecutor`] you provide. The executor owns
//! SOAP serialization, transport, authentication and retry; this crate owns
//! the per-action contract and decodes the returned payload into typed
//! records once.
//!
//! ## Supported Actions
//!
//! | Method | Action id | Arguments |
//! |--------|-----------|-----------|
//! | [`audit_911`](X911Client::audit_911) | `audit911` | — |
//! | [`get_locations`](X911Client::get_locations) | `get_locations` | `did` |
//! | [`query_911`](X911Client::query_911) | `query911` | `did` |
//! | [`validate_911`](X911Client::validate_911) | `validate911` | address |
//! | [`get_provisioning_history`](X911Client::get_provisioning_history) | `get_provisioning_history` | `did` |
//! | [`query_911_alert`](X911Client::query_911_alert) | `query911_alert` | `tn` |
//! | [`add_911_alert`](X911Client::add_911_alert) | `add911_alert` | `tn`, `email` |
//! | [`provision_location`](X911Client::provision_location) | `provision_location` | `did`, `location_id` |
//! | [`add_location`](X911Client::add_location) | `add_location` | `did` + address |
//! | [`remove_location`](X911Client::remove_location) | `remove_location` | `location_id`, `did` |
//! | [`update_911`](X911Client::update_911) | `update911` | `did` + address |
//! | [`insert_911`](X911Client::insert_911) | `insert911` | `did` + address |
//! | [`remove_911`](X911Client::remove_911) | `remove911` | `did` |
//! | [`remove_911_alert`](X911Client::remove_911_alert) | `remove911_alert` | not implemented |
//!
//! "address" is the seven fields of [`Address911`]: `address1`, `address2`,
//! `city`, `state`, `zip`, `plus_four`, `caller_name`.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use x911_provider::{Address911, AccountExecutor, X911Client};
//!
//! async fn register(executor: impl AccountExecutor) -> x911_provider::Result<()> {
//!     let client = X911Client::new(executor);
//!
//!     let address = Address911 {
//!         address1: "400 Broad St".to_string(),
//!         city: "Seattle".to_string(),
//!         state: "WA".to_string(),
//!         zip: "98109".to_string(),
//!         caller_name: "Space Needle".to_string(),
//!         ..Address911::default()
//!     };
//!
//!     // 1. Check the address
//!     let checked = client.validate_911(&address).await?;
//!     println!("{:?}", checked.x911_validation_status()?);
//!
//!     // 2. Register and provision it
//!     client.insert_911("2065551234", &address).await?;
//!
//!     // 3. Read it back
//!     for record in client.query_911("2065551234").await?.dids_911() {
//!         println!("{} -> {}, {}", record.did, record.address1, record.city);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! All operations return [`Result<T, X911Error>`](X911Error). Validation,
//! unimplemented actions and environment checks fail before the executor is
//! called; executor failures are passed through unchanged.

mod client;
mod error;
mod request;
mod traits;
mod types;
mod utils;

pub use client::{ClientConfig, X911Client, X911ClientBuilder, X911Outcome};

pub use error::{Result, X911Error};

pub use request::X911Request;

pub use traits::AccountExecutor;

pub use types::{
    Action, Address911, Arguments, Collection, Did911, Environment, LocationStatus,
    ResponseKind, ResponsePayload, Status911, ValidationStatus, ViLocation, X911Response,
};

pub use utils::datetime;
