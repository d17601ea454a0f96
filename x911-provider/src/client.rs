//! 911 request client.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Result, X911Error};
use crate::request::X911Request;
use crate::traits::AccountExecutor;
use crate::types::{
    Action, Address911, Arguments, Collection, Did911, Environment, ResponseKind, Status911,
    ValidationStatus, ViLocation, X911Response,
};
use crate::utils::log_sanitizer::{describe_arguments, truncate_for_log};

/// Client settings that can be loaded from a caller's config file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientConfig {
    /// Environment the executor's account lives in. Defaults to production.
    #[serde(default)]
    pub environment: Environment,
}

/// Builds the 911 operations and hands them to an [`AccountExecutor`].
///
/// Every operation validates its input, refuses actions the configured
/// environment does not offer, and returns a fresh [`X911Outcome`]; the
/// client itself holds no per-call state and can be shared freely.
///
/// # Construction
///
/// ```rust,no_run
/// # use x911_provider::*;
/// # async fn example(executor: impl AccountExecutor) -> Result<()> {
/// let client = X911Client::builder(executor)
///     .environment(Environment::Production)
///     .build();
///
/// let outcome = client.get_locations("2065551234").await?;
/// for location in outcome.vi_locations() {
///     println!("{} {:?}", location.location_id, location.status);
/// }
/// # Ok(())
/// # }
/// ```
pub struct X911Client<E> {
    executor: E,
    environment: Environment,
}

/// Builder for [`X911Client`].
pub struct X911ClientBuilder<E> {
    executor: E,
    environment: Environment,
}

impl<E: AccountExecutor> X911ClientBuilder<E> {
    fn new(executor: E) -> Self {
        Self {
            executor,
            environment: Environment::default(),
        }
    }

    /// Set the environment (default: production).
    pub fn environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    /// Apply settings from a loaded [`ClientConfig`].
    pub fn config(self, config: &ClientConfig) -> Self {
        self.environment(config.environment)
    }

    pub fn build(self) -> X911Client<E> {
        X911Client {
            executor: self.executor,
            environment: self.environment,
        }
    }
}

impl<E: AccountExecutor> X911Client<E> {
    /// Creates a production client.
    pub fn new(executor: E) -> Self {
        Self::builder(executor).build()
    }

    pub fn builder(executor: E) -> X911ClientBuilder<E> {
        X911ClientBuilder::new(executor)
    }

    pub fn from_config(executor: E, config: &ClientConfig) -> Self {
        Self::builder(executor).config(config).build()
    }

    pub fn environment(&self) -> Environment {
        self.environment
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    /// Audit every 911 registration on the account.
    pub async fn audit_911(&self) -> Result<X911Outcome> {
        self.send(X911Request::audit_911()).await
    }

    /// List the locations held upstream for `did`.
    pub async fn get_locations(&self, did: &str) -> Result<X911Outcome> {
        self.send(X911Request::did_only(Action::GetLocations, did))
            .await
    }

    /// Current 911 registration of `did`.
    pub async fn query_911(&self, did: &str) -> Result<X911Outcome> {
        self.send(X911Request::did_only(Action::Query911, did)).await
    }

    /// Check that an address is valid for 911 service. Nothing is provisioned.
    ///
    /// Read the result with [`X911Outcome::x911_validation_status`].
    pub async fn validate_911(&self, address: &Address911) -> Result<X911Outcome> {
        self.send(X911Request::validate_911(address)).await
    }

    /// Provisioning history of `did`, as [`Status911`] entries.
    pub async fn get_provisioning_history(&self, did: &str) -> Result<X911Outcome> {
        self.send(X911Request::did_only(Action::GetProvisioningHistory, did))
            .await
    }

    /// Alert subscriptions for `tn`.
    pub async fn query_911_alert(&self, tn: &str) -> Result<X911Outcome> {
        self.send(X911Request::query_911_alert(tn)).await
    }

    /// Subscribe `email` to 911 call alerts for `tn`.
    pub async fn add_911_alert(&self, tn: &str, email: &str) -> Result<X911Outcome> {
        self.send(X911Request::add_911_alert(tn, email)).await
    }

    /// Make `location_id` the active 911 location of `did`.
    ///
    /// Only GEOCODED locations are accepted upstream.
    pub async fn provision_location(&self, did: &str, location_id: &str) -> Result<X911Outcome> {
        self.send(X911Request::provision_location(did, location_id))
            .await
    }

    /// Add a location for `did` without provisioning it.
    ///
    /// An address that fails geocoding is still stored upstream but is not
    /// returned in the response. The caller name replaces the caller name on
    /// every other location of the DID.
    pub async fn add_location(&self, did: &str, address: &Address911) -> Result<X911Outcome> {
        self.send(X911Request::did_with_address(
            Action::AddLocation,
            did,
            address,
        ))
        .await
    }

    /// Remove a location from `did`. INVALID locations are refused upstream.
    pub async fn remove_location(&self, location_id: &str, did: &str) -> Result<X911Outcome> {
        self.send(X911Request::remove_location(location_id, did))
            .await
    }

    /// Replace the 911 address of `did`.
    ///
    /// Invalid input clears the provisioned location of the DID upstream.
    pub async fn update_911(&self, did: &str, address: &Address911) -> Result<X911Outcome> {
        self.send(X911Request::did_with_address(
            Action::Update911,
            did,
            address,
        ))
        .await
    }

    /// Add and provision an address for `did` in one step.
    pub async fn insert_911(&self, did: &str, address: &Address911) -> Result<X911Outcome> {
        self.send(X911Request::did_with_address(
            Action::Insert911,
            did,
            address,
        ))
        .await
    }

    /// Drop the 911 registration of `did`.
    pub async fn remove_911(&self, did: &str) -> Result<X911Outcome> {
        self.send(X911Request::did_only(Action::Remove911, did)).await
    }

    /// Always fails with [`X911Error::NotImplemented`]; nothing is sent.
    pub async fn remove_911_alert(&self, _tn: &str, _email: &str) -> Result<X911Outcome> {
        let err = X911Error::NotImplemented {
            action: Action::Remove911Alert.to_string(),
        };
        log::warn!("{err}");
        Err(err)
    }

    /// Run an action from loosely typed arguments (e.g. decoded JSON).
    ///
    /// Arguments are validated by [`X911Request::from_values`] before anything
    /// reaches the executor.
    pub async fn call(
        &self,
        action: Action,
        values: &serde_json::Map<String, Value>,
    ) -> Result<X911Outcome> {
        let request = X911Request::from_values(action, values).inspect_err(|e| {
            log::warn!("{e}");
        })?;
        self.send(request).await
    }

    async fn send(&self, request: X911Request) -> Result<X911Outcome> {
        let action = request.action();

        if !self.environment.supports(action) {
            let err = X911Error::UnsupportedAction {
                action: action.to_string(),
                environment: self.environment.to_string(),
            };
            log::warn!("{err}");
            return Err(err);
        }

        log::debug!(
            "[{}] {action} {}",
            self.environment,
            describe_arguments(request.arguments())
        );

        let payload = self
            .executor
            .execute(action, ResponseKind::X911, request.arguments())
            .await
            .inspect_err(|e| {
                if e.is_expected() {
                    log::warn!("{e}");
                } else {
                    log::error!("{e}");
                }
            })?;

        let response = X911Response::from_payload(&payload).map_err(|e| {
            log::error!("[{action}] Response decode failed: {e}");
            log::error!(
                "[{action}] Raw payload: {}",
                truncate_for_log(&serde_json::to_string(&payload).unwrap_or_default())
            );
            X911Error::ParseError {
                action: action.to_string(),
                detail: e.to_string(),
            }
        })?;

        log::debug!(
            "[{action}] response_code={:?} dids_911={} vi_locations={} statuses={}",
            response.response_code,
            response.dids_911.as_ref().map_or(0, Collection::len),
            response.vi_locations.as_ref().map_or(0, Collection::len),
            response.statuses.as_ref().map_or(0, Collection::len),
        );

        Ok(X911Outcome { request, response })
    }
}

/// A sent request together with its decoded response.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct X911Outcome {
    request: X911Request,
    response: X911Response,
}

impl X911Outcome {
    pub fn action(&self) -> Action {
        self.request.action()
    }

    pub fn arguments(&self) -> &Arguments {
        self.request.arguments()
    }

    pub fn request(&self) -> &X911Request {
        &self.request
    }

    pub fn response(&self) -> &X911Response {
        &self.response
    }

    pub fn into_response(self) -> X911Response {
        self.response
    }

    /// Wrapper under the `dids_911` key, if the response had one.
    pub fn dids_911_list(&self) -> Option<&Collection<Did911>> {
        self.response.dids_911.as_ref()
    }

    pub fn dids_911(&self) -> &[Did911] {
        self.dids_911_list().map(Collection::collection).unwrap_or_default()
    }

    /// Wrapper under the `vi_locations` key, if the response had one.
    pub fn vi_locations_list(&self) -> Option<&Collection<ViLocation>> {
        self.response.vi_locations.as_ref()
    }

    pub fn vi_locations(&self) -> &[ViLocation] {
        self.vi_locations_list().map(Collection::collection).unwrap_or_default()
    }

    /// Wrapper under the `statuses` key, if the response had one.
    pub fn statuses_911_list(&self) -> Option<&Collection<Status911>> {
        self.response.statuses.as_ref()
    }

    pub fn statuses_911(&self) -> &[Status911] {
        self.statuses_911_list().map(Collection::collection).unwrap_or_default()
    }

    /// Typed `validate911` result; `Ok(None)` for codes other than 100/101.
    pub fn validation_status(&self) -> Result<Option<ValidationStatus>> {
        if self.action() != Action::Validate911 {
            return Err(X911Error::InvalidSequence {
                expected: Action::Validate911.to_string(),
                actual: self.action().to_string(),
            });
        }
        Ok(self
            .response
            .response_code
            .and_then(ValidationStatus::from_code))
    }

    /// Human-readable `validate911` result.
    pub fn x911_validation_status(&self) -> Result<Option<&'static str>> {
        Ok(self.validation_status()?.map(ValidationStatus::message))
    }
}
