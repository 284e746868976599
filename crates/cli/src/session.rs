//! Everything a command needs to talk to the backend.

use std::sync::Arc;

use forkful_client::{
    ClientConfig, ConfiguredCredentials, MyRestaurantApi, MyUserApi, RequestExecutor,
    RestaurantSearchApi,
};

use crate::commands::CliError;
use crate::effects::TerminalEffects;
use crate::render::Format;

pub type Credentials = ConfiguredCredentials;

/// Backend operations wired to terminal effects.
pub struct Session {
    pub config: ClientConfig,
    pub format: Format,
    pub effects: Arc<TerminalEffects>,
    pub executor: RequestExecutor<Credentials>,
    pub users: Arc<MyUserApi<Credentials, TerminalEffects>>,
    pub restaurants: MyRestaurantApi<Credentials, TerminalEffects>,
    pub search: RestaurantSearchApi<Credentials, TerminalEffects>,
}

impl Session {
    /// Build a session using the provider selected by configuration.
    ///
    /// # Errors
    ///
    /// Returns `CliError` if the credential provider or HTTP client cannot be
    /// built.
    pub fn from_config(config: ClientConfig, format: Format) -> Result<Self, CliError> {
        let credentials = ConfiguredCredentials::from_config(&config)?;
        Self::with_credentials(config, credentials, format)
    }

    /// Build a session around an explicit provider.
    ///
    /// # Errors
    ///
    /// Returns `CliError::Http` if the HTTP client cannot be built.
    pub fn with_credentials(
        config: ClientConfig,
        credentials: Credentials,
        format: Format,
    ) -> Result<Self, CliError> {
        let effects = Arc::new(TerminalEffects::default());
        let executor = RequestExecutor::new(&config, credentials)?;

        Ok(Self {
            format,
            users: Arc::new(MyUserApi::new(executor.clone(), Arc::clone(&effects))),
            restaurants: MyRestaurantApi::new(executor.clone(), Arc::clone(&effects)),
            search: RestaurantSearchApi::new(executor.clone(), Arc::clone(&effects)),
            executor,
            effects,
            config,
        })
    }
}
