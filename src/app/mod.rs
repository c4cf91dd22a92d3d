//! Application state and main event loop.
//!
//! This module implements The Elm Architecture (TEA):
//! - [`Model`]: The complete application state
//! - [`Message`]: All possible events, actions and task completions
//! - [`update`]: Pure function for state transitions
//! - [`App::run`]: Main event loop with rendering
//!
//! Collaborator calls run on worker threads and come back as messages tagged
//! with the session that issued them.

mod effects;
mod event_loop;
mod input;
mod model;
mod tasks;
mod update;

pub use model::{DocumentSession, Focus, Model, Settings, ToastLevel, UploadPrompt};
pub use update::{Message, update};

use std::path::PathBuf;

use crate::document::DocumentHandle;
use crate::services::Services;

use tasks::TaskRunner;

/// Owns the collaborators and runs the event loop.
pub struct App {
    services: Services,
    settings: Settings,
    tasks: TaskRunner,
    initial_document: Option<DocumentHandle>,
    config_global_path: Option<PathBuf>,
    config_local_path: Option<PathBuf>,
}

impl App {
    /// Create an application talking to `services`.
    pub fn new(services: Services) -> Self {
        let settings = Settings {
            suggestion_service: services.suggestions.is_some(),
            answer_service: services.answers.is_some(),
            ..Settings::default()
        };
        Self {
            services,
            settings,
            tasks: TaskRunner::new(),
            initial_document: None,
            config_global_path: None,
            config_local_path: None,
        }
    }

    /// Set zoom, threshold and local markup.
    ///
    /// Which services exist is always taken from the services themselves.
    #[must_use]
    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = Settings {
            suggestion_service: self.services.suggestions.is_some(),
            answer_service: self.services.answers.is_some(),
            ..settings
        };
        self
    }

    /// Document opened at startup.
    #[must_use]
    pub fn with_document(mut self, handle: Option<DocumentHandle>) -> Self {
        self.initial_document = handle;
        self
    }

    /// Set config paths to show in help.
    #[must_use]
    pub fn with_config_paths(
        mut self,
        global_path: Option<PathBuf>,
        local_path: Option<PathBuf>,
    ) -> Self {
        self.config_global_path = global_path;
        self.config_local_path = local_path;
        self
    }

    pub const fn settings(&self) -> &Settings {
        &self.settings
    }
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("services", &self.services)
            .field("settings", &self.settings)
            .field("initial_document", &self.initial_document)
            .finish_non_exhaustive()
    }
}
