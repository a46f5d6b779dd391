//! Application state module

use std::{fmt, sync::Arc};

use crate::domain::communication::{dispatcher::EmailDispatcher, mailer::Mailer};

/// Global application state
#[derive(Clone)]
pub struct AppState<M: Mailer> {
    /// Email dispatcher
    pub dispatcher: Arc<EmailDispatcher<M>>,
}

/// Implementation of the application state
impl<M: Mailer> AppState<M> {
    /// Create a new application state
    pub fn new(dispatcher: EmailDispatcher<M>) -> Self {
        Self {
            dispatcher: Arc::new(dispatcher),
        }
    }
}

impl<M: Mailer> fmt::Debug for AppState<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("dispatcher", &"EmailDispatcher")
            .finish()
    }
}
