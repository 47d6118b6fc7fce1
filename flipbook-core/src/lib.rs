use std::sync::Arc;

use twilight_http::Client;

use flipbook_utils::messenger::Messenger;

/// Shared application context passed into command handlers.
///
/// Cheap to clone because it only stores reference-counted shared state.
#[derive(Clone)]
pub struct Context {
    pub http: Arc<Client>,
    pub messenger: Arc<dyn Messenger>,
}

impl Context {
    /// Create a new application context.
    pub fn new(http: Arc<Client>, messenger: Arc<dyn Messenger>) -> Self {
        Self { http, messenger }
    }
}
