use std::sync::Arc;

use contextor::Responder;

/// Shared state for all HTTP handlers. Built once at startup.
#[derive(Clone, Debug)]
pub struct AppState {
    /// Question answering over the startup index.
    pub responder: Arc<Responder>,
}

impl AppState {
    pub fn new(responder: Responder) -> Self {
        Self {
            responder: Arc::new(responder),
        }
    }
}
