use std::sync::Arc;

use configs::ImagingConfig;
use service::choices::ChoiceSource;
use service::form_service::FormService;

/// Shared handler state: one form service over whichever choice source
/// the process was started with.
#[derive(Clone)]
pub struct ServerState {
    pub forms: Arc<FormService<dyn ChoiceSource>>,
}

impl ServerState {
    pub fn new(source: Arc<dyn ChoiceSource>, imaging: ImagingConfig) -> Self {
        Self { forms: Arc::new(FormService::new(source, imaging)) }
    }
}
