use std::sync::Arc;

use crate::auth::IdentityProvider;
use crate::planner::Planner;

#[derive(Clone)]
pub struct AppState {
    pub planner: Planner,
    pub identity: Arc<dyn IdentityProvider>,
}
