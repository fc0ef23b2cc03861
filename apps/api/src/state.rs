use crate::config::Config;
use crate::ndaq_client::NdaqClient;

/// Shared application state injected into all route handlers via Axum
/// extractors. Read-only for the process lifetime; requests share nothing
/// else.
#[derive(Clone)]
pub struct AppState {
    pub ndaq: NdaqClient,
    pub config: Config,
}
