//! Response types (Serialize)

use inner_map_service::JourneySnapshot;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct StateResponse {
    /// True while a question fetch or synthesis holds the journey; the
    /// snapshot is left out until it finishes.
    pub busy: bool,
    #[serde(flatten)]
    pub journey: Option<JourneySnapshot>,
}

#[derive(Debug, Serialize)]
#[non_exhaustive]
pub struct VersionResponse {
    pub version: &'static str,
}
