//! Shared User-Agent strings for harvest and download HTTP clients.
//!
//! Single source for project URL and UA format so harvest and download
//! traffic stay consistent and easy to update (good citizenship; RFC 9308).

/// Project URL for User-Agent identification (good citizenship; RFC 9308).
const PROJECT_UA_URL: &str = "https://github.com/fierce/harvester";

/// Browser User-Agent used for artifact downloads and resolver secondary
/// fetches. Document origins (notably OJS installs) reject default library
/// clients, so these requests identify as a mainstream browser.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

/// Default User-Agent for harvest page requests (identifies the tool).
#[must_use]
pub(crate) fn default_harvest_user_agent() -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!("harvester/{version} (academic-research-tool; +{PROJECT_UA_URL})")
}
