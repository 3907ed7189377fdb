//! Registry URLs

/// Component registry base URL
pub const COMPONENT_REGISTRY: &str = "https://registry.unitbuild.dev";

/// Search endpoint, relative to the registry base
pub const SEARCH_PATH: &str = "api/component/search";

/// Download endpoint, relative to the registry base
pub const DOWNLOAD_PATH: &str = "api/component/download";
