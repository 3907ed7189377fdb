//! Default configuration values

/// Declaration file evaluated in every participating directory
pub const DECLARATION_FILE: &str = "unit.toml";

/// Configuration fragment file name
pub const FRAGMENT_FILE: &str = "Kconfig";

/// Project marker and configuration file
pub const PROJECT_FILE: &str = "project.toml";

/// Reserved directory name of the entry-point unit
pub const ENTRY_POINT_NAME: &str = "main";

/// Build output directory (both project and SDK root)
pub const BUILD_DIR: &str = "build";

/// Components directory (both project and SDK root)
pub const COMPONENTS_DIR: &str = "components";

/// Boards directory under the SDK root
pub const BOARDS_DIR: &str = "boards";

/// Port directory under the SDK root
pub const PORT_DIR: &str = "port";

/// Plugin directory under the SDK root
pub const PLUGINS_DIR: &str = "plugins";

/// Project template under the SDK root
pub const TEMPLATE_DIR: &str = "templates/project";

/// Participation plan written to the project build directory
pub const BUILD_INFO_FILE: &str = "build_info.json";

/// Persisted manifest written to the project build directory
pub const MANIFEST_FILE: &str = "build_manifest.json";

/// Generated configuration source
pub const CONFIG_SOURCE_FILE: &str = "config.in";

/// Generated configuration header directory
pub const HEADER_DIR: &str = "header_config";

/// Generated configuration header file name
pub const HEADER_FILE: &str = "unitconfig.h";

/// Drift record written to the SDK root build directory
pub const DRIFT_RECORD_FILE: &str = "project_info.json";

/// Symbol values written by the configuration editor
pub const SYMBOL_FILE: &str = "unitconfig";

/// Default symbol values shipped by a project or target
pub const SYMBOL_DEFAULTS_FILE: &str = "unitconfig.defaults";

/// Prefix of configuration symbols
pub const SYMBOL_PREFIX: &str = "CONFIG_";

/// Target description file inside the target directory
pub const TARGET_DESCRIPTION_FILE: &str = "target.json";

/// Default source patterns when a declaration omits `sources`
pub const DEFAULT_SOURCE_PATTERN: &str = "*.c";

/// Default include directory when a declaration omits `include_dirs`
pub const DEFAULT_INCLUDE_DIR: &str = ".";

/// Version requested from the registry when none is given
pub const LATEST_VERSION: &str = "last";

/// Maximum number of download retry attempts
pub const MAX_DOWNLOAD_RETRIES: u32 = 3;
