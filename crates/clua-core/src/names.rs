//! Well-known extensions and file names

/// Extension of Clua source files.
pub const SOURCE_EXTENSION: &str = ".clua";

/// Extension of structured documents (compiler data and project configs).
pub const DOCUMENT_EXTENSION: &str = ".yaml";

/// Per-directory project configuration, also the compiler's default configuration.
pub const CONFIG_FILENAME: &str = "clua.config.yaml";

/// Diagnostic message catalog bundled with the compiler
pub const DIAGNOSTIC_MESSAGES: &str = "diagnostic_messages.yaml";

/// Default compiler configuration
pub const DEFAULT_CONFIG: &str = CONFIG_FILENAME;

/// Token table bundled with the compiler
pub const TOKEN_TABLE: &str = "tokens.yaml";

/// Documents the loader expects to find in the compiler data directory.
pub const COMPILER_DATA_FILES: [&str; 3] = [DIAGNOSTIC_MESSAGES, DEFAULT_CONFIG, TOKEN_TABLE];
