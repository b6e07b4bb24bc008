//! Application constants for the weather index
//!
//! Valid reading ranges, the numeric encodings of missing readings, the
//! county table and default values used throughout the crate. The ranges are
//! part of the public contract: any external format that has to encode a
//! missing reading as a number uses the `MISSING` values below.

// =============================================================================
// Reading Ranges
// =============================================================================

/// Temperature limits in degrees Celsius
pub mod temperature {
    /// Lowest temperature accepted as a real reading
    pub const VALID_MIN: f64 = -90.0;

    /// Highest temperature accepted as a real reading
    pub const VALID_MAX: f64 = 60.0;

    /// Numeric encoding of "not recorded" (one past the valid maximum)
    pub const MISSING: f64 = VALID_MAX + 1.0;

    /// Check whether a raw temperature is a real reading
    pub fn is_valid(value: f64) -> bool {
        (VALID_MIN..=VALID_MAX).contains(&value)
    }
}

/// Precipitation limits in millimetres
pub mod precipitation {
    /// Lowest precipitation accepted as a real reading
    pub const VALID_MIN: f64 = 0.0;

    /// Highest precipitation accepted as a real reading
    pub const VALID_MAX: f64 = 2000.0;

    /// Numeric encoding of "not recorded"
    pub const MISSING: f64 = -1.0;

    /// Check whether a raw precipitation amount is a real reading
    pub fn is_valid(value: f64) -> bool {
        (VALID_MIN..=VALID_MAX).contains(&value)
    }
}

// =============================================================================
// Calendar
// =============================================================================

/// Earliest year offered to callers choosing a period
pub const FIRST_YEAR: i32 = 1900;

/// Date format used for input files and CLI arguments
pub const DATE_FORMAT: &str = "%Y-%m-%d";

// =============================================================================
// Counties
// =============================================================================

/// County codes and names (Statistics Norway county numbers)
pub mod counties {
    /// All known counties as (code, name) pairs, ordered by code
    pub const ALL: &[(u32, &str)] = &[
        (1, "Østfold"),
        (2, "Akershus"),
        (3, "Oslo"),
        (4, "Hedmark"),
        (5, "Oppland"),
        (6, "Buskerud"),
        (7, "Vestfold"),
        (8, "Telemark"),
        (9, "Aust-Agder"),
        (10, "Vest-Agder"),
        (11, "Rogaland"),
        (12, "Hordaland"),
        (14, "Sogn og Fjordane"),
        (15, "Møre og Romsdal"),
        (16, "Sør-Trøndelag"),
        (17, "Nord-Trøndelag"),
        (18, "Nordland"),
        (19, "Troms"),
        (20, "Finnmark"),
    ];

    /// Look up a county name by code
    pub fn name(code: u32) -> Option<&'static str> {
        ALL.binary_search_by_key(&code, |&(c, _)| c)
            .ok()
            .map(|index| ALL[index].1)
    }
}

// =============================================================================
// Configuration Defaults
// =============================================================================

/// Environment variable overriding the dataset path
pub const DATA_PATH_ENV: &str = "WEATHER_INDEX_DATA";

/// Directory name under the user config directory
pub const CONFIG_DIR_NAME: &str = "weather-index";

/// Configuration file name
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Default field delimiter for input files
pub const DEFAULT_DELIMITER: char = ',';

/// Default number of decimals when printing readings
pub const DEFAULT_DECIMALS: usize = 1;

/// Upper bound for configured decimals
pub const MAX_DECIMALS: usize = 6;

/// Default log level
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Accepted log levels
pub const LOG_LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace"];
