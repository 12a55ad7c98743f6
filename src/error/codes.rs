/// Error code registry for orderfeed
///
/// Error codes are organized by category:
/// - 1000-1999: Configuration errors
/// - 2000-2999: Input (read/decode) errors
/// - 3000-3999: Output (write) errors
/// - 4000-4999: Data integrity errors
/// - 7000-7999: Validation errors
#[allow(dead_code)]
pub struct ErrorCode;

impl ErrorCode {
    // Configuration errors (1000-1999)
    pub const CONFIG_GENERIC: u16 = 1000;
    pub const CONFIG_NOT_FOUND: u16 = 1001;
    pub const CONFIG_INVALID_JSON: u16 = 1003;
    pub const CONFIG_INVALID_VALUE: u16 = 1005;

    // Input errors (2000-2999)
    pub const INPUT_GENERIC: u16 = 2000;
    pub const INPUT_NOT_FOUND: u16 = 2001;
    pub const INPUT_READ_FAILED: u16 = 2002;
    pub const INPUT_INVALID_CSV: u16 = 2003;
    pub const INPUT_INVALID_JSON: u16 = 2004;
    pub const INPUT_MISSING_SECTION: u16 = 2005;
    pub const INPUT_UNSUPPORTED_FORMAT: u16 = 2006;

    // Output errors (3000-3999)
    pub const OUTPUT_GENERIC: u16 = 3000;
    pub const OUTPUT_WRITE_FAILED: u16 = 3001;
    pub const OUTPUT_PERMISSION_DENIED: u16 = 3002;
    pub const OUTPUT_SERIALIZATION_ERROR: u16 = 3003;

    // Integrity errors (4000-4999)
    pub const INTEGRITY_GENERIC: u16 = 4000;
    pub const INTEGRITY_ROWS_LOST: u16 = 4001;
    pub const INTEGRITY_ROWS_DUPLICATED: u16 = 4002;
    pub const INTEGRITY_DUPLICATE_JOIN_KEY: u16 = 4003;

    // Validation errors (7000-7999)
    pub const VALIDATION_GENERIC: u16 = 7000;
    pub const VALIDATION_REQUIRED_FIELD: u16 = 7001;
    pub const VALIDATION_INVALID_FORMAT: u16 = 7005;
}

/// Get a human-readable description for an error code
pub fn describe_error_code(code: u16) -> &'static str {
    match code {
        // Configuration errors
        1000 => "Generic configuration error",
        1001 => "Configuration file not found",
        1003 => "Invalid JSON syntax in configuration",
        1005 => "Invalid value in configuration",

        // Input errors
        2000 => "Generic input error",
        2001 => "Input file not found",
        2002 => "Failed to read input file",
        2003 => "Malformed CSV input",
        2004 => "Malformed JSON input",
        2005 => "Expected section missing from input document",
        2006 => "Unsupported input format",

        // Output errors
        3000 => "Generic output error",
        3001 => "Failed to write output file",
        3002 => "Permission denied writing output",
        3003 => "Failed to serialize output table",

        // Integrity errors
        4000 => "Generic data integrity error",
        4001 => "Rows were lost during a stage",
        4002 => "Rows were duplicated during a stage",
        4003 => "Join key is not unique",

        // Validation errors
        7000 => "Generic validation error",
        7001 => "Required field is missing",
        7005 => "Invalid format",

        _ => "Unknown error code",
    }
}
