use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum AppError {
    #[error("Invalid date \"{input}\" (expected YYYY-MM-DD, YYYYMMDD or e.g. \"December 31, 2024\")")]
    InvalidDate { input: String },

    #[error("Invalid timezone: {input}")]
    InvalidTimezone { input: String },

    #[error("Unsupported locale: {input}")]
    UnsupportedLocale { input: String },

    #[error("Invalid delimiter \"{input}\" (expected a single ASCII character)")]
    InvalidDelimiter { input: String },

    #[error("Malformed input: {reason}")]
    MalformedInput { reason: String },

    #[error("Invalid table name \"{name}\"")]
    InvalidTable { name: String },

    #[error("Invalid file pattern \"{pattern}\": {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("No order source given. Use --input, --rows, --url or --database.")]
    NoSource,

    #[error("import needs a destination: pass --database PATH")]
    MissingDestination,

    #[error("--{format} output is not available for `{command}`")]
    UnsupportedOutput {
        format: &'static str,
        command: &'static str,
    },

    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("HTTP request failed: {0}")]
    Http(#[from] ureq::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_error_display_date() {
        let e = AppError::InvalidDate {
            input: "abc".to_string(),
        };
        assert_eq!(
            e.to_string(),
            r#"Invalid date "abc" (expected YYYY-MM-DD, YYYYMMDD or e.g. "December 31, 2024")"#
        );
    }

    #[test]
    fn app_error_display_timezone() {
        let e = AppError::InvalidTimezone {
            input: "Mars/Olympus".to_string(),
        };
        assert_eq!(e.to_string(), "Invalid timezone: Mars/Olympus");
    }

    #[test]
    fn app_error_display_malformed() {
        let e = AppError::MalformedInput {
            reason: "expected an array".to_string(),
        };
        assert_eq!(e.to_string(), "Malformed input: expected an array");
    }

    #[test]
    fn app_error_display_io() {
        let e = AppError::Io {
            path: "orders.csv".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        };
        assert_eq!(e.to_string(), "Failed to read orders.csv: missing");
    }

    #[test]
    fn app_error_display_unsupported_output() {
        let e = AppError::UnsupportedOutput {
            format: "csv",
            command: "summary",
        };
        assert_eq!(e.to_string(), "--csv output is not available for `summary`");
    }

    #[test]
    fn app_error_from_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let app: AppError = json_err.into();
        assert!(app.to_string().starts_with("JSON error:"));
    }
}
