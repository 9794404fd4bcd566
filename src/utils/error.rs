use thiserror::Error;

#[derive(Error, Debug)]
pub enum PackagerError {
    #[error("Unknown package template: {id}")]
    UnknownTemplate { id: String },

    #[error("Unknown service: {id}")]
    UnknownService { id: String },

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("Package not found: {id}")]
    PackageNotFound { id: String },

    #[error("Circular service dependency: {}", cycle.join(" -> "))]
    CyclicDependency { cycle: Vec<String> },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("CSV export error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),
}

pub type Result<T> = std::result::Result<T, PackagerError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// 呼叫端提供的參數有誤
    Input,
    /// 目錄或設定檔有誤
    Configuration,
    /// 找不到指定的資源
    Lookup,
    /// 檔案系統或輸出失敗
    Io,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl PackagerError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidInput { .. } => ErrorCategory::Input,
            Self::UnknownTemplate { .. }
            | Self::UnknownService { .. }
            | Self::PackageNotFound { .. } => ErrorCategory::Lookup,
            Self::CyclicDependency { .. }
            | Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => ErrorCategory::Configuration,
            Self::IoError(_)
            | Self::SerializationError(_)
            | Self::CsvError(_)
            | Self::ZipError(_) => ErrorCategory::Io,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Input | ErrorCategory::Lookup => ErrorSeverity::Medium,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Io => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            Self::UnknownTemplate { .. } => {
                "Run with --list to see the templates defined in the catalog".to_string()
            }
            Self::UnknownService { .. } => {
                "Run with --list to see the services defined in the catalog".to_string()
            }
            Self::InvalidInput { .. } => {
                "Check the template and the --services list passed on the command line".to_string()
            }
            Self::PackageNotFound { .. } => {
                "Create the package first; proposals only exist for packages built in this process"
                    .to_string()
            }
            Self::CyclicDependency { .. } => {
                "Remove one of the dependencies in the cycle from the catalog".to_string()
            }
            Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => {
                "Fix the catalog file and run again".to_string()
            }
            Self::IoError(_) | Self::ZipError(_) => {
                "Check that the output path exists and is writable".to_string()
            }
            Self::SerializationError(_) | Self::CsvError(_) => {
                "Report this as a bug; the package could not be serialized".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Input => format!("The request was rejected: {}", self),
            ErrorCategory::Lookup => format!("Nothing matched the request: {}", self),
            ErrorCategory::Configuration => format!("The catalog is not usable: {}", self),
            ErrorCategory::Io => format!("Could not write the results: {}", self),
        }
    }
}
