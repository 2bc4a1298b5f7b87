/// Error codes with category prefix
///
/// Categories:
/// - CFG: Missing or invalid options
/// - SRC: Source resolution (file, directory, URL)
/// - FMT: Manifest format errors
/// - CRT: Component creation errors
/// - IMP: Import run outcome
/// - NET: Network errors
/// - IO: File system operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Required option missing
    Cfg001,
    /// Module name cannot be mapped to a directory
    Cfg002,

    /// Source not found
    Src001,
    /// Source unreachable
    Src002,
    /// Source unreadable
    Src003,

    /// Manifest could not be parsed
    Fmt001,

    /// Component sink rejected the manifest
    Crt001,

    /// One or more manifests failed
    Imp001,
    /// Import cancelled
    Imp002,

    /// Connection failed
    Net001,

    /// File system error
    Io001,
}

impl ErrorCode {
    /// Returns the error code string (e.g., "SRC001")
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::Cfg001 => "CFG001",
            ErrorCode::Cfg002 => "CFG002",
            ErrorCode::Src001 => "SRC001",
            ErrorCode::Src002 => "SRC002",
            ErrorCode::Src003 => "SRC003",
            ErrorCode::Fmt001 => "FMT001",
            ErrorCode::Crt001 => "CRT001",
            ErrorCode::Imp001 => "IMP001",
            ErrorCode::Imp002 => "IMP002",
            ErrorCode::Net001 => "NET001",
            ErrorCode::Io001 => "IO001",
        }
    }

    /// Returns the general cause description
    pub fn cause(&self) -> &'static str {
        match self {
            ErrorCode::Cfg001 => "A required option was not provided",
            ErrorCode::Cfg002 => "Module names are dot-separated segments without path separators",
            ErrorCode::Src001 => "The import path does not exist",
            ErrorCode::Src002 => "The URL could not be fetched",
            ErrorCode::Src003 => "The import path exists but could not be read",
            ErrorCode::Fmt001 => "The manifest is not valid YAML or JSON text",
            ErrorCode::Crt001 => "The component could not be written to the application",
            ErrorCode::Imp001 => "Some manifests failed to import; the rest were created",
            ErrorCode::Imp002 => "The import was interrupted between manifests",
            ErrorCode::Net001 => "Unable to establish network connection to the server",
            ErrorCode::Io001 => "A file system operation failed",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
