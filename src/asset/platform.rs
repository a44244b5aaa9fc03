/// Operating system variants a download request can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Os {
    Darwin,
    Linux,
    Windows,
}

impl Os {
    /// Parse the `os` query parameter.
    ///
    /// Unrecognized values are ignored (treated as absent), never an error.
    pub fn parse_param(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "darwin" => Some(Os::Darwin),
            "linux" => Some(Os::Linux),
            "windows" => Some(Os::Windows),
            _ => None,
        }
    }
}

/// CPU architecture variants a download request can target.
///
/// `amd64` and `x86` select the same matcher; release naming rarely
/// distinguishes them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arch {
    X86Amd64,
    Arm64,
}

impl Arch {
    /// Parse the `arch` query parameter. Unrecognized values are ignored.
    pub fn parse_param(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "amd64" | "x86" => Some(Arch::X86Amd64),
            "arm64" => Some(Arch::Arm64),
            _ => None,
        }
    }
}

/// Platform options supplied to the download endpoint, built once from the
/// request's query parameters and immutable afterward.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlatformRequest {
    pub os: Option<Os>,
    pub arch: Option<Arch>,
    pub uncompress: bool,
}

impl PlatformRequest {
    pub fn from_params(os: Option<&str>, arch: Option<&str>, uncompress: Option<&str>) -> Self {
        Self {
            os: os.and_then(Os::parse_param),
            arch: arch.and_then(Arch::parse_param),
            uncompress: uncompress.and_then(parse_bool_param).unwrap_or(false),
        }
    }
}

/// Parse a boolean query parameter the way Go's `strconv.ParseBool` does;
/// invalid values leave the flag unset rather than failing the request.
fn parse_bool_param(value: &str) -> Option<bool> {
    match value {
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Some(true),
        "0" | "f" | "F" | "false" | "FALSE" | "False" => Some(false),
        _ => None,
    }
}
