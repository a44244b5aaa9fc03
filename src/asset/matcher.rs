use super::platform::{Arch, Os, PlatformRequest};

/// Case-insensitive substring test against a release asset file name.
///
/// Deliberately permissive: release naming conventions are not standardized
/// across projects, so over-matching is the accepted risk.
#[derive(Debug, Clone)]
pub struct Matcher {
    tokens: Vec<String>,
}

impl Matcher {
    pub fn new<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tokens: tokens.into_iter().map(|t| t.into().to_lowercase()).collect(),
        }
    }

    /// True when the name contains any of the matcher's tokens.
    pub fn matches(&self, name: &str) -> bool {
        let name = name.to_lowercase();
        self.tokens.iter().any(|token| name.contains(token))
    }
}

/// The OS and architecture matchers resolved for one request.
///
/// Derived per request from a [`PlatformRequest`] plus the client's
/// User-Agent string; borrows from the table it was resolved against.
#[derive(Debug, Clone, Copy)]
pub struct SelectionCriteria<'a> {
    pub os: &'a Matcher,
    pub arch: &'a Matcher,
}

impl SelectionCriteria<'_> {
    /// An asset qualifies only when its file name satisfies both matchers.
    pub fn qualifies(&self, file_name: &str) -> bool {
        self.os.matches(file_name) && self.arch.matches(file_name)
    }
}

/// The full set of platform matchers, built once at startup and shared
/// read-only across requests.
#[derive(Debug, Clone)]
pub struct MatcherTable {
    pub darwin: Matcher,
    pub linux: Matcher,
    pub windows: Matcher,
    pub x86_amd64: Matcher,
    pub arm64: Matcher,
}

impl Default for MatcherTable {
    fn default() -> Self {
        Self {
            darwin: Matcher::new(["darwin", "macintosh"]),
            linux: Matcher::new(["linux"]),
            windows: Matcher::new(["windows"]),
            x86_amd64: Matcher::new(["x86", "amd64"]),
            arm64: Matcher::new(["arm64", "aarch64"]),
        }
    }
}

impl MatcherTable {
    fn os_matcher(&self, os: Os) -> &Matcher {
        match os {
            Os::Darwin => &self.darwin,
            Os::Linux => &self.linux,
            Os::Windows => &self.windows,
        }
    }

    fn arch_matcher(&self, arch: Arch) -> &Matcher {
        match arch {
            Arch::X86Amd64 => &self.x86_amd64,
            Arch::Arm64 => &self.arm64,
        }
    }

    /// Resolve the matchers for a request.
    ///
    /// An explicit, recognized query value always wins. Otherwise the
    /// matchers are scanned in declaration order against `client_hint`
    /// (normally the User-Agent header) and the first match is taken.
    /// When nothing matches, the OS falls back to Linux and the
    /// architecture to x86/amd64. OS and architecture resolve
    /// independently.
    pub fn criteria<'a>(
        &'a self,
        request: &PlatformRequest,
        client_hint: &str,
    ) -> SelectionCriteria<'a> {
        let os = match request.os {
            Some(os) => self.os_matcher(os),
            None => [Os::Darwin, Os::Linux, Os::Windows]
                .iter()
                .map(|os| self.os_matcher(*os))
                .find(|matcher| matcher.matches(client_hint))
                .unwrap_or(&self.linux),
        };

        let arch = match request.arch {
            Some(arch) => self.arch_matcher(arch),
            None => [Arch::X86Amd64, Arch::Arm64]
                .iter()
                .map(|arch| self.arch_matcher(*arch))
                .find(|matcher| matcher.matches(client_hint))
                .unwrap_or(&self.x86_amd64),
        };

        SelectionCriteria { os, arch }
    }
}
