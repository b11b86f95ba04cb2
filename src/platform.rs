use std::fmt;

/// Operating system family this binary was compiled for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Os {
    MacOS,
    Linux,
    Windows,
    FreeBsd,
    OpenBsd,
    NetBsd,
    Other,
}

impl Os {
    pub fn detect() -> Os {
        Os::from_rust_os(std::env::consts::OS)
    }

    pub fn from_rust_os(os: &str) -> Os {
        match os {
            "macos" => Os::MacOS,
            "linux" | "android" => Os::Linux,
            "windows" => Os::Windows,
            "freebsd" => Os::FreeBsd,
            "openbsd" => Os::OpenBsd,
            "netbsd" => Os::NetBsd,
            _ => Os::Other,
        }
    }

    pub fn is_windows(self) -> bool {
        matches!(self, Os::Windows)
    }

    /// Name reported when the kernel cannot be queried.
    pub fn fallback_name(self) -> &'static str {
        match self {
            Os::MacOS => "Mac OS X",
            Os::Linux => "Linux",
            Os::Windows => "Windows",
            Os::FreeBsd => "FreeBSD",
            Os::OpenBsd => "OpenBSD",
            Os::NetBsd => "NetBSD",
            Os::Other => std::env::consts::OS,
        }
    }

    pub fn file_separator(self) -> &'static str {
        if self.is_windows() {
            "\\"
        } else {
            "/"
        }
    }

    pub fn path_separator(self) -> &'static str {
        if self.is_windows() {
            ";"
        } else {
            ":"
        }
    }

    pub fn line_separator(self) -> &'static str {
        if self.is_windows() {
            "\r\n"
        } else {
            "\n"
        }
    }
}

impl fmt::Display for Os {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.fallback_name())
    }
}

/// Map a kernel name (`uname -s`) to the reported OS name.
pub fn os_name_from_kernel(sysname: &str) -> String {
    match sysname {
        "Darwin" => "Mac OS X".into(),
        other => other.to_string(),
    }
}

/// Map a Rust target architecture to the reported architecture name.
pub fn arch_name(rust_arch: &str) -> &str {
    match rust_arch {
        "x86_64" => "amd64",
        "x86" => "x86",
        "powerpc64" if cfg!(target_endian = "little") => "ppc64le",
        "powerpc64" => "ppc64",
        "powerpc" => "ppc",
        other => other,
    }
}

pub fn cpu_endian() -> &'static str {
    if cfg!(target_endian = "big") {
        "big"
    } else {
        "little"
    }
}

/// Addressing width of the target, `"32"` or `"64"`.
pub fn data_model() -> &'static str {
    if cfg!(target_pointer_width = "64") {
        "64"
    } else {
        "32"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn separators_follow_os_family() {
        assert_eq!(Os::Linux.file_separator(), "/");
        assert_eq!(Os::Linux.path_separator(), ":");
        assert_eq!(Os::Linux.line_separator(), "\n");
        assert_eq!(Os::Windows.file_separator(), "\\");
        assert_eq!(Os::Windows.path_separator(), ";");
        assert_eq!(Os::Windows.line_separator(), "\r\n");
        assert_eq!(Os::MacOS.path_separator(), ":");
    }

    #[test]
    fn rust_os_names_map_to_families() {
        assert_eq!(Os::from_rust_os("macos"), Os::MacOS);
        assert_eq!(Os::from_rust_os("android"), Os::Linux);
        assert_eq!(Os::from_rust_os("haiku"), Os::Other);
    }

    #[test]
    fn darwin_is_reported_as_mac_os_x() {
        assert_eq!(os_name_from_kernel("Darwin"), "Mac OS X");
        assert_eq!(os_name_from_kernel("Linux"), "Linux");
    }

    #[test]
    fn arch_names() {
        assert_eq!(arch_name("x86_64"), "amd64");
        assert_eq!(arch_name("aarch64"), "aarch64");
        assert_eq!(arch_name("riscv64"), "riscv64");
    }

    #[test]
    fn data_model_matches_pointer_width() {
        assert_eq!(data_model(), (usize::BITS).to_string());
    }
}
