//! Collector — fills a `PlatformProperties` record from the local host.
//!
//! Each field is probed independently. A probe that fails leaves its field
//! absent and is logged; collection as a whole never fails.
//! - Unix: uname, /proc/cpuinfo, locale environment, passwd-style env vars
//! - macOS: scutil --proxy
//! - Windows: ver, USERNAME / USERPROFILE

use std::ffi::OsString;
use std::io::IsTerminal;
use std::process::Command;

use tracing::{debug, warn};

use super::locale::{Category, Locale};
use super::properties::PlatformProperties;
use super::proxy;
use crate::config::{Config, DefaultEncoding};
use crate::encoding::{normalize_encoding, UnicodeEncoding, US_ASCII, UTF_8};
use crate::native::NativeText;
use crate::platform::{self, Os};

#[derive(Debug, Default)]
pub struct Collector {
    config: Config,
}

impl Collector {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Build the record for this host.
    pub fn collect(&self) -> PlatformProperties {
        let os = Os::detect();
        let overrides = &self.config.overrides;

        let format_locale = Locale::from_env(Category::Format).unwrap_or_default();
        let display_locale = Locale::from_env(Category::Display).unwrap_or_default();

        let native_encoding = overrides
            .native_encoding
            .as_deref()
            .map(|e| normalize_encoding(e).to_string())
            .unwrap_or_else(|| native_encoding(os, &format_locale));
        let encoding = match self.config.default_encoding {
            DefaultEncoding::Utf8 => UTF_8.to_string(),
            DefaultEncoding::Native => native_encoding.clone(),
        };
        let stdout_encoding = std::io::stdout()
            .is_terminal()
            .then(|| native_encoding.clone());
        let stderr_encoding = std::io::stderr()
            .is_terminal()
            .then(|| native_encoding.clone());

        let props = PlatformProperties::builder()
            .os_name(overrides.os_name.clone().or_else(|| os_name(os)))
            .os_version(overrides.os_version.clone().or_else(|| os_version(os)))
            .os_arch(
                overrides
                    .os_arch
                    .clone()
                    .or_else(|| Some(platform::arch_name(std::env::consts::ARCH).to_string())),
            )
            .arch_abi(overrides.arch_abi.clone())
            .tmp_dir(Some(NativeText::from_os_string(
                std::env::temp_dir().into_os_string(),
            )))
            .user_dir(user_dir())
            .file_separator(Some(os.file_separator()))
            .path_separator(Some(os.path_separator()))
            .line_separator(Some(os.line_separator()))
            .user_name(user_name(os))
            .user_home(dirs::home_dir().map(|p| NativeText::from_os_string(p.into_os_string())))
            .format_locale(format_locale)
            .display_locale(display_locale)
            .encoding(Some(encoding))
            .native_encoding(Some(native_encoding))
            .stdout_encoding(stdout_encoding)
            .stderr_encoding(stderr_encoding)
            .unicode_encoding(UnicodeEncoding::native())
            .cpu_isalist(cpu_isalist())
            .cpu_endian(Some(platform::cpu_endian()))
            .data_model(Some(platform::data_model()))
            .patch_level(overrides.patch_level.clone())
            .proxy(proxy::collect(self.config.partial_proxy))
            .build();

        debug!(
            os = props.os_name().unwrap_or("unknown"),
            arch = props.os_arch().unwrap_or("unknown"),
            encoding = props.native_encoding().unwrap_or("unknown"),
            "collected platform properties"
        );

        props
    }
}

/// Native encoding for OS-interface text, derived from the format locale.
pub fn native_encoding(os: Os, format_locale: &Locale) -> String {
    if let Some(codeset) = &format_locale.codeset {
        return codeset.clone();
    }
    if os.is_windows() {
        return UTF_8.to_string();
    }
    match run_cmd("locale", &["charmap"]) {
        Some(charmap) if !charmap.trim().is_empty() => normalize_encoding(charmap.trim()).to_string(),
        _ => {
            debug!("no codeset in locale, falling back to US-ASCII");
            US_ASCII.to_string()
        }
    }
}

fn os_name(os: Os) -> Option<String> {
    if os.is_windows() {
        return Some(os.fallback_name().to_string());
    }
    match run_cmd("uname", &["-s"]) {
        Some(sysname) => Some(platform::os_name_from_kernel(sysname.trim())),
        None => {
            warn!("uname -s failed, using compiled target name");
            Some(os.fallback_name().to_string())
        }
    }
}

fn os_version(os: Os) -> Option<String> {
    let version = if os.is_windows() {
        run_cmd("cmd", &["/C", "ver"]).and_then(|out| parse_windows_ver(&out))
    } else {
        run_cmd("uname", &["-r"]).map(|s| s.trim().to_string())
    };
    if version.is_none() {
        warn!("failed to determine OS version");
    }
    version
}

fn user_dir() -> Option<NativeText> {
    match std::env::current_dir() {
        Ok(dir) => Some(NativeText::from_os_string(dir.into_os_string())),
        Err(e) => {
            warn!(error = %e, "failed to read working directory");
            None
        }
    }
}

fn user_name(os: Os) -> Option<NativeText> {
    let vars: &[&str] = if os.is_windows() {
        &["USERNAME"]
    } else {
        &["USER", "LOGNAME"]
    };
    let name = vars
        .iter()
        .filter_map(|var| std::env::var_os(var))
        .find(|value: &OsString| !value.is_empty())
        .or_else(|| {
            if os.is_windows() {
                None
            } else {
                run_cmd("id", &["-un"]).map(|s| OsString::from(s.trim()))
            }
        });
    if name.is_none() {
        warn!("failed to determine user name");
    }
    name.map(NativeText::from_os_string)
}

#[cfg(target_os = "linux")]
fn cpu_isalist() -> Option<Vec<String>> {
    match std::fs::read_to_string("/proc/cpuinfo") {
        Ok(cpuinfo) => parse_isalist(&cpuinfo),
        Err(e) => {
            debug!(error = %e, "failed to read /proc/cpuinfo");
            None
        }
    }
}

#[cfg(not(target_os = "linux"))]
fn cpu_isalist() -> Option<Vec<String>> {
    None
}

/// Instruction-set list of the first processor in `/proc/cpuinfo`.
pub fn parse_isalist(cpuinfo: &str) -> Option<Vec<String>> {
    let flags = extract_proc_field(cpuinfo, "flags")
        .or_else(|| extract_proc_field(cpuinfo, "Features"))?;
    let mut list: Vec<String> = Vec::new();
    for flag in flags.split_whitespace() {
        if !list.iter().any(|f| f == flag) {
            list.push(flag.to_string());
        }
    }
    if list.is_empty() {
        None
    } else {
        Some(list)
    }
}

/// Version number from the output of `ver`: "Microsoft Windows [Version 10.0.22631.3007]".
pub fn parse_windows_ver(output: &str) -> Option<String> {
    let start = output.find("[Version ")? + "[Version ".len();
    let rest = &output[start..];
    let end = rest.find(']')?;
    let version = rest[..end].trim();
    if version.is_empty() {
        None
    } else {
        Some(version.to_string())
    }
}

fn extract_proc_field(cpuinfo: &str, field: &str) -> Option<String> {
    cpuinfo
        .lines()
        .find(|l| l.split(':').next().map(str::trim) == Some(field))
        .and_then(|l| l.split_once(':'))
        .map(|(_, value)| value.trim().to_string())
}

fn run_cmd(program: &str, args: &[&str]) -> Option<String> {
    let output = Command::new(program).args(args).output().ok()?;

    if output.status.success() {
        Some(String::from_utf8_lossy(&output.stdout).to_string())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Overrides;

    const X86_CPUINFO: &str = "processor\t: 0
vendor_id\t: GenuineIntel
flags\t\t: fpu vme sse sse2 avx avx2
processor\t: 1
flags\t\t: fpu vme sse sse2 avx avx2 avx512f
";

    const ARM_CPUINFO: &str = "processor\t: 0
BogoMIPS\t: 48.00
Features\t: fp asimd evtstrm aes pmull fp
CPU implementer\t: 0x41
";

    #[test]
    fn isalist_comes_from_first_processor() {
        let list = parse_isalist(X86_CPUINFO).unwrap();
        assert_eq!(list, vec!["fpu", "vme", "sse", "sse2", "avx", "avx2"]);
    }

    #[test]
    fn isalist_reads_arm_features_without_duplicates() {
        let list = parse_isalist(ARM_CPUINFO).unwrap();
        assert_eq!(list, vec!["fp", "asimd", "evtstrm", "aes", "pmull"]);
    }

    #[test]
    fn isalist_absent_without_flags() {
        assert_eq!(parse_isalist("processor\t: 0\n"), None);
        assert_eq!(parse_isalist("flags\t: \n"), None);
    }

    #[test]
    fn windows_ver_output() {
        assert_eq!(
            parse_windows_ver("\r\nMicrosoft Windows [Version 10.0.22631.3007]\r\n").as_deref(),
            Some("10.0.22631.3007")
        );
        assert_eq!(parse_windows_ver("garbage"), None);
    }

    #[test]
    fn locale_codeset_is_the_native_encoding() {
        let locale = Locale::parse("ru_RU.KOI8-R").unwrap();
        assert_eq!(native_encoding(Os::Linux, &locale), "KOI8-R");
        let locale = Locale::parse("en_US.ISO8859-1").unwrap();
        assert_eq!(native_encoding(Os::Linux, &locale), "ISO-8859-1");
    }

    #[test]
    fn windows_without_codeset_is_utf8() {
        assert_eq!(native_encoding(Os::Windows, &Locale::default()), UTF_8);
    }

    #[test]
    fn collected_record_is_well_formed() {
        let props = Collector::default().collect();

        assert!(props.os_name().is_some_and(|s| !s.is_empty()));
        assert!(props.os_arch().is_some_and(|s| !s.is_empty()));
        assert_eq!(props.file_separator(), Some(Os::detect().file_separator()));
        assert_eq!(props.path_separator(), Some(Os::detect().path_separator()));
        assert_eq!(props.line_separator(), Some(Os::detect().line_separator()));
        assert_eq!(props.encoding(), Some(UTF_8));
        assert!(props.native_encoding().is_some());
        assert_eq!(props.data_model(), Some(platform::data_model()));
        assert_eq!(props.cpu_endian(), Some(platform::cpu_endian()));
        assert!(props.tmp_dir().is_some());
        if !cfg!(target_os = "macos") {
            assert_eq!(props.proxy(), None);
        }
    }

    #[test]
    fn overrides_replace_host_values() {
        let config = Config {
            default_encoding: DefaultEncoding::Native,
            overrides: Overrides {
                os_name: Some("TestOS".into()),
                arch_abi: Some("gnueabihf".into()),
                patch_level: Some("SP2".into()),
                native_encoding: Some("ISO8859-15".into()),
                ..Overrides::default()
            },
            ..Config::default()
        };
        let props = Collector::new(config).collect();

        assert_eq!(props.os_name(), Some("TestOS"));
        assert_eq!(props.arch_abi(), Some("gnueabihf"));
        assert_eq!(props.patch_level(), Some("SP2"));
        assert_eq!(props.native_encoding(), Some("ISO-8859-15"));
        assert_eq!(props.encoding(), Some("ISO-8859-15"));
    }
}
