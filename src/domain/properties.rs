//! Platform property record — a write-once snapshot of the host.
//!
//! The record is filled by a [`PropertiesBuilder`] and frozen by
//! [`PropertiesBuilder::build`]. `PlatformProperties` has no mutators, so a
//! built record can be shared across threads freely.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use serde::Serialize;
use tracing::warn;

use super::locale::Locale;
use super::proxy::{ProxyKind, ProxySettings};
use crate::encoding::UnicodeEncoding;
use crate::native::NativeText;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlatformProperties {
    os_name: Option<String>,
    os_version: Option<String>,
    os_arch: Option<String>,
    arch_abi: Option<String>,

    tmp_dir: Option<NativeText>,
    user_dir: Option<NativeText>,

    file_separator: Option<String>,
    path_separator: Option<String>,
    line_separator: Option<String>,

    user_name: Option<NativeText>,
    user_home: Option<NativeText>,

    format_locale: Locale,
    display_locale: Locale,

    encoding: Option<String>,
    native_encoding: Option<String>,
    stdout_encoding: Option<String>,
    stderr_encoding: Option<String>,

    unicode_encoding: UnicodeEncoding,
    cpu_isalist: Option<Vec<String>>,
    cpu_endian: Option<String>,
    data_model: Option<String>,
    patch_level: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    proxy: Option<ProxySettings>,
}

impl PlatformProperties {
    pub fn builder() -> PropertiesBuilder {
        PropertiesBuilder::default()
    }

    pub fn os_name(&self) -> Option<&str> {
        self.os_name.as_deref()
    }

    pub fn os_version(&self) -> Option<&str> {
        self.os_version.as_deref()
    }

    pub fn os_arch(&self) -> Option<&str> {
        self.os_arch.as_deref()
    }

    pub fn arch_abi(&self) -> Option<&str> {
        self.arch_abi.as_deref()
    }

    pub fn tmp_dir(&self) -> Option<&NativeText> {
        self.tmp_dir.as_ref()
    }

    pub fn user_dir(&self) -> Option<&NativeText> {
        self.user_dir.as_ref()
    }

    pub fn file_separator(&self) -> Option<&str> {
        self.file_separator.as_deref()
    }

    pub fn path_separator(&self) -> Option<&str> {
        self.path_separator.as_deref()
    }

    pub fn line_separator(&self) -> Option<&str> {
        self.line_separator.as_deref()
    }

    pub fn user_name(&self) -> Option<&NativeText> {
        self.user_name.as_ref()
    }

    pub fn user_home(&self) -> Option<&NativeText> {
        self.user_home.as_ref()
    }

    /// Locale used to format numbers, dates and currencies.
    pub fn format_locale(&self) -> &Locale {
        &self.format_locale
    }

    /// Locale used for user-facing messages.
    pub fn display_locale(&self) -> &Locale {
        &self.display_locale
    }

    /// Default text encoding.
    pub fn encoding(&self) -> Option<&str> {
        self.encoding.as_deref()
    }

    /// Encoding of text passed across OS interfaces (paths, arguments, env).
    pub fn native_encoding(&self) -> Option<&str> {
        self.native_encoding.as_deref()
    }

    pub fn stdout_encoding(&self) -> Option<&str> {
        self.stdout_encoding.as_deref()
    }

    pub fn stderr_encoding(&self) -> Option<&str> {
        self.stderr_encoding.as_deref()
    }

    pub fn unicode_encoding(&self) -> UnicodeEncoding {
        self.unicode_encoding
    }

    pub fn cpu_isalist(&self) -> Option<&[String]> {
        self.cpu_isalist.as_deref()
    }

    pub fn cpu_endian(&self) -> Option<&str> {
        self.cpu_endian.as_deref()
    }

    pub fn data_model(&self) -> Option<&str> {
        self.data_model.as_deref()
    }

    pub fn patch_level(&self) -> Option<&str> {
        self.patch_level.as_deref()
    }

    pub fn proxy(&self) -> Option<&ProxySettings> {
        self.proxy.as_ref()
    }

    /// Flatten the record into the `key → value` map a runtime seeds its
    /// system properties from. Absent fields produce no entry.
    ///
    /// The display locale provides `user.language` and friends; format
    /// locale entries get a `.format` suffix and appear only when they
    /// differ from the display value.
    pub fn to_system_properties(&self) -> BTreeMap<String, String> {
        let mut props = BTreeMap::new();
        let mut put = |key: &str, value: Option<&str>| {
            if let Some(value) = value {
                props.insert(key.to_string(), value.to_string());
            }
        };

        put("os.name", self.os_name());
        put("os.version", self.os_version());
        put("os.arch", self.os_arch());
        put("os.arch.abi", self.arch_abi());
        put("file.separator", self.file_separator());
        put("path.separator", self.path_separator());
        put("line.separator", self.line_separator());

        let native = [
            ("tmp.dir", self.tmp_dir()),
            ("user.dir", self.user_dir()),
            ("user.name", self.user_name()),
            ("user.home", self.user_home()),
        ];
        for (key, value) in native {
            let Some(value) = value else { continue };
            match value.to_internal() {
                Ok(text) => put(key, Some(text.as_str())),
                Err(e) => warn!(key, error = %e, "omitting unconvertible property"),
            }
        }

        let display = &self.display_locale;
        let format = &self.format_locale;
        let locale_fields = [
            ("user.language", &display.language, &format.language),
            ("user.script", &display.script, &format.script),
            ("user.country", &display.country, &format.country),
            ("user.variant", &display.variant, &format.variant),
        ];
        for (key, shown, formatted) in locale_fields {
            put(key, shown.as_deref());
            if formatted != shown {
                put(format!("{key}.format").as_str(), formatted.as_deref());
            }
        }

        put("file.encoding", self.encoding());
        put("native.encoding", self.native_encoding());
        put("stdout.encoding", self.stdout_encoding());
        put("stderr.encoding", self.stderr_encoding());
        put("unicode.encoding", Some(self.unicode_encoding.to_string().as_str()));
        put("cpu.endian", self.cpu_endian());
        put("cpu.isalist", self.cpu_isalist().map(|list| list.join(" ")).as_deref());
        put("data.model", self.data_model());
        put("patch.level", self.patch_level());

        if let Some(proxy) = self.proxy() {
            for kind in ProxyKind::ALL {
                let endpoint = proxy.endpoint(kind);
                if !endpoint.enabled {
                    continue;
                }
                let (host_key, port_key) = kind.property_keys();
                put(host_key, endpoint.host.as_deref());
                put(port_key, endpoint.port.as_deref());
            }
            let non_proxy = proxy.non_proxy_hosts();
            put("http.nonProxyHosts", non_proxy.as_deref());
            put("ftp.nonProxyHosts", non_proxy.as_deref());
        }

        props
    }
}

/// Write-once builder for [`PlatformProperties`].
///
/// Empty strings and empty native text are stored as absent.
#[derive(Debug, Default)]
pub struct PropertiesBuilder {
    props: Fields,
}

#[derive(Debug, Default)]
struct Fields {
    os_name: Option<String>,
    os_version: Option<String>,
    os_arch: Option<String>,
    arch_abi: Option<String>,
    tmp_dir: Option<NativeText>,
    user_dir: Option<NativeText>,
    file_separator: Option<String>,
    path_separator: Option<String>,
    line_separator: Option<String>,
    user_name: Option<NativeText>,
    user_home: Option<NativeText>,
    format_locale: Locale,
    display_locale: Locale,
    encoding: Option<String>,
    native_encoding: Option<String>,
    stdout_encoding: Option<String>,
    stderr_encoding: Option<String>,
    unicode_encoding: Option<UnicodeEncoding>,
    cpu_isalist: Option<Vec<String>>,
    cpu_endian: Option<String>,
    data_model: Option<String>,
    patch_level: Option<String>,
    proxy: Option<ProxySettings>,
}

macro_rules! text_setter {
    ($($name:ident),* $(,)?) => {
        $(
            pub fn $name(mut self, value: Option<impl Into<String>>) -> Self {
                self.props.$name = value.map(Into::into).filter(|v: &String| !v.is_empty());
                self
            }
        )*
    };
}

macro_rules! native_setter {
    ($($name:ident),* $(,)?) => {
        $(
            pub fn $name(mut self, value: Option<NativeText>) -> Self {
                self.props.$name = value.filter(|v| !v.is_empty());
                self
            }
        )*
    };
}

impl PropertiesBuilder {
    text_setter!(
        os_name,
        os_version,
        os_arch,
        arch_abi,
        file_separator,
        path_separator,
        line_separator,
        encoding,
        native_encoding,
        stdout_encoding,
        stderr_encoding,
        cpu_endian,
        data_model,
        patch_level,
    );

    native_setter!(tmp_dir, user_dir, user_name, user_home);

    pub fn format_locale(mut self, locale: Locale) -> Self {
        self.props.format_locale = locale;
        self
    }

    pub fn display_locale(mut self, locale: Locale) -> Self {
        self.props.display_locale = locale;
        self
    }

    pub fn unicode_encoding(mut self, value: UnicodeEncoding) -> Self {
        self.props.unicode_encoding = Some(value);
        self
    }

    pub fn cpu_isalist(mut self, value: Option<Vec<String>>) -> Self {
        self.props.cpu_isalist = value.filter(|list| !list.is_empty());
        self
    }

    pub fn proxy(mut self, value: Option<ProxySettings>) -> Self {
        self.props.proxy = value;
        self
    }

    pub fn build(self) -> PlatformProperties {
        let f = self.props;
        PlatformProperties {
            os_name: f.os_name,
            os_version: f.os_version,
            os_arch: f.os_arch,
            arch_abi: f.arch_abi,
            tmp_dir: f.tmp_dir,
            user_dir: f.user_dir,
            file_separator: f.file_separator,
            path_separator: f.path_separator,
            line_separator: f.line_separator,
            user_name: f.user_name,
            user_home: f.user_home,
            format_locale: f.format_locale,
            display_locale: f.display_locale,
            encoding: f.encoding,
            native_encoding: f.native_encoding,
            stdout_encoding: f.stdout_encoding,
            stderr_encoding: f.stderr_encoding,
            unicode_encoding: f.unicode_encoding.unwrap_or_else(UnicodeEncoding::native),
            cpu_isalist: f.cpu_isalist,
            cpu_endian: f.cpu_endian,
            data_model: f.data_model,
            patch_level: f.patch_level,
            proxy: f.proxy,
        }
    }
}

static GLOBAL: OnceLock<PlatformProperties> = OnceLock::new();

/// The process-wide record, collected with default settings on first use.
pub fn global() -> &'static PlatformProperties {
    GLOBAL.get_or_init(|| super::collector::Collector::default().collect())
}
