//! Proxy settings block.
//!
//! Only macOS exposes a system-wide proxy configuration that is collected;
//! other targets leave `PlatformProperties::proxy` absent. The settings are
//! read from `scutil --proxy`, whose output is parsed here so the parser can
//! be exercised on any host.

use serde::{Deserialize, Serialize};
use tracing::warn;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProxyEndpoint {
    pub enabled: bool,
    pub host: Option<String>,
    pub port: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProxySettings {
    pub http: ProxyEndpoint,
    pub https: ProxyEndpoint,
    pub ftp: ProxyEndpoint,
    pub socks: ProxyEndpoint,
    /// Host patterns that bypass every proxy.
    pub exceptions: Vec<String>,
}

/// What to do with an entry that is enabled but has no host.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PartialProxyPolicy {
    /// Report the entry as disabled.
    #[default]
    Disable,
    /// Keep whatever the host reported.
    PassThrough,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProxyKind {
    Http,
    Https,
    Ftp,
    Socks,
}

impl ProxyKind {
    pub const ALL: [ProxyKind; 4] = [
        ProxyKind::Http,
        ProxyKind::Https,
        ProxyKind::Ftp,
        ProxyKind::Socks,
    ];

    /// Key prefix used by `scutil --proxy`.
    fn scutil_prefix(self) -> &'static str {
        match self {
            ProxyKind::Http => "HTTP",
            ProxyKind::Https => "HTTPS",
            ProxyKind::Ftp => "FTP",
            ProxyKind::Socks => "SOCKS",
        }
    }

    /// Host and port property keys seeded into the runtime.
    pub fn property_keys(self) -> (&'static str, &'static str) {
        match self {
            ProxyKind::Http => ("http.proxyHost", "http.proxyPort"),
            ProxyKind::Https => ("https.proxyHost", "https.proxyPort"),
            ProxyKind::Ftp => ("ftp.proxyHost", "ftp.proxyPort"),
            ProxyKind::Socks => ("socksProxyHost", "socksProxyPort"),
        }
    }
}

impl ProxySettings {
    pub fn endpoint(&self, kind: ProxyKind) -> &ProxyEndpoint {
        match kind {
            ProxyKind::Http => &self.http,
            ProxyKind::Https => &self.https,
            ProxyKind::Ftp => &self.ftp,
            ProxyKind::Socks => &self.socks,
        }
    }

    fn endpoint_mut(&mut self, kind: ProxyKind) -> &mut ProxyEndpoint {
        match kind {
            ProxyKind::Http => &mut self.http,
            ProxyKind::Https => &mut self.https,
            ProxyKind::Ftp => &mut self.ftp,
            ProxyKind::Socks => &mut self.socks,
        }
    }

    /// Parse the dictionary printed by `scutil --proxy`.
    pub fn parse_scutil(output: &str) -> ProxySettings {
        let mut settings = ProxySettings::default();
        let mut in_exceptions = false;

        for line in output.lines() {
            let line = line.trim();

            if in_exceptions {
                if line == "}" {
                    in_exceptions = false;
                } else if let Some((_, pattern)) = line.split_once(" : ") {
                    let pattern = pattern.trim();
                    if !pattern.is_empty() {
                        settings.exceptions.push(pattern.to_string());
                    }
                }
                continue;
            }

            let Some((key, value)) = line.split_once(" : ") else {
                continue;
            };
            let (key, value) = (key.trim(), value.trim());

            if key == "ExceptionsList" {
                in_exceptions = value.starts_with("<array>");
                continue;
            }

            for kind in ProxyKind::ALL {
                let prefix = kind.scutil_prefix();
                let Some(field) = key.strip_prefix(prefix) else {
                    continue;
                };
                let endpoint = settings.endpoint_mut(kind);
                match field {
                    "Enable" => endpoint.enabled = value == "1",
                    "Proxy" => endpoint.host = non_empty(value),
                    "Port" => endpoint.port = non_empty(value),
                    _ => continue,
                }
                break;
            }
        }

        settings
    }

    /// Apply the partial-availability policy to every endpoint.
    pub fn apply_policy(mut self, policy: PartialProxyPolicy) -> ProxySettings {
        if policy == PartialProxyPolicy::PassThrough {
            return self;
        }
        for kind in ProxyKind::ALL {
            let endpoint = self.endpoint_mut(kind);
            if endpoint.enabled && endpoint.host.is_none() {
                warn!(proxy = ?kind, "proxy enabled without a host, treating as disabled");
                endpoint.enabled = false;
            }
        }
        self
    }

    /// Exclusion patterns joined the way `nonProxyHosts` expects.
    pub fn non_proxy_hosts(&self) -> Option<String> {
        if self.exceptions.is_empty() {
            None
        } else {
            Some(self.exceptions.join("|"))
        }
    }
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Read the system proxy configuration.
#[cfg(target_os = "macos")]
pub fn collect(policy: PartialProxyPolicy) -> Option<ProxySettings> {
    use tracing::debug;

    let output = match std::process::Command::new("scutil").arg("--proxy").output() {
        Ok(output) if output.status.success() => output,
        Ok(output) => {
            warn!(status = %output.status, "scutil --proxy failed");
            return None;
        }
        Err(e) => {
            warn!(error = %e, "failed to run scutil");
            return None;
        }
    };

    let text = String::from_utf8_lossy(&output.stdout);
    let settings = ProxySettings::parse_scutil(&text).apply_policy(policy);
    debug!(exceptions = settings.exceptions.len(), "collected proxy settings");
    Some(settings)
}

#[cfg(not(target_os = "macos"))]
pub fn collect(_policy: PartialProxyPolicy) -> Option<ProxySettings> {
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCUTIL: &str = "<dictionary> {
  ExceptionsList : <array> {
    0 : *.local
    1 : 169.254/16
  }
  FTPPassive : 1
  HTTPEnable : 1
  HTTPPort : 8080
  HTTPProxy : proxy.corp.example
  HTTPSEnable : 1
  HTTPSPort : 8443
  HTTPSProxy : secure.corp.example
  SOCKSEnable : 0
}
";

    #[test]
    fn parses_scutil_dictionary() {
        let settings = ProxySettings::parse_scutil(SCUTIL);

        assert_eq!(
            settings.http,
            ProxyEndpoint {
                enabled: true,
                host: Some("proxy.corp.example".into()),
                port: Some("8080".into()),
            }
        );
        assert!(settings.https.enabled);
        assert_eq!(settings.https.host.as_deref(), Some("secure.corp.example"));
        assert_eq!(settings.https.port.as_deref(), Some("8443"));
        assert_eq!(settings.ftp, ProxyEndpoint::default());
        assert!(!settings.socks.enabled);
        assert_eq!(settings.exceptions, vec!["*.local", "169.254/16"]);
        assert_eq!(settings.non_proxy_hosts().as_deref(), Some("*.local|169.254/16"));
    }

    #[test]
    fn ftp_passive_is_not_mistaken_for_a_proxy_field() {
        let settings = ProxySettings::parse_scutil("<dictionary> {\n  FTPPassive : 1\n}\n");
        assert_eq!(settings, ProxySettings::default());
    }

    #[test]
    fn empty_output_has_nothing_enabled() {
        let settings = ProxySettings::parse_scutil("");
        assert_eq!(settings, ProxySettings::default());
        assert_eq!(settings.non_proxy_hosts(), None);
    }

    #[test]
    fn enabled_without_host_is_disabled_by_default() {
        let settings =
            ProxySettings::parse_scutil("  SOCKSEnable : 1\n  SOCKSPort : 1080\n").apply_policy(PartialProxyPolicy::default());
        assert!(!settings.socks.enabled);
        assert_eq!(settings.socks.port.as_deref(), Some("1080"));
    }

    #[test]
    fn missing_port_alone_is_not_partial() {
        let settings = ProxySettings::parse_scutil("  HTTPEnable : 1\n  HTTPProxy : proxy.lan\n")
            .apply_policy(PartialProxyPolicy::Disable);
        assert!(settings.http.enabled);
        assert_eq!(settings.http.host.as_deref(), Some("proxy.lan"));
        assert_eq!(settings.http.port, None);
    }

    #[test]
    fn pass_through_keeps_partial_entries() {
        let settings =
            ProxySettings::parse_scutil("  SOCKSEnable : 1\n").apply_policy(PartialProxyPolicy::PassThrough);
        assert!(settings.socks.enabled);
        assert_eq!(settings.socks.host, None);
    }

    #[test]
    fn policy_leaves_complete_entries_alone() {
        let settings = ProxySettings::parse_scutil(SCUTIL).apply_policy(PartialProxyPolicy::Disable);
        assert!(settings.http.enabled);
        assert!(settings.https.enabled);
    }
}
