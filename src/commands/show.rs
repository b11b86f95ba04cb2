//! `platprops show` — collect and display the properties of this host.

use anyhow::{bail, Result};
use colored::Colorize;

use platprops::{Collector, Config, Locale, NativeText, PlatformProperties};

pub fn run(config: Config, format: &str) -> Result<()> {
    let props = Collector::new(config).collect();

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&props)?),
        "properties" => {
            for (key, value) in props.to_system_properties() {
                println!("{}={}", key, escape(&value));
            }
        }
        "table" => print_table(&props),
        other => bail!("unknown format '{}' (expected table, json or properties)", other),
    }

    Ok(())
}

/// Escape control characters so separators print on one line.
pub fn escape(value: &str) -> String {
    value.replace('\\', "\\\\").replace('\r', "\\r").replace('\n', "\\n").replace('\t', "\\t")
}

fn fmt_opt(value: Option<&str>) -> String {
    match value {
        Some(v) => escape(v),
        None => "(absent)".dimmed().to_string(),
    }
}

fn fmt_native(value: Option<&NativeText>) -> String {
    match value {
        Some(text) => match text.to_internal() {
            Ok(s) => s,
            Err(_) => format!("{} {}", text.to_string_lossy(), "(not valid text)".red()),
        },
        None => "(absent)".dimmed().to_string(),
    }
}

fn fmt_locale(locale: &Locale) -> String {
    let tag = locale.tag();
    if tag.is_empty() {
        "(absent)".dimmed().to_string()
    } else {
        tag
    }
}

fn print_table(props: &PlatformProperties) {
    println!("{}", "═══ Platform Properties ═══".cyan().bold());

    println!();
    println!("{}", "── OS ──".yellow());
    println!("  Name:            {}", fmt_opt(props.os_name()));
    println!("  Version:         {}", fmt_opt(props.os_version()));
    println!("  Arch:            {}", fmt_opt(props.os_arch()));
    if let Some(abi) = props.arch_abi() {
        println!("  ABI:             {}", abi);
    }
    if let Some(patch) = props.patch_level() {
        println!("  Patch Level:     {}", patch);
    }
    println!("  Data Model:      {}-bit", props.data_model().unwrap_or("?"));
    println!("  CPU Endian:      {}", fmt_opt(props.cpu_endian()));
    if let Some(isa) = props.cpu_isalist() {
        println!("  ISA List:        {} entries", isa.len());
    }

    println!();
    println!("{}", "── Environment ──".yellow());
    println!("  User:            {}", fmt_native(props.user_name()));
    println!("  Home:            {}", fmt_native(props.user_home()));
    println!("  Working Dir:     {}", fmt_native(props.user_dir()));
    println!("  Temp Dir:        {}", fmt_native(props.tmp_dir()));
    println!("  File Separator:  {}", fmt_opt(props.file_separator()));
    println!("  Path Separator:  {}", fmt_opt(props.path_separator()));
    println!("  Line Separator:  {}", fmt_opt(props.line_separator()));

    println!();
    println!("{}", "── Locale ──".yellow());
    println!("  Format:          {}", fmt_locale(props.format_locale()));
    println!("  Display:         {}", fmt_locale(props.display_locale()));

    println!();
    println!("{}", "── Encoding ──".yellow());
    println!("  Default:         {}", fmt_opt(props.encoding()));
    println!("  Native:          {}", fmt_opt(props.native_encoding()));
    println!("  Stdout:          {}", fmt_opt(props.stdout_encoding()));
    println!("  Stderr:          {}", fmt_opt(props.stderr_encoding()));
    println!("  Unicode:         {}", props.unicode_encoding());

    if let Some(proxy) = props.proxy() {
        println!();
        println!("{}", "── Proxy ──".yellow());
        for kind in platprops::ProxyKind::ALL {
            let endpoint = proxy.endpoint(kind);
            let state = if endpoint.enabled {
                "enabled".green().to_string()
            } else {
                "disabled".dimmed().to_string()
            };
            println!(
                "  {:<16} {} {}:{}",
                format!("{:?}:", kind),
                state,
                endpoint.host.as_deref().unwrap_or("-"),
                endpoint.port.as_deref().unwrap_or("-")
            );
        }
        if !proxy.exceptions.is_empty() {
            println!("  Exceptions:      {}", proxy.exceptions.join(", "));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_separators() {
        assert_eq!(escape("\r\n"), "\\r\\n");
        assert_eq!(escape("\\"), "\\\\");
        assert_eq!(escape("/"), "/");
    }
}
