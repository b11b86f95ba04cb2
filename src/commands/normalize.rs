//! `platprops normalize` — print the IANA name for each encoding given.

use anyhow::Result;
use colored::Colorize;

use platprops::normalize_encoding;

pub fn run(names: &[String]) -> Result<()> {
    for name in names {
        let canonical = normalize_encoding(name);
        if canonical == name {
            println!("{}", name);
        } else {
            println!("{} {} {}", name.dimmed(), "→".dimmed(), canonical.bold());
        }
    }
    Ok(())
}
