//! `platprops get` — print a single system property, exit 1 when absent.

use anyhow::Result;

use platprops::{Collector, Config};

use super::show::escape;

pub fn run(config: Config, key: &str) -> Result<()> {
    let props = Collector::new(config).collect().to_system_properties();

    match props.get(key) {
        Some(value) => {
            println!("{}", escape(value));
            Ok(())
        }
        None => {
            eprintln!("property '{}' is not set on this host", key);
            std::process::exit(1);
        }
    }
}
