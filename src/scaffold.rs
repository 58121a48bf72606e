// src/scaffold.rs

//! `pushpanel init`: drop a ready-to-serve panel into a directory.

use anyhow::Result;
use std::path::Path;

use crate::config::DEFAULT_CONFIG_PATH;
use crate::util::write_if_missing;

const CONFIG_TEMPLATE: &str = include_str!("../assets/pushpanel.yaml");
const SCRIPT_TEMPLATE: &str = include_str!("../assets/github_push.sh");
const PAGE_TEMPLATE: &str = include_str!("../assets/github-push-ui.html");

/// Create the config, push script and page under `base`, skipping any that
/// already exist.
pub fn init_scaffold(base: &Path) -> Result<()> {
    for (name, contents) in [
        (DEFAULT_CONFIG_PATH, CONFIG_TEMPLATE),
        ("github_push.sh", SCRIPT_TEMPLATE),
        ("github-push-ui.html", PAGE_TEMPLATE),
    ] {
        let path = base.join(name);
        if write_if_missing(&path, contents)? {
            eprintln!("Created {}", name);
        } else {
            eprintln!("{} already exists (skipping)", name);
        }
    }

    Ok(())
}
