//! Emulator-wide configuration, deserializable from a TOML file so a host
//! application can ship a settings file alongside its binary instead of
//! hardcoding quirk policy and ROM paths.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::QuirkPolicy;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmulatorConfig {
    #[serde(default)]
    pub quirk_policy: QuirkPolicy,
    pub bios_path: PathBuf,
    pub cartridge_path: Option<PathBuf>,
}

impl Default for EmulatorConfig {
    fn default() -> Self {
        Self {
            quirk_policy: QuirkPolicy::default(),
            bios_path: PathBuf::from("bios.bin"),
            cartridge_path: None,
        }
    }
}
