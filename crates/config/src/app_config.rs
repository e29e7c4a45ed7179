// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::load_config::{find_in_parent, resolve_config_path};
use crate::yaml::load_yaml_with_env;
use alloy_primitives::Address;
use anyhow::{anyhow, bail, Context, Result};
use fhc_events::InstanceId;
use fhc_fhe_params::CounterPreset;
use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use path_clean::clean;
use serde::{Deserialize, Serialize};
use std::{
    env,
    path::{Path, PathBuf},
};
use tracing::{debug, warn};

pub const DEFAULT_CONFIG_NAME: &str = "fhc.config.yaml";
pub const DEFAULT_DB_NAME: &str = "db";
pub const DEFAULT_PUBLIC_KEY_NAME: &str = "pk.bin";
pub const ENV_PREFIX: &str = "FHC_";

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct InstanceConfig {
    pub chain_id: u64,
    pub address: Address,
}

impl Default for InstanceConfig {
    fn default() -> Self {
        Self {
            chain_id: 31337,
            address: Address::ZERO,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct FheConfig {
    pub preset: CounterPreset,
}

/// Trusted input verifier committee
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct InputVerifiersConfig {
    pub signers: Vec<Address>,
    pub threshold: usize,
}

impl Default for InputVerifiersConfig {
    fn default() -> Self {
        Self {
            signers: vec![],
            threshold: 1,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct StoreConfig {
    /// Keep all state in memory. Nothing survives a restart.
    pub in_mem: bool,
}

/// The configuration exactly as written in yaml / env
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UnresolvedAppConfig {
    pub name: String,
    /// Defaults to the OS data dir, eg. `~/.local/share/fhc/{name}`
    pub data_dir: Option<PathBuf>,
    /// Absolute, or relative to `data_dir`
    pub db_file: PathBuf,
    /// Absolute, or relative to the config file
    pub public_key_file: PathBuf,
    pub instance: InstanceConfig,
    pub fhe: FheConfig,
    pub input_verifiers: InputVerifiersConfig,
    pub store: StoreConfig,
}

impl Default for UnresolvedAppConfig {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            data_dir: None,
            db_file: PathBuf::from(DEFAULT_DB_NAME),
            public_key_file: PathBuf::from(DEFAULT_PUBLIC_KEY_NAME),
            instance: InstanceConfig::default(),
            fhe: FheConfig::default(),
            input_verifiers: InputVerifiersConfig::default(),
            store: StoreConfig::default(),
        }
    }
}

impl UnresolvedAppConfig {
    /// Resolve every path against the location of the config file and validate.
    pub fn resolve(self, config_file: &Path, default_data_dir: &Path) -> Result<AppConfig> {
        let config_dir = config_file
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();

        let data_dir = match self.data_dir {
            Some(dir) => resolve_relative(&config_dir, &dir)?,
            None => default_data_dir.join(&self.name),
        };
        let db_file = resolve_relative(&data_dir, &self.db_file)?;
        let public_key_file = resolve_relative(&config_dir, &self.public_key_file)?;

        let config = AppConfig {
            name: self.name,
            config_file: config_file.to_path_buf(),
            data_dir,
            db_file,
            public_key_file,
            instance: InstanceId::new(self.instance.chain_id, self.instance.address),
            preset: self.fhe.preset,
            input_verifiers: self.input_verifiers,
            in_mem: self.store.in_mem,
        };
        config.validate()?;
        Ok(config)
    }
}

fn resolve_relative(base: &Path, path: &Path) -> Result<PathBuf> {
    let expanded = shellexpand::tilde(&path.to_string_lossy()).to_string();
    let expanded = PathBuf::from(expanded);
    if expanded.is_absolute() {
        return Ok(clean(expanded));
    }
    if base.as_os_str().is_empty() {
        return Ok(clean(env::current_dir()?.join(expanded)));
    }
    Ok(clean(base.join(expanded)))
}

/// The config actually used throughout the app
#[derive(Debug, Clone)]
pub struct AppConfig {
    name: String,
    config_file: PathBuf,
    data_dir: PathBuf,
    db_file: PathBuf,
    public_key_file: PathBuf,
    instance: InstanceId,
    preset: CounterPreset,
    input_verifiers: InputVerifiersConfig,
    in_mem: bool,
}

impl AppConfig {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config_file(&self) -> &Path {
        &self.config_file
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn db_file(&self) -> &Path {
        &self.db_file
    }

    pub fn public_key_file(&self) -> &Path {
        &self.public_key_file
    }

    pub fn instance(&self) -> InstanceId {
        self.instance
    }

    pub fn preset(&self) -> CounterPreset {
        self.preset
    }

    pub fn input_verifiers(&self) -> &InputVerifiersConfig {
        &self.input_verifiers
    }

    pub fn in_mem(&self) -> bool {
        self.in_mem
    }

    fn validate(&self) -> Result<()> {
        if self.instance.address() == Address::ZERO {
            bail!("instance.address must be set to the counter's address");
        }
        let signers = self.input_verifiers.signers.len();
        if signers == 0 {
            bail!("input_verifiers.signers must list at least one trusted verifier");
        }
        let threshold = self.input_verifiers.threshold;
        if threshold == 0 || threshold > signers {
            bail!("input_verifiers.threshold must be between 1 and {signers}, got {threshold}");
        }
        if !self.preset.metadata().production_ready {
            warn!(preset = %self.preset, "using an insecure parameter preset");
        }
        Ok(())
    }
}

pub struct OsDirs;

impl OsDirs {
    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join("fhc"))
            .ok_or_else(|| anyhow!("This OS does not provide a config dir"))
    }

    pub fn data_dir() -> Result<PathBuf> {
        dirs::data_local_dir()
            .map(|dir| dir.join("fhc"))
            .ok_or_else(|| anyhow!("This OS does not provide a data dir"))
    }
}

/// Load the config at `config_file` or search for `fhc.config.yaml` from the cwd upwards.
///
/// Values from `FHC_`-prefixed environment variables override the file, with `__` separating
/// nested keys, eg. `FHC_INPUT_VERIFIERS__THRESHOLD=2`.
pub fn load_config(config_file: Option<&str>) -> Result<AppConfig> {
    let cli_file = config_file.map(PathBuf::from);
    let resolved_config_path = resolve_config_path(
        find_in_parent,
        &env::current_dir()?,
        &OsDirs::config_dir()?,
        DEFAULT_CONFIG_NAME,
        cli_file.as_deref(),
    );
    debug!("loading config from {:?}", resolved_config_path);

    let loaded_yaml = load_yaml_with_env(&resolved_config_path)
        .with_context(|| format!("Could not load configuration from {:?}", resolved_config_path))?;

    let config: UnresolvedAppConfig =
        Figment::from(Serialized::defaults(UnresolvedAppConfig::default()))
            .merge(Yaml::string(&loaded_yaml))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .context("Could not parse configuration")?;

    config.resolve(&resolved_config_path, &OsDirs::data_dir()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    const CONFIG: &str = r#"
name: "alice"
instance:
  chain_id: 31337
  address: "0x5FbDB2315678afecb367f032d93F642f64180aa3"
fhe:
  preset: insecure-counter-2048
input_verifiers:
  signers:
    - "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266"
    - "0x70997970C51812dc3A010C7d01b50e0d17dc79C8"
  threshold: 2
"#;

    #[test]
    fn test_load_from_cwd() {
        Jail::expect_with(|jail| {
            jail.create_file(DEFAULT_CONFIG_NAME, CONFIG)?;
            let config = load_config(None).map_err(|e| e.to_string())?;
            let dir = jail.directory().to_path_buf();

            assert_eq!(config.name(), "alice");
            assert_eq!(config.config_file(), dir.join(DEFAULT_CONFIG_NAME));
            assert_eq!(config.instance().chain_id(), 31337);
            assert_eq!(
                config.instance().address().to_string(),
                "0x5FbDB2315678afecb367f032d93F642f64180aa3"
            );
            assert_eq!(config.preset(), CounterPreset::InsecureCounter2048);
            assert_eq!(config.input_verifiers().threshold, 2);
            assert_eq!(config.input_verifiers().signers.len(), 2);
            assert_eq!(config.public_key_file(), dir.join(DEFAULT_PUBLIC_KEY_NAME));
            assert!(config.db_file().ends_with("alice/db"));
            assert!(!config.in_mem());
            Ok(())
        });
    }

    #[test]
    fn test_relative_paths_follow_config_file() {
        Jail::expect_with(|jail| {
            jail.create_dir("conf")?;
            jail.create_file(
                "conf/counter.yaml",
                &format!("{CONFIG}data_dir: ./data\npublic_key_file: ../keys/pk.bin\n"),
            )?;
            let config = load_config(Some("conf/counter.yaml")).map_err(|e| e.to_string())?;
            let dir = jail.directory().to_path_buf();

            assert_eq!(config.data_dir(), dir.join("conf/data"));
            assert_eq!(config.db_file(), dir.join("conf/data/db"));
            assert_eq!(config.public_key_file(), dir.join("keys/pk.bin"));
            Ok(())
        });
    }

    #[test]
    fn test_env_overrides() {
        Jail::expect_with(|jail| {
            jail.create_file(DEFAULT_CONFIG_NAME, CONFIG)?;
            jail.set_env("FHC_INPUT_VERIFIERS__THRESHOLD", "1");
            jail.set_env("FHC_STORE__IN_MEM", "true");
            jail.set_env("FHC_FHE__PRESET", "secure-counter-8192");

            let config = load_config(None).map_err(|e| e.to_string())?;
            assert_eq!(config.input_verifiers().threshold, 1);
            assert!(config.in_mem());
            assert_eq!(config.preset(), CounterPreset::SecureCounter8192);
            Ok(())
        });
    }

    #[test]
    fn test_validation() {
        Jail::expect_with(|jail| {
            jail.create_file(
                DEFAULT_CONFIG_NAME,
                &CONFIG.replace("threshold: 2", "threshold: 3"),
            )?;
            let err = load_config(None).unwrap_err();
            assert!(err.to_string().contains("threshold"));

            jail.create_file(
                DEFAULT_CONFIG_NAME,
                "instance:\n  chain_id: 1\n  address: \"0x5FbDB2315678afecb367f032d93F642f64180aa3\"\n",
            )?;
            let err = load_config(None).unwrap_err();
            assert!(err.to_string().contains("signers"));
            Ok(())
        });
    }

    #[test]
    fn test_file_not_found() {
        Jail::expect_with(|_| {
            let err = load_config(Some("/nope/fhc.config.yaml")).unwrap_err();
            let io = err.downcast_ref::<std::io::Error>().unwrap();
            assert_eq!(io.kind(), std::io::ErrorKind::NotFound);
            Ok(())
        });
    }
}
