// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration for reconciliation runs.
//!
//! The default config is embedded in the binary, and a repository may layer its own settings on
//! top through `.config/reconcile.toml`. Settings are grouped into profiles: `default` always
//! exists, and every other profile inherits the values it doesn't set from `default`.

use crate::{
    dialect::LogDialect,
    errors::{ConfigParseError, ConfigParseErrorKind, InvalidStatusAliasError, ProfileNotFound},
    helpers::DEFAULT_PREVIEW_CHARS,
    outcome::{Canonicalizer, Outcome},
    structured::DEFAULT_STRUCTURED_KEYS,
};
use camino::Utf8Path;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, builder::DefaultState};
use itertools::Itertools;
use serde::Deserialize;
use smol_str::SmolStr;
use std::collections::{BTreeMap, BTreeSet};

/// Overall configuration for reconciliation runs.
///
/// Most settings are managed through profiles, obtained through the [`profile`](Self::profile)
/// method.
#[derive(Clone, Debug)]
pub struct ReconcileConfig {
    default_profile: DefaultProfileImpl,
    other_profiles: BTreeMap<String, CustomProfileImpl>,
}

impl ReconcileConfig {
    /// The default location of the config within a directory: `.config/reconcile.toml`.
    pub const CONFIG_PATH: &'static str = ".config/reconcile.toml";

    /// Contains the default config as a TOML file.
    ///
    /// Repository-specific configuration is layered on top of the default config.
    pub const DEFAULT_CONFIG: &'static str = include_str!("../default-config.toml");

    /// The name of the default profile.
    pub const DEFAULT_PROFILE: &'static str = "default";

    /// Reads the config from the given file, or if not specified from `.config/reconcile.toml`
    /// within `dir`.
    ///
    /// An explicitly specified file must exist. If no file is specified and `dir` doesn't have
    /// `.config/reconcile.toml`, the default config is used as-is.
    pub fn from_sources(
        dir: impl AsRef<Utf8Path>,
        config_file: Option<&Utf8Path>,
    ) -> Result<Self, ConfigParseError> {
        let (config_file, source) = match config_file {
            Some(file) => (file.to_owned(), File::new(file.as_str(), FileFormat::Toml)),
            None => {
                let config_file = dir.as_ref().join(Self::CONFIG_PATH);
                let source = File::new(config_file.as_str(), FileFormat::Toml).required(false);
                (config_file, source)
            }
        };

        let builder = Self::make_default_config().add_source(source);
        Self::build(&builder, &config_file)
    }

    /// Returns the default config, with no repository settings applied.
    pub fn default_config() -> Result<Self, ConfigParseError> {
        Self::build(&Self::make_default_config(), Utf8Path::new("<default config>"))
    }

    /// Returns the profile with the given name, or an error if it isn't defined.
    pub fn profile(&self, name: impl AsRef<str>) -> Result<ReconcileProfile<'_>, ProfileNotFound> {
        let name = name.as_ref();
        let custom_profile = match name {
            Self::DEFAULT_PROFILE => None,
            other => Some(
                self.other_profiles
                    .get(other)
                    .ok_or_else(|| ProfileNotFound::new(name, self.all_profiles()))?,
            ),
        };

        Ok(ReconcileProfile {
            name: name.to_owned(),
            default_profile: &self.default_profile,
            custom_profile,
        })
    }

    /// Returns the names of all known profiles.
    pub fn all_profiles(&self) -> impl Iterator<Item = &str> {
        self.other_profiles
            .keys()
            .map(String::as_str)
            .chain(std::iter::once(Self::DEFAULT_PROFILE))
    }

    // ---
    // Helper methods
    // ---

    fn make_default_config() -> ConfigBuilder<DefaultState> {
        Config::builder().add_source(File::from_str(Self::DEFAULT_CONFIG, FileFormat::Toml))
    }

    fn build(
        builder: &ConfigBuilder<DefaultState>,
        config_file: &Utf8Path,
    ) -> Result<Self, ConfigParseError> {
        let (deserialized, unknown) = Self::build_and_deserialize_config(builder)
            .map_err(|kind| ConfigParseError::new(config_file, kind))?;

        if !unknown.is_empty() {
            tracing::warn!(
                "ignoring unknown configuration keys in {config_file}: {}",
                unknown.iter().join(", ")
            );
        }

        deserialized
            .into_config_impl()
            .map_err(|kind| ConfigParseError::new(config_file, kind))
    }

    fn build_and_deserialize_config(
        builder: &ConfigBuilder<DefaultState>,
    ) -> Result<(ReconcileConfigDeserialize, BTreeSet<String>), ConfigParseErrorKind> {
        let config = builder
            .build_cloned()
            .map_err(|error| ConfigParseErrorKind::BuildError(Box::new(error)))?;

        let mut unknown = BTreeSet::new();
        let mut cb = |path: serde_ignored::Path| {
            unknown.insert(path.to_string());
        };
        let ignored_de = serde_ignored::Deserializer::new(config, &mut cb);
        let config: ReconcileConfigDeserialize = serde_path_to_error::deserialize(ignored_de)
            .map_err(|error| {
                // serde_path_to_error already reports the key, so drop the config crate's copy.
                let path = error.path().clone();
                let error = match error.into_inner() {
                    ConfigError::At { error, .. } => *error,
                    other => other,
                };
                ConfigParseErrorKind::DeserializeError(Box::new(serde_path_to_error::Error::new(
                    path, error,
                )))
            })?;

        Ok((config, unknown))
    }
}

/// A profile within a [`ReconcileConfig`], with inherited values resolved.
///
/// Returned by [`ReconcileConfig::profile`].
#[derive(Clone, Debug)]
pub struct ReconcileProfile<'cfg> {
    name: String,
    default_profile: &'cfg DefaultProfileImpl,
    custom_profile: Option<&'cfg CustomProfileImpl>,
}

impl ReconcileProfile<'_> {
    /// Returns the name of the profile.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the log dialect used to read observed results.
    pub fn dialect(&self) -> LogDialect {
        self.custom_profile
            .and_then(|profile| profile.dialect)
            .unwrap_or(self.default_profile.dialect)
    }

    /// Returns the keys searched for the test array in a structured reference document.
    pub fn structured_keys(&self) -> &[String] {
        self.custom_profile
            .and_then(|profile| profile.structured_keys.as_deref())
            .unwrap_or(self.default_profile.structured_keys.as_slice())
    }

    /// Returns the maximum number of characters quoted from a malformed reference line.
    pub fn preview_chars(&self) -> usize {
        self.custom_profile
            .and_then(|profile| profile.preview_chars)
            .unwrap_or(self.default_profile.preview_chars)
    }

    /// Returns whether the human-readable report ends with the JSON serialization.
    pub fn json_diff(&self) -> bool {
        self.custom_profile
            .and_then(|profile| profile.json_diff)
            .unwrap_or(self.default_profile.json_diff)
    }

    /// Returns whether differences should lead to a non-zero exit code.
    pub fn fail_on_mismatch(&self) -> bool {
        self.custom_profile
            .and_then(|profile| profile.fail_on_mismatch)
            .unwrap_or(self.default_profile.fail_on_mismatch)
    }

    /// Returns the canonicalizer for this profile's dialect.
    pub fn canonicalizer(&self) -> Canonicalizer {
        self.canonicalizer_for(self.dialect())
    }

    /// Returns the canonicalizer for `dialect`, with this profile's status aliases applied.
    ///
    /// Aliases in the profile take precedence over those in `default`, which in turn take
    /// precedence over the dialect's own table.
    pub fn canonicalizer_for(&self, dialect: LogDialect) -> Canonicalizer {
        let mut canonicalizer = dialect.default_canonicalizer();
        let custom_aliases = self
            .custom_profile
            .into_iter()
            .flat_map(|profile| &profile.status_aliases);
        for (token, outcome) in self.default_profile.status_aliases.iter().chain(custom_aliases) {
            canonicalizer.insert_alias(token, outcome.clone());
        }
        canonicalizer
    }
}

#[derive(Clone, Debug)]
struct DefaultProfileImpl {
    dialect: LogDialect,
    structured_keys: Vec<String>,
    preview_chars: usize,
    status_aliases: BTreeMap<String, Outcome>,
    json_diff: bool,
    fail_on_mismatch: bool,
}

impl DefaultProfileImpl {
    fn new(profile: CustomProfileImpl) -> Self {
        Self {
            dialect: profile.dialect.unwrap_or_default(),
            structured_keys: profile.structured_keys.unwrap_or_else(|| {
                DEFAULT_STRUCTURED_KEYS
                    .iter()
                    .map(|key| (*key).to_owned())
                    .collect()
            }),
            preview_chars: profile.preview_chars.unwrap_or(DEFAULT_PREVIEW_CHARS),
            status_aliases: profile.status_aliases,
            json_diff: profile.json_diff.unwrap_or(true),
            fail_on_mismatch: profile.fail_on_mismatch.unwrap_or(false),
        }
    }
}

#[derive(Clone, Debug, Default)]
struct CustomProfileImpl {
    dialect: Option<LogDialect>,
    structured_keys: Option<Vec<String>>,
    preview_chars: Option<usize>,
    status_aliases: BTreeMap<String, Outcome>,
    json_diff: Option<bool>,
    fail_on_mismatch: Option<bool>,
}

#[derive(Clone, Debug, Deserialize)]
struct ReconcileConfigDeserialize {
    #[serde(default, rename = "profile")]
    profiles: BTreeMap<String, CustomProfileDeserialize>,
}

impl ReconcileConfigDeserialize {
    fn into_config_impl(mut self) -> Result<ReconcileConfig, ConfigParseErrorKind> {
        let default_profile = match self.profiles.remove(ReconcileConfig::DEFAULT_PROFILE) {
            Some(profile) => profile.resolve(ReconcileConfig::DEFAULT_PROFILE)?,
            None => CustomProfileImpl::default(),
        };
        let other_profiles = self
            .profiles
            .into_iter()
            .map(|(name, profile)| {
                let profile = profile.resolve(&name)?;
                Ok((name, profile))
            })
            .collect::<Result<_, ConfigParseErrorKind>>()?;

        Ok(ReconcileConfig {
            default_profile: DefaultProfileImpl::new(default_profile),
            other_profiles,
        })
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct CustomProfileDeserialize {
    #[serde(default)]
    dialect: Option<LogDialect>,
    #[serde(default)]
    structured_keys: Option<Vec<String>>,
    #[serde(default)]
    preview_chars: Option<usize>,
    #[serde(default)]
    status_aliases: BTreeMap<String, String>,
    #[serde(default)]
    json_diff: Option<bool>,
    #[serde(default)]
    fail_on_mismatch: Option<bool>,
}

impl CustomProfileDeserialize {
    fn resolve(self, profile_name: &str) -> Result<CustomProfileImpl, ConfigParseErrorKind> {
        let status_aliases = self
            .status_aliases
            .into_iter()
            .map(|(token, target)| {
                let outcome = Outcome::from(SmolStr::new(target.trim().to_uppercase()));
                if outcome.is_canonical() {
                    Ok((token, outcome))
                } else {
                    Err(ConfigParseErrorKind::InvalidStatusAlias(
                        InvalidStatusAliasError::new(profile_name, token, target),
                    ))
                }
            })
            .collect::<Result<_, _>>()?;

        Ok(CustomProfileImpl {
            dialect: self.dialect,
            structured_keys: self.structured_keys,
            preview_chars: self.preview_chars,
            status_aliases,
            json_diff: self.json_diff,
            fail_on_mismatch: self.fail_on_mismatch,
        })
    }
}
