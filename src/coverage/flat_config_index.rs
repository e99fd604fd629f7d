//! Lookups over a [`FlatConfigList`].
//!
//! The [`FlatConfigIndex`] is built once, up front, and then queried either
//! by program or by joining against a list of [`BuildMetadata`].

use std::collections::{HashMap, hash_map::Entry};

use serde::Serialize;

use crate::{
    coverage::Error,
    domain::{BuildMetadata, FlatConfig, FlatConfigList, PortageBuildTarget},
};

/// The key flat configs and build metadata are joined on.
///
/// Both components are lowercased, so the join is case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct JoinKey {
    /// Lowercased Portage overlay.
    pub overlay: String,
    /// Lowercased Portage profile.
    pub profile: String,
}

impl JoinKey {
    /// Derives the key of an overlay and profile.
    #[must_use]
    pub fn new(overlay: &str, profile: &str) -> Self {
        Self {
            overlay: overlay.to_lowercase(),
            profile: profile.to_lowercase(),
        }
    }

    fn from_build_target(target: &PortageBuildTarget) -> Self {
        Self::new(&target.overlay_name, &target.profile_name)
    }
}

/// A flat config and the build metadata sharing its overlay and profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct JoinedConfig<'a> {
    /// The device configuration.
    pub flat_config: &'a FlatConfig,
    /// The build metadata of the configuration's build target.
    pub build_metadata: &'a BuildMetadata,
}

/// An index over a [`FlatConfigList`].
#[derive(Debug, Clone)]
pub struct FlatConfigIndex<'a> {
    configs: &'a [FlatConfig],
    /// Lowercased program name to the program's configs, in input order.
    by_program: HashMap<String, Vec<&'a FlatConfig>>,
}

impl<'a> FlatConfigIndex<'a> {
    /// Builds the index.
    #[must_use]
    pub fn new(flat_config_list: &'a FlatConfigList) -> Self {
        let mut by_program: HashMap<String, Vec<&'a FlatConfig>> = HashMap::new();
        for config in &flat_config_list.values {
            by_program
                .entry(config.program.to_lowercase())
                .or_default()
                .push(config);
        }

        Self {
            configs: &flat_config_list.values,
            by_program,
        }
    }

    /// The configs of `program`, compared case-insensitively.
    ///
    /// Returns `None` if the program has no configs.
    #[must_use]
    pub fn program_configs(&self, program: &str) -> Option<&[&'a FlatConfig]> {
        self.by_program
            .get(&program.to_lowercase())
            .map(Vec::as_slice)
    }

    /// Joins every flat config with the build metadata sharing its Portage
    /// overlay and profile.
    ///
    /// A flat config without an overlay is joined on its program name
    /// instead. Flat configs with no matching build metadata are common, so
    /// they are dropped with a warning rather than failing the join.
    ///
    /// # Errors
    ///
    /// - [`Error::MissingOverlay`] if a build metadata entry has no overlay
    /// - [`Error::DuplicateBuildMetadata`] if two build metadata entries share
    ///   a key
    /// - [`Error::MissingJoinKey`] if a flat config has neither an overlay
    ///   nor a program
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn join_with_build_metadata<'b>(
        &self,
        build_metadata_list: &'b [BuildMetadata],
    ) -> Result<Vec<JoinedConfig<'b>>, Error>
    where
        'a: 'b,
    {
        let mut metadata_by_key: HashMap<JoinKey, &'b BuildMetadata> =
            HashMap::with_capacity(build_metadata_list.len());

        for metadata in build_metadata_list {
            if metadata.overlay_name().is_empty() {
                return Err(Error::MissingOverlay);
            }

            match metadata_by_key.entry(JoinKey::from_build_target(&metadata.build_target)) {
                Entry::Occupied(entry) => {
                    let JoinKey { overlay, profile } = entry.key().clone();
                    return Err(Error::DuplicateBuildMetadata { overlay, profile });
                }
                Entry::Vacant(entry) => {
                    entry.insert(metadata);
                }
            }
        }

        let mut joined = Vec::new();

        for config in self.configs {
            let target = &config.build_target;
            let overlay = if target.overlay_name.is_empty() {
                config.program.as_str()
            } else {
                target.overlay_name.as_str()
            };

            if overlay.is_empty() {
                return Err(Error::MissingJoinKey {
                    design: config.hw_design.clone(),
                });
            }

            let key = JoinKey::new(overlay, &target.profile_name);
            let Some(&build_metadata) = metadata_by_key.get(&key) else {
                tracing::warn!(
                    overlay = %key.overlay,
                    profile = %key.profile,
                    "no BuildMetadata for key"
                );
                continue;
            };

            joined.push(JoinedConfig {
                flat_config: config,
                build_metadata,
            });
        }

        Ok(joined)
    }
}
