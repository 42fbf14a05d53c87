//! The validated, immutable Kind registry.

use super::group::{detect_hub, Group, Version};
use super::validation::{conversion_specs, validate_groups};
use super::version::parse_generic;
use crate::error::{ConvertError, Result};
use crate::kind::{GroupVersionKind, Kind};
use once_cell::sync::OnceCell;
use std::collections::HashMap;
use tracing::debug;

/// Position of a registered Kind: group, version and kind indexes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KindPosition {
    pub group: usize,
    pub version: usize,
    pub kind: usize,
}

/// Registry holds the validated Groups.
///
/// It is read-only once built, so a single registry can back any number of
/// converters. The identity index is built on first lookup.
#[derive(Debug)]
pub struct Registry {
    groups: Vec<Group>,

    index: OnceCell<HashMap<GroupVersionKind, KindPosition>>,
}

impl Registry {
    /// Validates the groups and builds a registry.
    ///
    /// This is the only place malformed registrations are caught; the rest of
    /// the engine relies on what it checks.
    pub fn new(groups: Vec<Group>) -> Result<Registry> {
        validate_groups(&groups)?;

        let mut groups = groups;
        for g in groups.iter_mut() {
            g.hub = detect_hub(g);
            if let Some(hub) = g.hub {
                debug!(group = g.name(), hub = g.versions()[hub].name(), "detected hub version");
            }
        }

        let registry = Registry {
            groups,
            index: OnceCell::new(),
        };
        registry.validate_spec_references()?;
        Ok(registry)
    }

    /// Every object named in a conversion spec must itself be registered.
    fn validate_spec_references(&self) -> Result<()> {
        for g in &self.groups {
            for v in g.versions() {
                for k in v.kinds() {
                    for (label, spec) in conversion_specs(k.as_ref()) {
                        for gvk in spec.identities() {
                            if !self.contains(&gvk) {
                                return Err(ConvertError::registration(format!(
                                    "{} of {} names unregistered {}",
                                    label,
                                    k.group_version_kind(),
                                    gvk
                                )));
                            }
                        }
                    }
                }
            }
        }
        Ok(())
    }

    fn index(&self) -> &HashMap<GroupVersionKind, KindPosition> {
        self.index.get_or_init(|| {
            let mut index = HashMap::new();
            for (gi, g) in self.groups.iter().enumerate() {
                for (vi, v) in g.versions().iter().enumerate() {
                    for (ki, k) in v.kinds().iter().enumerate() {
                        index.insert(
                            k.group_version_kind(),
                            KindPosition {
                                group: gi,
                                version: vi,
                                kind: ki,
                            },
                        );
                    }
                }
            }
            index
        })
    }

    /// Returns the groups in registration order.
    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    pub fn group(&self, group: &str) -> Result<&Group> {
        self.group_index(group).map(|i| &self.groups[i])
    }

    pub fn group_index(&self, group: &str) -> Result<usize> {
        self.groups
            .iter()
            .position(|g| g.name() == group)
            .ok_or_else(|| ConvertError::unknown("group", group))
    }

    pub(crate) fn group_at(&self, index: usize) -> &Group {
        &self.groups[index]
    }

    pub fn version(&self, group: &str, version: &str) -> Result<&Version> {
        self.group(group)?
            .find_version(version)
            .ok_or_else(|| ConvertError::unknown("version", format!("{}/{}", group, version)))
    }

    /// Returns the group and version indexes of `group/version`.
    pub fn position(&self, group: &str, version: &str) -> Result<(usize, usize)> {
        let gi = self.group_index(group)?;
        let vi = self.groups[gi]
            .version_index(version)
            .ok_or_else(|| ConvertError::unknown("version", format!("{}/{}", group, version)))?;
        Ok((gi, vi))
    }

    /// Finds a registered Kind.
    pub fn lookup(&self, gvk: &GroupVersionKind) -> Result<KindPosition> {
        if let Some(pos) = self.index().get(gvk) {
            return Ok(*pos);
        }
        self.position(&gvk.group, &gvk.version)?;
        Err(ConvertError::unknown("kind", gvk.to_string()))
    }

    pub fn contains(&self, gvk: &GroupVersionKind) -> bool {
        self.index().contains_key(gvk)
    }

    /// Returns the registered zero value at `pos`.
    pub fn kind_at(&self, pos: KindPosition) -> &dyn Kind {
        self.groups[pos.group].versions()[pos.version].kinds()[pos.kind].as_ref()
    }

    /// Returns a new zero value of a registered Kind with its header set.
    pub fn new_object(&self, gvk: &GroupVersionKind) -> Result<Box<dyn Kind>> {
        let pos = self.lookup(gvk)?;
        Ok(self.kind_at(pos).new_kind())
    }

    pub fn is_group_deprecated(&self, group: &str) -> Result<bool> {
        Ok(self.group(group)?.is_deprecated())
    }

    pub fn is_version_deprecated(&self, group: &str, version: &str) -> Result<bool> {
        Ok(self.version(group, version)?.is_deprecated())
    }

    pub fn is_version_preferred(&self, group: &str, version: &str) -> Result<bool> {
        Ok(self.version(group, version)?.is_preferred())
    }

    pub fn preferred_version(&self, group: &str) -> Result<&Version> {
        let g = self.group(group)?;
        g.preferred_version()
            .ok_or_else(|| ConvertError::unknown("preferred version of group", group))
    }

    pub fn latest_version(&self, group: &str) -> Result<&Version> {
        let g = self.group(group)?;
        g.versions()
            .last()
            .ok_or_else(|| ConvertError::unknown("latest version of group", group))
    }

    pub fn oldest_version(&self, group: &str) -> Result<&Version> {
        let g = self.group(group)?;
        g.versions()
            .first()
            .ok_or_else(|| ConvertError::unknown("oldest version of group", group))
    }

    /// Returns the newest API version of `group` available in the given
    /// component version.
    ///
    /// A version is available when its `added_in` tag is at most
    /// `component_version`; versions without a tag are always available.
    /// With `use_preferred` only the preferred version may be returned.
    pub fn api_version_for_component_version(
        &self,
        group: &str,
        component_version: &str,
        use_preferred: bool,
    ) -> Result<&Version> {
        let g = self.group(group)?;
        let component = parse_generic(component_version).map_err(|e| {
            ConvertError::malformed(format!("cannot parse component version: {}", e))
        })?;

        for v in g.versions().iter().rev() {
            if let Some(tag) = v.added_in_tag() {
                // Tags were checked at registration.
                match parse_generic(tag) {
                    Ok(added_in) if component >= added_in => {}
                    _ => continue,
                }
            }
            if use_preferred && !v.is_preferred() {
                continue;
            }
            return Ok(v);
        }
        Err(ConvertError::unknown(
            "API version",
            format!(
                "no supported API version in group {:?} for component version {:?}",
                group, component_version
            ),
        ))
    }
}
