//! Groups and Versions: the static description of the Kind graph.

use crate::kind::Kind;

/// Version is one schema generation within a Group.
///
/// Its position in the Group's list, not its name, defines which versions
/// are adjacent.
#[derive(Debug, Clone)]
pub struct Version {
    name: String,
    added_in: Option<String>,
    preferred: bool,
    deprecated: bool,
    kinds: Vec<Box<dyn Kind>>,
}

impl Version {
    pub fn new(name: impl Into<String>) -> Self {
        Version {
            name: name.into(),
            added_in: None,
            preferred: false,
            deprecated: false,
            kinds: Vec::new(),
        }
    }

    /// Sets the component version this API version first shipped in.
    pub fn added_in(mut self, component_version: impl Into<String>) -> Self {
        self.added_in = Some(component_version.into());
        self
    }

    /// Marks this version as the one new writers should use.
    pub fn preferred(mut self) -> Self {
        self.preferred = true;
        self
    }

    pub fn deprecated(mut self) -> Self {
        self.deprecated = true;
        self
    }

    /// Registers `T`, keeping its zero value as the factory for new objects.
    pub fn kind<T: Kind + Default>(mut self) -> Self {
        let mut kind = T::default();
        kind.set_default_type_meta();
        self.kinds.push(Box::new(kind));
        self
    }

    /// Registers a prototype object as is.
    pub fn with_kind(mut self, kind: Box<dyn Kind>) -> Self {
        self.kinds.push(kind);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn added_in_tag(&self) -> Option<&str> {
        self.added_in.as_deref()
    }

    pub fn is_preferred(&self) -> bool {
        self.preferred
    }

    pub fn is_deprecated(&self) -> bool {
        self.deprecated
    }

    /// Returns the registered Kinds in registration order.
    pub fn kinds(&self) -> &[Box<dyn Kind>] {
        &self.kinds
    }

    /// Returns the registered Kind with the given name.
    pub fn find_kind(&self, kind: &str) -> Option<&dyn Kind> {
        self.kinds
            .iter()
            .find(|k| k.group_version_kind().kind == kind)
            .map(|k| k.as_ref())
    }
}

/// Group is a family of related versioned Kinds.
#[derive(Debug, Clone)]
pub struct Group {
    name: String,
    added_in: Option<String>,
    deprecated: bool,
    versions: Vec<Version>,
    pub(crate) hub: Option<usize>,
}

impl Group {
    pub fn new(name: impl Into<String>) -> Self {
        Group {
            name: name.into(),
            added_in: None,
            deprecated: false,
            versions: Vec::new(),
            hub: None,
        }
    }

    pub fn added_in(mut self, component_version: impl Into<String>) -> Self {
        self.added_in = Some(component_version.into());
        self
    }

    pub fn deprecated(mut self) -> Self {
        self.deprecated = true;
        self
    }

    /// Appends the next (newer) version.
    pub fn version(mut self, version: Version) -> Self {
        self.versions.push(version);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn added_in_tag(&self) -> Option<&str> {
        self.added_in.as_deref()
    }

    pub fn is_deprecated(&self) -> bool {
        self.deprecated
    }

    /// Returns the versions, oldest first.
    pub fn versions(&self) -> &[Version] {
        &self.versions
    }

    pub fn version_index(&self, version: &str) -> Option<usize> {
        self.versions.iter().position(|v| v.name == version)
    }

    pub fn find_version(&self, version: &str) -> Option<&Version> {
        self.versions.iter().find(|v| v.name == version)
    }

    /// Returns the index of the hub version when the group converts through
    /// a hub.
    pub fn hub(&self) -> Option<usize> {
        self.hub
    }

    pub fn preferred_version(&self) -> Option<&Version> {
        self.versions.iter().find(|v| v.preferred)
    }

    /// Version through which conversions enter from or leave toward the
    /// previous group.
    pub fn lower_junction(&self) -> usize {
        self.hub.unwrap_or(0)
    }

    /// Version through which conversions enter from or leave toward the next
    /// group.
    pub fn upper_junction(&self) -> usize {
        self.hub
            .unwrap_or_else(|| self.versions.len().saturating_sub(1))
    }
}

/// Finds the version every other version of the group converts through.
///
/// A version H is the hub when every Kind of every other version is a
/// [`Spoke`](crate::kind::Spoke) whose `convert_from_hub_spec` is a non-empty
/// spec located at H. The first such version wins.
pub(crate) fn detect_hub(group: &Group) -> Option<usize> {
    if group.versions.len() < 2 {
        return None;
    }
    (0..group.versions.len()).find(|&h| {
        let hub = &group.versions[h].name;
        group
            .versions
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != h)
            .all(|(_, v)| {
                !v.kinds.is_empty()
                    && v.kinds.iter().all(|k| match k.as_spoke() {
                        Some(spoke) => {
                            let spec = spoke.convert_from_hub_spec();
                            !spec.is_empty()
                                && spec.iter().all(|s| {
                                    let gvk = s.group_version_kind();
                                    gvk.group == group.name && gvk.version == *hub
                                })
                        }
                        None => false,
                    })
            })
    })
}
