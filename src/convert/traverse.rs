//! Walking the version graph one hop at a time.
//!
//! Within a group the versions form a path; a group whose spokes all
//! convert through one hub version is crossed in at most two legs instead.
//! Groups are spliced into a longer path at their junction versions: the
//! hub, or the first and last versions of a linear group.

use super::converter::Converter;
use crate::error::{ConvertError, Result};
use crate::kind::KindSpec;
use crate::registry::Version;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Position {
    group: usize,
    version: usize,
}

impl Position {
    fn new(group: usize, version: usize) -> Self {
        Position { group, version }
    }
}

impl Converter {
    /// Converts `spec` to `target_group/target_version`.
    ///
    /// The spec must be non-empty, registered and located at a single
    /// group/version. Converting to the spec's own version returns it
    /// unchanged. Any failed hop aborts the whole conversion.
    pub fn convert_to(
        &self,
        spec: KindSpec,
        target_group: &str,
        target_version: &str,
    ) -> Result<KindSpec> {
        let source = self.locate(&spec)?;
        let (group, version) = self.registry.position(target_group, target_version)?;
        let target = Position::new(group, version);
        if source == target {
            return Ok(spec);
        }
        debug!(
            from = %self.describe(source),
            to = %self.describe(target),
            "converting [{}]",
            spec
        );

        let mut spec = spec;
        let mut current = source;
        while current.group != target.group {
            let group = self.registry.group_at(current.group);
            if current.group < target.group {
                let exit = Position::new(current.group, group.upper_junction());
                spec = self.walk_group(spec, current, exit.version)?;
                let next = self.registry.group_at(current.group + 1);
                let entry = Position::new(current.group + 1, next.lower_junction());
                spec = self.step_up(spec, exit, entry)?;
                current = entry;
            } else {
                let exit = Position::new(current.group, group.lower_junction());
                spec = self.walk_group(spec, current, exit.version)?;
                let prev = self.registry.group_at(current.group - 1);
                let entry = Position::new(current.group - 1, prev.upper_junction());
                spec = self.step_down(spec, exit, entry)?;
                current = entry;
            }
        }
        self.walk_group(spec, current, target.version)
    }

    /// Converts `spec` to the newest version of `group`.
    pub fn convert_to_latest(&self, spec: KindSpec, group: &str) -> Result<KindSpec> {
        let version = self.registry.latest_version(group)?;
        self.convert_to(spec, group, version.name())
    }

    /// Converts `spec` to the oldest version of `group`.
    pub fn convert_to_oldest(&self, spec: KindSpec, group: &str) -> Result<KindSpec> {
        let version = self.registry.oldest_version(group)?;
        self.convert_to(spec, group, version.name())
    }

    /// Converts `spec` to the preferred version of `group`.
    pub fn convert_to_preferred(&self, spec: KindSpec, group: &str) -> Result<KindSpec> {
        let version = self.registry.preferred_version(group)?;
        self.convert_to(spec, group, version.name())
    }

    fn locate(&self, spec: &KindSpec) -> Result<Position> {
        let head = spec
            .head()
            .ok_or_else(|| ConvertError::malformed("cannot convert an empty spec"))?;
        spec.validate()?;
        for gvk in spec.identities() {
            self.registry.lookup(&gvk)?;
        }
        let pos = self.registry.lookup(&head)?;
        Ok(Position::new(pos.group, pos.version))
    }

    fn version_at(&self, pos: Position) -> &Version {
        &self.registry.group_at(pos.group).versions()[pos.version]
    }

    fn describe(&self, pos: Position) -> String {
        format!(
            "{}/{}",
            self.registry.group_at(pos.group).name(),
            self.version_at(pos).name()
        )
    }

    fn walk_group(&self, spec: KindSpec, from: Position, to_version: usize) -> Result<KindSpec> {
        if from.version == to_version {
            return Ok(spec);
        }
        let to = Position::new(from.group, to_version);

        if let Some(hub) = self.registry.group_at(from.group).hub() {
            let hub = Position::new(from.group, hub);
            let trip = format!(
                "{} -> {} -> {}",
                self.describe(from),
                self.describe(hub),
                self.describe(to)
            );
            let mut spec = spec;
            if from != hub {
                spec = self.to_hub(spec, from, hub, &trip)?;
            }
            if to != hub {
                spec = self.from_hub(spec, hub, to, &trip)?;
            }
            return Ok(spec);
        }

        let step: isize = if to_version > from.version { 1 } else { -1 };
        let mut spec = spec;
        let mut current = from;
        while current != to {
            let next = Position::new(from.group, current.version.wrapping_add_signed(step));
            spec = if step > 0 {
                self.step_up(spec, current, next)?
            } else {
                self.step_down(spec, current, next)?
            };
            current = next;
        }
        Ok(spec)
    }

    /// Converts into `to` using the Kind of `to` whose up spec matches.
    fn step_up(&self, spec: KindSpec, from: Position, to: Position) -> Result<KindSpec> {
        let hop = format!("{} -> {}", self.describe(from), self.describe(to));
        let owner = self
            .version_at(to)
            .kinds()
            .iter()
            .find(|k| k.convert_up_spec() == spec)
            .ok_or_else(|| ConvertError::no_match(spec.to_string(), hop.as_str()))?;

        debug!(hop = %hop, owner = %owner.group_version_kind(), "converting up");
        let input = spec.to_string();
        let out = owner
            .convert_up(self, spec)
            .map_err(|e| ConvertError::hop(input.as_str(), hop.as_str(), e))?;
        self.check_output(out, to, &hop)
    }

    /// Converts out of `from` using the Kind of `from` whose down spec
    /// matches.
    fn step_down(&self, spec: KindSpec, from: Position, to: Position) -> Result<KindSpec> {
        let hop = format!("{} -> {}", self.describe(from), self.describe(to));
        let owner = self
            .version_at(from)
            .kinds()
            .iter()
            .find(|k| k.convert_down_spec() == spec)
            .ok_or_else(|| ConvertError::no_match(spec.to_string(), hop.as_str()))?;

        debug!(hop = %hop, owner = %owner.group_version_kind(), "converting down");
        let input = spec.to_string();
        let out = owner
            .convert_down(self, spec)
            .map_err(|e| ConvertError::hop(input.as_str(), hop.as_str(), e))?;
        self.check_output(out, to, &hop)
    }

    fn to_hub(
        &self,
        spec: KindSpec,
        from: Position,
        hub: Position,
        trip: &str,
    ) -> Result<KindSpec> {
        let hop = format!("to hub {} of {}", self.describe(hub), trip);
        let spoke = self
            .version_at(from)
            .kinds()
            .iter()
            .filter_map(|k| k.as_spoke())
            .find(|s| s.convert_to_hub_spec() == spec)
            .ok_or_else(|| ConvertError::no_match(spec.to_string(), hop.as_str()))?;

        debug!(hop = %hop, "converting to hub");
        let input = spec.to_string();
        let out = spoke
            .convert_to_hub(self, spec)
            .map_err(|e| ConvertError::hop(input.as_str(), hop.as_str(), e))?;
        self.check_output(out, hub, &hop)
    }

    fn from_hub(
        &self,
        spec: KindSpec,
        hub: Position,
        to: Position,
        trip: &str,
    ) -> Result<KindSpec> {
        let hop = format!("from hub {} of {}", self.describe(hub), trip);
        let spoke = self
            .version_at(to)
            .kinds()
            .iter()
            .filter_map(|k| k.as_spoke())
            .find(|s| s.convert_from_hub_spec() == spec)
            .ok_or_else(|| ConvertError::no_match(spec.to_string(), hop.as_str()))?;

        debug!(hop = %hop, "converting from hub");
        let input = spec.to_string();
        let out = spoke
            .convert_from_hub(self, spec)
            .map_err(|e| ConvertError::hop(input.as_str(), hop.as_str(), e))?;
        self.check_output(out, to, &hop)
    }

    /// Checks that a hop produced registered objects at `expected` and
    /// rewrites their headers.
    fn check_output(&self, mut out: KindSpec, expected: Position, hop: &str) -> Result<KindSpec> {
        let located = !out.is_empty()
            && out.identities().iter().all(|gvk| {
                self.registry
                    .lookup(gvk)
                    .map(|pos| Position::new(pos.group, pos.version) == expected)
                    .unwrap_or(false)
            });
        if !located {
            return Err(ConvertError::invalid_output(
                out.to_string(),
                self.describe(expected),
                hop,
            ));
        }
        out.set_default_type_meta();
        Ok(out)
    }
}
