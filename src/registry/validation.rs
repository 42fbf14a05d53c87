//! Eager validation of the static registry.

use super::group::Group;
use super::version::parse_generic;
use crate::error::{ConvertError, Result};
use crate::kind::{Kind, KindSpec};
use std::collections::HashSet;

/// Returns every conversion spec a Kind declares, labelled for error
/// messages.
pub(crate) fn conversion_specs(kind: &dyn Kind) -> Vec<(&'static str, KindSpec)> {
    let mut specs = vec![
        ("convert_up_spec", kind.convert_up_spec()),
        ("convert_down_spec", kind.convert_down_spec()),
    ];
    if let Some(spoke) = kind.as_spoke() {
        specs.push(("convert_to_hub_spec", spoke.convert_to_hub_spec()));
        specs.push(("convert_from_hub_spec", spoke.convert_from_hub_spec()));
    }
    specs
}

/// Validates the structure of a list of groups.
pub fn validate_groups(groups: &[Group]) -> Result<()> {
    if groups.is_empty() {
        return Err(ConvertError::registration("found an empty list of groups"));
    }

    let mut group_names = HashSet::new();
    for g in groups {
        if g.name().is_empty() {
            return Err(ConvertError::registration("found an empty group name"));
        }
        if !group_names.insert(g.name()) {
            return Err(ConvertError::registration(format!(
                "group {:?} is registered more than once",
                g.name()
            )));
        }
        if let Some(tag) = g.added_in_tag() {
            parse_generic(tag).map_err(|e| {
                ConvertError::registration(format!(
                    "could not parse the added-in version for group {:?}: {}",
                    g.name(),
                    e
                ))
            })?;
        }
        if g.versions().is_empty() {
            return Err(ConvertError::registration(format!(
                "group {:?} has no versions",
                g.name()
            )));
        }

        let mut found_preferred = 0;
        let mut found_deprecated = 0;
        let mut version_names = HashSet::new();
        for (i, v) in g.versions().iter().enumerate() {
            if v.name().is_empty() {
                return Err(ConvertError::registration(format!(
                    "group {:?} has a version with empty name at position {}",
                    g.name(),
                    i
                )));
            }
            if !version_names.insert(v.name()) {
                return Err(ConvertError::registration(format!(
                    "group {:?} registers version {:?} more than once",
                    g.name(),
                    v.name()
                )));
            }
            if v.is_preferred() {
                found_preferred += 1;
            }
            if v.is_deprecated() {
                found_deprecated += 1;
            }
            if let Some(tag) = v.added_in_tag() {
                parse_generic(tag).map_err(|e| {
                    ConvertError::registration(format!(
                        "could not parse the added-in version for API version {:?} in group {:?}: {}",
                        v.name(),
                        g.name(),
                        e
                    ))
                })?;
            }

            let mut kind_names = HashSet::new();
            for k in v.kinds() {
                let gvk = k.group_version_kind();
                if gvk.kind.is_empty() {
                    return Err(ConvertError::registration(format!(
                        "empty Kind for object {:?} in {}/{}",
                        k,
                        g.name(),
                        v.name()
                    )));
                }
                if gvk.group != g.name() {
                    return Err(ConvertError::registration(format!(
                        "expected group for {}: {:?}, got: {:?}",
                        gvk.kind,
                        g.name(),
                        gvk.group
                    )));
                }
                if gvk.version != v.name() {
                    return Err(ConvertError::registration(format!(
                        "expected version for {}: {:?}, got: {:?}",
                        gvk.kind,
                        v.name(),
                        gvk.version
                    )));
                }
                if !kind_names.insert(gvk.kind.clone()) {
                    return Err(ConvertError::registration(format!(
                        "{} is registered more than once",
                        gvk
                    )));
                }
                for (label, spec) in conversion_specs(k.as_ref()) {
                    spec.validate().map_err(|e| {
                        ConvertError::registration(format!("error in {} for {}: {}", label, gvk, e))
                    })?;
                }
            }
        }

        if found_preferred != 1 {
            return Err(ConvertError::registration(format!(
                "group {:?} must include exactly one preferred version",
                g.name()
            )));
        }
        if found_deprecated == g.versions().len() {
            return Err(ConvertError::registration(format!(
                "group {:?} must include at least one non-deprecated version",
                g.name()
            )));
        }
    }
    Ok(())
}
