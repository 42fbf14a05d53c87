//! Test-only Kinds shared by the registry and converter tests.

use crate::convert::Converter;
use crate::error::Result;
use crate::kind::{
    convert_fields, Convertible, Defaultable, Identity, Kind, KindSpec, Spoke, TypeMeta,
    Validatable,
};
use crate::registry::{Group, Registry, Version};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

macro_rules! test_kind {
    ($name:ident, $group:expr, $version:expr, $kind:expr, { $($field:ident),* }) => {
        #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
        pub struct $name {
            #[serde(flatten)]
            pub type_meta: TypeMeta,
            $(
                #[serde(default, skip_serializing_if = "String::is_empty")]
                pub $field: String,
            )*
        }

        crate::impl_identity!($name, $group, $version, $kind);

        impl Defaultable for $name {}
        impl Validatable for $name {}
        impl Kind for $name {}
    };
}

fn first(input: &KindSpec) -> Result<&dyn Kind> {
    input
        .first()
        .ok_or_else(|| crate::error::ConvertError::malformed("empty input spec"))
}

// Linear chain: Foo{a} <-> Bar{a,b} <-> Zed{a,b,c}.

pub const CHAIN: &str = "testgroup";

test_kind!(Foo, CHAIN, "v1beta1", "Foo", { a });
test_kind!(Bar, CHAIN, "v1beta2", "Bar", { a, b });
test_kind!(Zed, CHAIN, "v1beta3", "Zed", { a, b, c });

impl Convertible for Foo {}

impl Convertible for Bar {
    fn convert_up(&self, cv: &Converter, input: KindSpec) -> Result<KindSpec> {
        let mut bar: Bar = convert_fields(first(&input)?)?;
        if let Some(cached) = cv.cached::<Bar>() {
            bar.b = cached.b;
        }
        Ok(KindSpec::new().with_kind(bar))
    }

    fn convert_down(&self, cv: &Converter, input: KindSpec) -> Result<KindSpec> {
        let bar = first(&input)?;
        cv.add_to_cache(bar);
        let foo: Foo = convert_fields(bar)?;
        Ok(KindSpec::new().with_kind(foo))
    }

    fn convert_up_spec(&self) -> KindSpec {
        KindSpec::new().with_default::<Foo>()
    }

    fn convert_down_spec(&self) -> KindSpec {
        KindSpec::new().with_default::<Bar>()
    }
}

impl Convertible for Zed {
    fn convert_up(&self, cv: &Converter, input: KindSpec) -> Result<KindSpec> {
        let mut zed: Zed = convert_fields(first(&input)?)?;
        if let Some(cached) = cv.cached::<Zed>() {
            zed.c = cached.c;
        }
        Ok(KindSpec::new().with_kind(zed))
    }

    fn convert_down(&self, cv: &Converter, input: KindSpec) -> Result<KindSpec> {
        let zed = first(&input)?;
        cv.add_to_cache(zed);
        let bar: Bar = convert_fields(zed)?;
        Ok(KindSpec::new().with_kind(bar))
    }

    fn convert_up_spec(&self) -> KindSpec {
        KindSpec::new().with_default::<Bar>()
    }

    fn convert_down_spec(&self) -> KindSpec {
        KindSpec::new().with_default::<Zed>()
    }
}

pub fn chain_group() -> Group {
    Group::new(CHAIN)
        .version(Version::new("v1beta1").kind::<Foo>())
        .version(Version::new("v1beta2").kind::<Bar>())
        .version(Version::new("v1beta3").preferred().kind::<Zed>())
}

// A field that only exists in the middle version: Mid1{a} <-> Mid2{a,f} <-> Mid3{a}.

pub const MIDDLE: &str = "middle.example.io";

test_kind!(Mid1, MIDDLE, "v1", "Mid", { a });
test_kind!(Mid2, MIDDLE, "v2", "Mid", { a, f });
test_kind!(Mid3, MIDDLE, "v3", "Mid", { a });

impl Convertible for Mid1 {}

impl Convertible for Mid2 {
    fn convert_up(&self, cv: &Converter, input: KindSpec) -> Result<KindSpec> {
        let mut mid: Mid2 = convert_fields(first(&input)?)?;
        if let Some(cached) = cv.cached::<Mid2>() {
            mid.f = cached.f;
        }
        Ok(KindSpec::new().with_kind(mid))
    }

    fn convert_down(&self, cv: &Converter, input: KindSpec) -> Result<KindSpec> {
        let mid = first(&input)?;
        cv.add_to_cache(mid);
        let out: Mid1 = convert_fields(mid)?;
        Ok(KindSpec::new().with_kind(out))
    }

    fn convert_up_spec(&self) -> KindSpec {
        KindSpec::new().with_default::<Mid1>()
    }

    fn convert_down_spec(&self) -> KindSpec {
        KindSpec::new().with_default::<Mid2>()
    }
}

impl Convertible for Mid3 {
    // Going up drops f, so the richer input is cached first.
    fn convert_up(&self, cv: &Converter, input: KindSpec) -> Result<KindSpec> {
        let mid = first(&input)?;
        cv.add_to_cache(mid);
        let out: Mid3 = convert_fields(mid)?;
        Ok(KindSpec::new().with_kind(out))
    }

    fn convert_down(&self, cv: &Converter, input: KindSpec) -> Result<KindSpec> {
        let mut mid: Mid2 = convert_fields(first(&input)?)?;
        if let Some(cached) = cv.cached::<Mid2>() {
            mid.f = cached.f;
        }
        Ok(KindSpec::new().with_kind(mid))
    }

    fn convert_up_spec(&self) -> KindSpec {
        KindSpec::new().with_default::<Mid2>()
    }

    fn convert_down_spec(&self) -> KindSpec {
        KindSpec::new().with_default::<Mid3>()
    }
}

pub fn middle_group() -> Group {
    Group::new(MIDDLE)
        .version(Version::new("v1").kind::<Mid1>())
        .version(Version::new("v2").preferred().kind::<Mid2>())
        .version(Version::new("v3").kind::<Mid3>())
}

// One logical object split into two siblings: Single{a} <-> [Bar1{a}, Bar2{b}].

pub const SPLIT: &str = "split.example.io";

test_kind!(Single, SPLIT, "v1beta1", "Foo", { a });
test_kind!(Bar1, SPLIT, "v1beta2", "Bar1", { a });
test_kind!(Bar2, SPLIT, "v1beta2", "Bar2", { b });

impl Convertible for Single {}

impl Convertible for Bar1 {
    fn convert_up(&self, cv: &Converter, input: KindSpec) -> Result<KindSpec> {
        let bar1: Bar1 = convert_fields(first(&input)?)?;
        let bar2 = cv.cached::<Bar2>().unwrap_or_default();
        Ok(KindSpec::new().with_kind(bar1).with_kind(bar2))
    }

    fn convert_down(&self, cv: &Converter, mut input: KindSpec) -> Result<KindSpec> {
        let owner = self.group_version_kind();
        let bar1 = input.require::<Bar1>(&owner)?;
        let bar2 = input.require::<Bar2>(&owner)?;
        cv.add_to_cache(&bar2);
        let single: Single = convert_fields(&bar1)?;
        Ok(KindSpec::new().with_kind(single))
    }

    fn convert_up_spec(&self) -> KindSpec {
        KindSpec::new().with_default::<Single>()
    }

    fn convert_down_spec(&self) -> KindSpec {
        KindSpec::new().with_default::<Bar1>().with_default::<Bar2>()
    }
}

impl Convertible for Bar2 {}

pub fn split_group() -> Group {
    Group::new(SPLIT)
        .version(Version::new("v1beta1").kind::<Single>())
        .version(Version::new("v1beta2").preferred().kind::<Bar1>().kind::<Bar2>())
}

// Three groups spliced together; the middle one converts through a hub.

pub const GROUP0: &str = "group0.example.io";
pub const GROUP1: &str = "group1.example.io";
pub const GROUP2: &str = "group2.example.io";

test_kind!(Que, GROUP0, "v1", "Que", { m });
test_kind!(HubSpoke1, GROUP1, "v1", "Hub", { x });
test_kind!(HubHub, GROUP1, "v2", "Hub", { x });
test_kind!(HubSpoke3, GROUP1, "v3", "Hub", { x, y });
test_kind!(Baz, GROUP2, "v1", "Baz", { a });

impl Convertible for Que {}

impl Convertible for HubHub {
    fn convert_up(&self, _cv: &Converter, input: KindSpec) -> Result<KindSpec> {
        let owner = self.group_version_kind();
        let mut input = input;
        let que = input.require::<Que>(&owner)?;
        Ok(KindSpec::new().with_kind(HubHub {
            x: que.m,
            ..Default::default()
        }))
    }

    fn convert_down(&self, _cv: &Converter, input: KindSpec) -> Result<KindSpec> {
        let owner = self.group_version_kind();
        let mut input = input;
        let hub = input.require::<HubHub>(&owner)?;
        Ok(KindSpec::new().with_kind(Que {
            m: hub.x,
            ..Default::default()
        }))
    }

    fn convert_up_spec(&self) -> KindSpec {
        KindSpec::new().with_default::<Que>()
    }

    fn convert_down_spec(&self) -> KindSpec {
        KindSpec::new().with_default::<HubHub>()
    }
}

impl Convertible for HubSpoke1 {
    fn as_spoke(&self) -> Option<&dyn Spoke> {
        Some(self)
    }
}

impl Spoke for HubSpoke1 {
    fn convert_to_hub(&self, _cv: &Converter, input: KindSpec) -> Result<KindSpec> {
        let hub: HubHub = convert_fields(first(&input)?)?;
        Ok(KindSpec::new().with_kind(hub))
    }

    fn convert_from_hub(&self, _cv: &Converter, input: KindSpec) -> Result<KindSpec> {
        let spoke: HubSpoke1 = convert_fields(first(&input)?)?;
        Ok(KindSpec::new().with_kind(spoke))
    }

    fn convert_to_hub_spec(&self) -> KindSpec {
        KindSpec::new().with_default::<HubSpoke1>()
    }

    fn convert_from_hub_spec(&self) -> KindSpec {
        KindSpec::new().with_default::<HubHub>()
    }
}

impl Convertible for HubSpoke3 {
    fn as_spoke(&self) -> Option<&dyn Spoke> {
        Some(self)
    }
}

impl Spoke for HubSpoke3 {
    fn convert_to_hub(&self, cv: &Converter, input: KindSpec) -> Result<KindSpec> {
        let spoke = first(&input)?;
        cv.add_to_cache(spoke);
        let hub: HubHub = convert_fields(spoke)?;
        Ok(KindSpec::new().with_kind(hub))
    }

    fn convert_from_hub(&self, cv: &Converter, input: KindSpec) -> Result<KindSpec> {
        let mut spoke: HubSpoke3 = convert_fields(first(&input)?)?;
        if let Some(cached) = cv.cached::<HubSpoke3>() {
            spoke.y = cached.y;
        }
        Ok(KindSpec::new().with_kind(spoke))
    }

    fn convert_to_hub_spec(&self) -> KindSpec {
        KindSpec::new().with_default::<HubSpoke3>()
    }

    fn convert_from_hub_spec(&self) -> KindSpec {
        KindSpec::new().with_default::<HubHub>()
    }
}

impl Convertible for Baz {
    fn convert_up(&self, _cv: &Converter, mut input: KindSpec) -> Result<KindSpec> {
        let hub = input.require::<HubHub>(&self.group_version_kind())?;
        Ok(KindSpec::new().with_kind(Baz {
            a: hub.x,
            ..Default::default()
        }))
    }

    fn convert_down(&self, _cv: &Converter, mut input: KindSpec) -> Result<KindSpec> {
        let baz = input.require::<Baz>(&self.group_version_kind())?;
        Ok(KindSpec::new().with_kind(HubHub {
            x: baz.a,
            ..Default::default()
        }))
    }

    fn convert_up_spec(&self) -> KindSpec {
        KindSpec::new().with_default::<HubHub>()
    }

    fn convert_down_spec(&self) -> KindSpec {
        KindSpec::new().with_default::<Baz>()
    }
}

pub fn spliced_groups() -> Vec<Group> {
    vec![
        Group::new(GROUP0).version(Version::new("v1").preferred().kind::<Que>()),
        Group::new(GROUP1)
            .version(Version::new("v1").kind::<HubSpoke1>())
            .version(Version::new("v2").preferred().kind::<HubHub>())
            .version(Version::new("v3").kind::<HubSpoke3>()),
        Group::new(GROUP2).version(Version::new("v1").preferred().kind::<Baz>()),
    ]
}

pub fn converter(groups: Vec<Group>) -> Converter {
    let registry = Registry::new(groups).expect("valid test registry");
    Converter::new(Arc::new(registry))
}
