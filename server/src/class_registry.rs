//! Process-start registry of every replicated class: parentage, declared
//! checkout radii, schema component ids, field layouts, and RPC tables.
//!
//! Built once from the schema generator's output and queried read-only
//! afterwards. The checkout-radius constraint is computed here, during
//! construction, and memoized for the lifetime of the registry.

use std::collections::{BTreeMap, HashMap};

use shardspace_shared::{ComponentId, FieldHandle, QueryConstraint};

use crate::{
    error::RegistryError,
    object::{FieldDescriptor, PropertyGroup, RepChangeState},
    rpc::{RpcId, RpcInfo},
};

/// Stable identifier for a replicated class, assigned by the schema
/// generator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(pub u32);

/// Everything the pipeline needs to know about one replicated class.
#[derive(Clone, Debug)]
pub struct ClassInfo {
    pub type_id: TypeId,
    pub parent: Option<TypeId>,
    pub class_path: String,
    /// Declared checkout radius in meters, if the class overrides the
    /// inherited one.
    pub checkout_radius: Option<f64>,
    /// Entities of this class are visible to servers only.
    pub server_only: bool,
    /// Exactly one entity of this class exists per deployment.
    pub singleton: bool,
    /// Data / OwnerOnly / Handover component ids, indexed by
    /// `PropertyGroup::index`. A class with no fields in a group has no
    /// component for it.
    pub schema_components: [Option<ComponentId>; 3],
    pub fields: Vec<FieldDescriptor>,
    pub rpcs: HashMap<RpcId, RpcInfo>,
}

impl ClassInfo {
    pub fn component_id(&self, group: PropertyGroup) -> Option<ComponentId> {
        self.schema_components[group.index()]
    }

    pub fn descriptor_for_handle(&self, handle: FieldHandle) -> Option<&FieldDescriptor> {
        self.fields
            .iter()
            .find(|descriptor| descriptor.handle == handle)
    }

    /// Change state listing every declared field, for creation snapshots.
    pub fn initial_rep_change_state(&self) -> RepChangeState {
        RepChangeState::initial(&self.fields)
    }
}

/// One retained per-type radius override: "within this radius, but only for
/// these component ids" (the type's own data component plus every
/// descendant's).
#[derive(Clone, Debug, PartialEq)]
pub struct CheckoutRadiusOverride {
    pub radius: f64,
    pub components: Vec<ComponentId>,
}

pub struct ClassRegistry {
    classes: HashMap<TypeId, ClassInfo>,
    class_by_component: HashMap<ComponentId, TypeId>,
    level_components: HashMap<String, ComponentId>,
    default_checkout_radius: f64,
    radius_overrides: Vec<CheckoutRadiusOverride>,
    checkout_constraint: QueryConstraint,
}

impl ClassRegistry {
    pub fn builder() -> ClassRegistryBuilder {
        ClassRegistryBuilder::default()
    }

    pub fn class(&self, type_id: TypeId) -> Option<&ClassInfo> {
        self.classes.get(&type_id)
    }

    pub fn class_for_component(&self, component_id: ComponentId) -> Option<&ClassInfo> {
        self.class_by_component
            .get(&component_id)
            .and_then(|type_id| self.classes.get(type_id))
    }

    /// Component id marking actors placed in the named sublevel, or `None`
    /// if the level was never registered.
    pub fn component_id_for_level(&self, level_path: &str) -> Option<ComponentId> {
        self.level_components.get(level_path).copied()
    }

    pub fn default_checkout_radius(&self) -> f64 {
        self.default_checkout_radius
    }

    pub fn radius_overrides(&self) -> &[CheckoutRadiusOverride] {
        &self.radius_overrides
    }

    /// The memoized checkout-radius constraint shared by every entity's
    /// system-defined interest.
    pub fn checkout_radius_constraint(&self) -> &QueryConstraint {
        &self.checkout_constraint
    }
}

#[derive(Default)]
pub struct ClassRegistryBuilder {
    classes: Vec<ClassInfo>,
    level_components: HashMap<String, ComponentId>,
}

impl ClassRegistryBuilder {
    pub fn register(mut self, class: ClassInfo) -> Self {
        self.classes.push(class);
        self
    }

    pub fn register_level(mut self, level_path: &str, component_id: ComponentId) -> Self {
        self.level_components
            .insert(level_path.to_string(), component_id);
        self
    }

    pub fn build(self) -> Result<ClassRegistry, RegistryError> {
        let mut classes: HashMap<TypeId, ClassInfo> = HashMap::new();
        for class in self.classes {
            if classes.insert(class.type_id, class.clone()).is_some() {
                return Err(RegistryError::DuplicateType {
                    type_id: class.type_id,
                });
            }
        }
        for class in classes.values() {
            if let Some(parent) = class.parent {
                if !classes.contains_key(&parent) {
                    return Err(RegistryError::UnknownParent {
                        type_id: class.type_id,
                        parent,
                    });
                }
            }
        }

        let root = classes
            .values()
            .filter(|class| class.parent.is_none())
            .map(|class| class.type_id)
            .min()
            .ok_or(RegistryError::NoRootType)?;
        let default_checkout_radius = classes[&root]
            .checkout_radius
            .ok_or(RegistryError::RootWithoutRadius { type_id: root })?;

        let mut class_by_component = HashMap::new();
        for class in classes.values() {
            for component_id in class.schema_components.iter().flatten() {
                class_by_component.insert(*component_id, class.type_id);
            }
        }

        let radius_overrides = compute_radius_overrides(&classes, root, default_checkout_radius);
        let checkout_constraint =
            build_checkout_constraint(default_checkout_radius, &radius_overrides);

        Ok(ClassRegistry {
            classes,
            class_by_component,
            level_components: self.level_components,
            default_checkout_radius,
            radius_overrides,
            checkout_constraint,
        })
    }
}

/// Walks the type hierarchy ancestors-first, retaining an override only
/// where a type widens the radius that already covers it. A type declaring
/// a radius no larger than its covering ancestor's is subsumed and skipped.
fn compute_radius_overrides(
    classes: &HashMap<TypeId, ClassInfo>,
    root: TypeId,
    default_radius: f64,
) -> Vec<CheckoutRadiusOverride> {
    let mut children: HashMap<TypeId, Vec<TypeId>> = HashMap::new();
    for class in classes.values() {
        if let Some(parent) = class.parent {
            children.entry(parent).or_default().push(class.type_id);
        }
    }

    // Depth-ordered walk so every ancestor's effective radius is settled
    // before its descendants are considered.
    let mut ordered: Vec<TypeId> = classes.keys().copied().collect();
    ordered.sort_by_key(|type_id| (depth(classes, *type_id), *type_id));

    // Retained overrides keyed by radius, so types sharing a widened radius
    // share one constraint entry.
    let mut overrides: BTreeMap<u64, Vec<TypeId>> = BTreeMap::new();
    let mut effective: HashMap<TypeId, f64> = HashMap::new();

    for type_id in ordered {
        let class = &classes[&type_id];
        let covering = class
            .parent
            .map(|parent| effective[&parent])
            .unwrap_or(default_radius);

        let declared = if type_id == root {
            // The root's radius is the default itself, never an override.
            None
        } else {
            class.checkout_radius
        };

        match declared {
            Some(radius) if radius > covering => {
                overrides.entry(radius.to_bits()).or_default().push(type_id);
                effective.insert(type_id, radius);
            }
            _ => {
                effective.insert(type_id, covering);
            }
        }
    }

    overrides
        .into_iter()
        .map(|(radius_bits, type_ids)| {
            let mut components = Vec::new();
            for type_id in type_ids {
                collect_data_components(classes, &children, type_id, &mut components);
            }
            components.sort_unstable();
            components.dedup();
            CheckoutRadiusOverride {
                radius: f64::from_bits(radius_bits),
                components,
            }
        })
        .collect()
}

/// Data component ids of `type_id` and all its descendants.
fn collect_data_components(
    classes: &HashMap<TypeId, ClassInfo>,
    children: &HashMap<TypeId, Vec<TypeId>>,
    type_id: TypeId,
    out: &mut Vec<ComponentId>,
) {
    if let Some(component_id) = classes[&type_id].component_id(PropertyGroup::Data) {
        out.push(component_id);
    }
    if let Some(child_ids) = children.get(&type_id) {
        for child in child_ids {
            collect_data_components(classes, children, *child, out);
        }
    }
}

fn depth(classes: &HashMap<TypeId, ClassInfo>, mut type_id: TypeId) -> usize {
    let mut depth = 0;
    while let Some(parent) = classes[&type_id].parent {
        depth += 1;
        type_id = parent;
    }
    depth
}

fn build_checkout_constraint(
    default_radius: f64,
    overrides: &[CheckoutRadiusOverride],
) -> QueryConstraint {
    let mut terms = vec![QueryConstraint::RelativeCylinder {
        radius: default_radius,
    }];
    for override_entry in overrides {
        let components = override_entry
            .components
            .iter()
            .map(|component_id| QueryConstraint::Component(*component_id))
            .collect();
        terms.push(QueryConstraint::And(vec![
            QueryConstraint::RelativeCylinder {
                radius: override_entry.radius,
            },
            QueryConstraint::Or(components),
        ]));
    }
    QueryConstraint::Or(terms)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn class(type_id: u32, parent: Option<u32>, radius: Option<f64>, data_component: u32) -> ClassInfo {
        ClassInfo {
            type_id: TypeId(type_id),
            parent: parent.map(TypeId),
            class_path: format!("/Game/Type{type_id}"),
            checkout_radius: radius,
            server_only: false,
            singleton: false,
            schema_components: [Some(data_component), None, None],
            fields: Vec::new(),
            rpcs: HashMap::new(),
        }
    }

    #[test]
    fn smaller_child_radius_is_subsumed() {
        let registry = ClassRegistry::builder()
            .register(class(1, None, Some(10.0), 10000))
            .register(class(2, Some(1), Some(8.0), 10001))
            .build()
            .unwrap();

        assert_eq!(registry.default_checkout_radius(), 10.0);
        assert!(registry.radius_overrides().is_empty());
    }

    #[test]
    fn larger_child_radius_is_retained_with_descendants() {
        let registry = ClassRegistry::builder()
            .register(class(1, None, Some(10.0), 10000))
            .register(class(2, Some(1), Some(15.0), 10001))
            .register(class(3, Some(2), None, 10002))
            .build()
            .unwrap();

        let overrides = registry.radius_overrides();
        assert_eq!(overrides.len(), 1);
        assert_eq!(overrides[0].radius, 15.0);
        assert_eq!(overrides[0].components, vec![10001, 10002]);
    }

    #[test]
    fn grandchild_is_measured_against_retained_ancestor() {
        // 1 (default 10) -> 2 (15, retained) -> 3 (12, subsumed by 2).
        let registry = ClassRegistry::builder()
            .register(class(1, None, Some(10.0), 10000))
            .register(class(2, Some(1), Some(15.0), 10001))
            .register(class(3, Some(2), Some(12.0), 10002))
            .build()
            .unwrap();

        assert_eq!(registry.radius_overrides().len(), 1);
        assert_eq!(registry.radius_overrides()[0].radius, 15.0);
    }

    #[test]
    fn missing_parent_is_rejected() {
        let result = ClassRegistry::builder()
            .register(class(2, Some(1), None, 10001))
            .build();
        assert_eq!(
            result.err(),
            Some(RegistryError::UnknownParent {
                type_id: TypeId(2),
                parent: TypeId(1),
            })
        );
    }

    #[test]
    fn root_must_declare_the_default_radius() {
        let result = ClassRegistry::builder()
            .register(class(1, None, None, 10000))
            .build();
        assert_eq!(
            result.err(),
            Some(RegistryError::RootWithoutRadius { type_id: TypeId(1) })
        );
    }
}
