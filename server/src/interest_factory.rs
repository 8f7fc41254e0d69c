//! Per-entity interest computation: combines the registry's checkout-radius
//! constraint, always-interested references, singleton visibility, level
//! filtering and user-defined queries into the entity's Interest component.

use log::warn;

use shardspace_shared::{
    constants::{
        CLIENT_RPC_ENDPOINT_COMPONENT_ID, NOT_STREAMED_COMPONENT_ID, POSITION_COMPONENT_ID,
        SINGLETON_COMPONENT_ID,
    },
    Interest, ObjectRef, Query, QueryConstraint, SpatialSettings,
};

use crate::{
    channel::{EntityChannel, OwningClient},
    class_registry::{ClassInfo, ClassRegistry},
    object::{FieldValue, ObjectState},
    resolver::ObjectResolver,
};

pub struct InterestFactory<'a> {
    registry: &'a ClassRegistry,
    settings: &'a SpatialSettings,
}

impl<'a> InterestFactory<'a> {
    pub fn new(registry: &'a ClassRegistry, settings: &'a SpatialSettings) -> Self {
        Self { registry, settings }
    }

    /// The full Interest component for one entity. An empty result is
    /// legitimate: default engine visibility applies.
    pub fn create_interest(
        &self,
        class: &ClassInfo,
        channel: &EntityChannel,
        object: &ObjectState,
        resolver: &mut dyn ObjectResolver,
    ) -> Interest {
        let mut interest = Interest::new();
        if !self.settings.query_based_interest {
            return interest;
        }

        let system = self.system_defined_constraints(class, object, resolver);

        if self.settings.server_interest {
            if let Some(constraint) = system.clone() {
                interest.add_query(POSITION_COMPONENT_ID, Query::full_snapshot(constraint));
            }
        }

        if class.server_only {
            return interest;
        }
        if let Some(client) = &channel.owning_client {
            let mut terms = Vec::new();
            if let Some(constraint) = system {
                terms.push(constraint);
            }
            terms.push(self.level_constraints(client));
            if let Some(constraint) = QueryConstraint::all_of(terms) {
                interest.add_query(
                    CLIENT_RPC_ENDPOINT_COMPONENT_ID,
                    Query::full_snapshot(constraint),
                );
            }
            for query in &channel.user_queries {
                interest.add_query(CLIENT_RPC_ENDPOINT_COMPONENT_ID, query.clone());
            }
        }

        interest
    }

    /// OR of every system-level reason to check an entity out: within
    /// checkout radius, referenced by an always-interested field, or a
    /// singleton.
    pub fn system_defined_constraints(
        &self,
        class: &ClassInfo,
        object: &ObjectState,
        resolver: &mut dyn ObjectResolver,
    ) -> Option<QueryConstraint> {
        let mut terms = vec![self.registry.checkout_radius_constraint().clone()];
        if let Some(always_interested) =
            self.always_interested_constraint(class, object, resolver)
        {
            terms.push(always_interested);
        }
        terms.push(QueryConstraint::Component(SINGLETON_COMPONENT_ID));
        QueryConstraint::any_of(terms)
    }

    /// OR of entity-id constraints for every resolved reference held in a
    /// field tagged always-interested. Null and unresolved references are
    /// silently skipped; unresolved ones re-enter here when the interest is
    /// next regenerated.
    fn always_interested_constraint(
        &self,
        class: &ClassInfo,
        object: &ObjectState,
        resolver: &mut dyn ObjectResolver,
    ) -> Option<QueryConstraint> {
        let mut terms = Vec::new();
        for descriptor in class.fields.iter().filter(|field| field.always_interested) {
            let Some(value) = object.field(descriptor.handle) else {
                continue;
            };
            match value {
                FieldValue::Array(elements) => {
                    for element in elements {
                        add_reference_term(&mut terms, element, resolver);
                    }
                }
                single => add_reference_term(&mut terms, single, resolver),
            }
        }
        QueryConstraint::any_of(terms)
    }

    /// OR(not-streamed marker, loaded-level markers): suppresses checkout
    /// of actors placed in sublevels the client has not streamed in.
    fn level_constraints(&self, client: &OwningClient) -> QueryConstraint {
        let mut terms = vec![QueryConstraint::Component(NOT_STREAMED_COMPONENT_ID)];
        for level_path in &client.visible_levels {
            match self.registry.component_id_for_level(level_path) {
                Some(component_id) => terms.push(QueryConstraint::Component(component_id)),
                None => {
                    warn!("No level component registered for {level_path}; client interest will exclude it");
                }
            }
        }
        QueryConstraint::Or(terms)
    }
}

fn add_reference_term(
    terms: &mut Vec<QueryConstraint>,
    value: &FieldValue,
    resolver: &mut dyn ObjectResolver,
) {
    if let FieldValue::Object(Some(handle)) = value {
        if let ObjectRef::Entity { entity, .. } = resolver.resolve(*handle) {
            terms.push(QueryConstraint::EntityId(entity));
        }
    }
}
