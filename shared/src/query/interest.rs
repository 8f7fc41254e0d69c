use std::collections::BTreeMap;

use crate::{
    constants::INTEREST_COMPONENT_ID,
    schema::{ComponentData, ComponentUpdate, SchemaObject},
    types::ComponentId,
};

use super::constraint::QueryConstraint;

const INTEREST_ENTRY_ID: u32 = 1;
const INTEREST_ENTRY_KEY_ID: u32 = 1;
const INTEREST_ENTRY_VALUE_ID: u32 = 2;
const COMPONENT_INTEREST_QUERIES_ID: u32 = 1;
const QUERY_CONSTRAINT_ID: u32 = 1;
const QUERY_FULL_SNAPSHOT_ID: u32 = 2;
const QUERY_RESULT_COMPONENT_ID: u32 = 3;
const QUERY_FREQUENCY_ID: u32 = 4;

/// What a matching query delivers for each checked-out entity.
#[derive(Clone, Debug, PartialEq)]
pub enum QueryResult {
    /// Every component on the entity.
    FullSnapshot,
    /// Only the listed components.
    Components(Vec<ComponentId>),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Query {
    pub constraint: QueryConstraint,
    pub result: QueryResult,
    /// Maximum delivery rate in Hz. `None` means unbounded.
    pub frequency: Option<f32>,
}

impl Query {
    /// A full-snapshot query with no rate bound.
    pub fn full_snapshot(constraint: QueryConstraint) -> Self {
        Self {
            constraint,
            result: QueryResult::FullSnapshot,
            frequency: None,
        }
    }

    fn write_to(&self, object: &mut SchemaObject) {
        self.constraint.write_to(object.add_object(QUERY_CONSTRAINT_ID));
        match &self.result {
            QueryResult::FullSnapshot => object.add_bool(QUERY_FULL_SNAPSHOT_ID, true),
            QueryResult::Components(component_ids) => {
                for component_id in component_ids {
                    object.add_uint32(QUERY_RESULT_COMPONENT_ID, *component_id);
                }
            }
        }
        if let Some(frequency) = self.frequency {
            object.add_float(QUERY_FREQUENCY_ID, frequency);
        }
    }
}

/// The ordered queries delivered to workers authoritative over one watching
/// component.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ComponentInterest {
    pub queries: Vec<Query>,
}

impl ComponentInterest {
    fn write_to(&self, object: &mut SchemaObject) {
        for query in &self.queries {
            query.write_to(object.add_object(COMPONENT_INTEREST_QUERIES_ID));
        }
    }
}

/// The per-entity Interest component: watching component id → queries.
///
/// An empty map is meaningful: no special interest, default engine
/// visibility only.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Interest {
    pub component_interest: BTreeMap<ComponentId, ComponentInterest>,
}

impl Interest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.component_interest.is_empty()
    }

    /// Appends a query to the interest keyed by `watching_component`.
    pub fn add_query(&mut self, watching_component: ComponentId, query: Query) {
        self.component_interest
            .entry(watching_component)
            .or_default()
            .queries
            .push(query);
    }

    pub fn to_data(&self) -> ComponentData {
        let mut data = ComponentData::new(INTEREST_COMPONENT_ID);
        self.write_to(&mut data.fields);
        data
    }

    pub fn to_update(&self) -> ComponentUpdate {
        let mut update = ComponentUpdate::new(INTEREST_COMPONENT_ID);
        self.write_to(&mut update.fields);
        if self.component_interest.is_empty() {
            // An interest that became empty must clear the map on receivers.
            update.add_cleared(INTEREST_ENTRY_ID);
        }
        update
    }

    fn write_to(&self, object: &mut SchemaObject) {
        for (component_id, interest) in &self.component_interest {
            let entry = object.add_object(INTEREST_ENTRY_ID);
            entry.add_uint32(INTEREST_ENTRY_KEY_ID, *component_id);
            interest.write_to(entry.add_object(INTEREST_ENTRY_VALUE_ID));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_interest_encodes_no_entries() {
        let interest = Interest::new();
        assert!(interest.is_empty());
        let data = interest.to_data();
        assert!(data.fields.is_empty());
    }

    #[test]
    fn entries_are_keyed_by_watching_component() {
        let mut interest = Interest::new();
        interest.add_query(54, Query::full_snapshot(QueryConstraint::Component(60)));
        interest.add_query(54, Query::full_snapshot(QueryConstraint::EntityId(5)));

        assert_eq!(interest.component_interest[&54].queries.len(), 2);
        let data = interest.to_data();
        assert_eq!(data.fields.count(INTEREST_ENTRY_ID), 1);
    }

    #[test]
    fn emptied_interest_update_clears_the_map() {
        let update = Interest::new().to_update();
        assert_eq!(update.cleared, vec![INTEREST_ENTRY_ID]);
    }
}
