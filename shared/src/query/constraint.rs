use crate::{
    coordinates::Coordinates,
    schema::SchemaObject,
    types::{ComponentId, EntityId},
};

// Schema field numbering for the constraint variant union.
const CONSTRAINT_SPHERE_ID: u32 = 1;
const CONSTRAINT_CYLINDER_ID: u32 = 2;
const CONSTRAINT_BOX_ID: u32 = 3;
const CONSTRAINT_RELATIVE_CYLINDER_ID: u32 = 5;
const CONSTRAINT_ENTITY_ID_ID: u32 = 7;
const CONSTRAINT_COMPONENT_ID: u32 = 8;
const CONSTRAINT_AND_ID: u32 = 9;
const CONSTRAINT_OR_ID: u32 = 10;

/// A boolean expression tree over spatial and type predicates, used to
/// describe which entities a worker wants to check out.
///
/// Exactly one variant is populated per node. Constraints are pure values:
/// composed freely, encoded into the Interest component, then discarded.
#[derive(Clone, Debug, PartialEq)]
pub enum QueryConstraint {
    And(Vec<QueryConstraint>),
    Or(Vec<QueryConstraint>),
    /// Within `radius` meters of the entity carrying the interest.
    RelativeCylinder { radius: f64 },
    Sphere {
        center: Coordinates,
        radius: f64,
    },
    Cylinder {
        center: Coordinates,
        radius: f64,
        height: f64,
    },
    Box {
        center: Coordinates,
        edge_lengths: Coordinates,
    },
    /// The single entity with this id.
    EntityId(EntityId),
    /// Any entity carrying this component.
    Component(ComponentId),
}

impl QueryConstraint {
    /// An invalid constraint contributes nothing to a query; it is never an
    /// error. `And`/`Or` nodes are valid iff they have at least one valid
    /// child, so an empty combinator stays invalid no matter how it is
    /// nested.
    pub fn is_valid(&self) -> bool {
        match self {
            QueryConstraint::And(children) | QueryConstraint::Or(children) => {
                children.iter().any(QueryConstraint::is_valid)
            }
            _ => true,
        }
    }

    /// OR of all valid constraints in `terms`; `None` when nothing is valid.
    pub fn any_of(terms: Vec<QueryConstraint>) -> Option<QueryConstraint> {
        let valid: Vec<QueryConstraint> =
            terms.into_iter().filter(QueryConstraint::is_valid).collect();
        if valid.is_empty() {
            None
        } else {
            Some(QueryConstraint::Or(valid))
        }
    }

    /// AND of all valid constraints in `terms`; `None` when nothing is valid.
    pub fn all_of(terms: Vec<QueryConstraint>) -> Option<QueryConstraint> {
        let valid: Vec<QueryConstraint> =
            terms.into_iter().filter(QueryConstraint::is_valid).collect();
        if valid.is_empty() {
            None
        } else {
            Some(QueryConstraint::And(valid))
        }
    }

    pub(crate) fn write_to(&self, object: &mut SchemaObject) {
        match self {
            QueryConstraint::And(children) => {
                for child in children.iter().filter(|child| child.is_valid()) {
                    child.write_to(object.add_object(CONSTRAINT_AND_ID));
                }
            }
            QueryConstraint::Or(children) => {
                for child in children.iter().filter(|child| child.is_valid()) {
                    child.write_to(object.add_object(CONSTRAINT_OR_ID));
                }
            }
            QueryConstraint::RelativeCylinder { radius } => {
                let nested = object.add_object(CONSTRAINT_RELATIVE_CYLINDER_ID);
                nested.add_double(1, *radius);
            }
            QueryConstraint::Sphere { center, radius } => {
                let nested = object.add_object(CONSTRAINT_SPHERE_ID);
                write_coordinates(nested, 1, center);
                nested.add_double(2, *radius);
            }
            QueryConstraint::Cylinder {
                center,
                radius,
                height,
            } => {
                let nested = object.add_object(CONSTRAINT_CYLINDER_ID);
                write_coordinates(nested, 1, center);
                nested.add_double(2, *radius);
                nested.add_double(3, *height);
            }
            QueryConstraint::Box {
                center,
                edge_lengths,
            } => {
                let nested = object.add_object(CONSTRAINT_BOX_ID);
                write_coordinates(nested, 1, center);
                write_coordinates(nested, 2, edge_lengths);
            }
            QueryConstraint::EntityId(entity_id) => {
                object.add_entity_id(CONSTRAINT_ENTITY_ID_ID, *entity_id);
            }
            QueryConstraint::Component(component_id) => {
                object.add_uint32(CONSTRAINT_COMPONENT_ID, *component_id);
            }
        }
    }
}

fn write_coordinates(object: &mut SchemaObject, field_id: u32, coordinates: &Coordinates) {
    let nested = object.add_object(field_id);
    nested.add_double(1, coordinates.x);
    nested.add_double(2, coordinates.y);
    nested.add_double(3, coordinates.z);
}
