//! Per-object data source definitions.
//!
//! Single lookups take an `identifier` attribute and mirror the resource
//! schema as computed attributes; multi lookups expose everything under a
//! computed `all` list.

mod domain;
mod service;
mod team;
mod user;

pub use domain::{DomainDataSource, DomainsDataSource};
pub use service::{ServiceDataSource, ServicesDataSource};
pub use team::{TeamDataSource, TeamsDataSource};
pub use user::{UserDataSource, UsersDataSource};

use crate::schema::{Attribute, AttributeFlags, AttributeType, Schema};

/// Computed view of a resource schema: same attributes and types, all
/// provider-set.
fn computed_view(schema: Schema) -> Schema {
    let mut out = Schema::new(schema.version);
    for (name, attr) in schema.attributes {
        out.attributes.insert(
            name,
            Attribute {
                attr_type: attr.attr_type,
                flags: AttributeFlags::computed(),
                description: attr.description,
            },
        );
    }
    out
}

/// The `all` attribute of a multi data source: a computed list of objects
/// mirroring the resource schema.
fn all_attribute(schema: &Schema) -> Attribute {
    let fields = schema
        .attributes
        .iter()
        .map(|(name, attr)| (name.clone(), attr.attr_type.clone()))
        .collect();
    Attribute::new(
        AttributeType::list(AttributeType::Object(fields)),
        AttributeFlags::computed(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_computed_view_preserves_types() {
        let schema = Schema::v0()
            .with_attribute("name", Attribute::required_string())
            .with_attribute(
                "aliases",
                Attribute::new(
                    AttributeType::list(AttributeType::String),
                    AttributeFlags::computed(),
                ),
            );

        let view = computed_view(schema);
        let name = view.attribute("name").unwrap();
        assert!(name.flags.computed);
        assert!(!name.flags.required);
        assert_eq!(name.attr_type, AttributeType::String);
    }

    #[test]
    fn test_all_attribute_is_list_of_objects() {
        let schema = Schema::v0().with_attribute("name", Attribute::required_string());
        let all = all_attribute(&schema);

        assert!(all.flags.computed);
        match all.attr_type {
            AttributeType::List(element) => match *element {
                AttributeType::Object(fields) => {
                    assert_eq!(fields.get("name"), Some(&AttributeType::String));
                }
                other => panic!("expected object element, got {:?}", other),
            },
            other => panic!("expected list, got {:?}", other),
        }
    }
}
