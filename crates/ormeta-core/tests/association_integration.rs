//! Integration tests for column and association descriptors.

mod fixtures;

use std::sync::Arc;

use fixtures::*;
use ormeta_core::{
    AssociatedColumn, ColumnDef, ColumnKind, EntityMetadata, EntityMetadataProvider,
    EntityScanner, FetchType, ScalarType, TypeRef, DEFAULT_STRING_LENGTH,
};

fn provider() -> EntityMetadataProvider {
    EntityMetadataProvider::from_scanner(&EntityScanner::of::<Application>()).unwrap()
}

#[test]
fn test_inferred_join_column_name() {
    let provider = provider();
    let with_id = provider.entity_metadata_of::<WithId>().unwrap();

    let team = with_id.column("team").and_then(|c| c.as_many_to_one()).unwrap();
    assert_eq!(team.join_column_name(), "team_team_id");
    assert_eq!(team.name(), "team_team_id");
    assert_eq!(team.name_with_alias(), "WithId.team_team_id");
    assert_eq!(team.name_with_alias_associated_entity(), "WithId.team_team_id");
    assert_eq!(team.join_column_type(), TypeRef::of::<Team>());
}

#[test]
fn test_explicit_join_column_name() {
    let provider = provider();
    let order = provider.entity_metadata_of::<Order>().unwrap();

    let owner = order.column("owner").and_then(|c| c.as_many_to_one()).unwrap();
    assert_eq!(owner.join_column_name(), "owner_ref");
    assert_eq!(owner.name_with_alias(), "orders.owner_ref");
    assert_eq!(owner.field_name(), "owner");
}

#[test]
fn test_blank_join_column_name_is_inferred() {
    let provider = provider();
    let customer = provider.entity_metadata_of::<Customer>().unwrap();

    let address = customer.column("address").and_then(|c| c.as_many_to_one()).unwrap();
    assert_eq!(address.join_column_name(), "address_address_id");
    assert!(address.is_not_null());

    let billing = customer.column("billing").and_then(|c| c.as_many_to_one()).unwrap();
    assert_eq!(billing.join_column_name(), "bill_to");
    assert!(!billing.is_not_null());
}

#[test]
fn test_fetch_type_defaults() {
    let provider = provider();
    let with_id = provider.entity_metadata_of::<WithId>().unwrap();

    let team = with_id.column("team").and_then(|c| c.as_many_to_one()).unwrap();
    assert_eq!(team.fetch_type(), FetchType::Eager);
    assert!(team.is_fetch_type_eager());
    assert!(!team.is_fetch_type_lazy());

    let orders = &with_id.one_to_many_associations()[0];
    assert_eq!(orders.fetch_type(), FetchType::Lazy);

    let item = provider.entity_metadata_of::<OrderItem>().unwrap();
    let product = item.column("product").and_then(|c| c.as_many_to_one()).unwrap();
    assert!(product.is_fetch_type_lazy());
}

#[test]
fn test_associated_entity_accessors() {
    let provider = provider();
    let customer = provider.entity_metadata_of::<Customer>().unwrap();
    let address = customer.column("address").and_then(|c| c.as_many_to_one()).unwrap();

    assert_eq!(address.associated_entity_table_name(), "addresses");
    assert_eq!(
        address.associated_entity_id_column_name_with_alias(),
        "addresses.address_id"
    );
    assert_eq!(
        address.associated_entity_column_names_with_alias(),
        vec!["addresses.address_id", "addresses.street"]
    );
    assert_eq!(address.associated_entity_columns().names(), vec!["address_id", "street"]);

    let cached = provider.entity_metadata_of::<Address>().unwrap();
    assert!(Arc::ptr_eq(&address.associated_entity_metadata(), &cached));
}

#[test]
fn test_one_to_many_descriptor() {
    let provider = provider();
    let team = provider.entity_metadata_of::<Team>().unwrap();

    let members = &team.one_to_many_associations()[0];
    assert_eq!(members.field_name(), "members");
    assert_eq!(members.owner_table_name(), "teams");
    assert_eq!(members.join_column_name(), "members_team_id");
    assert_eq!(members.join_column_type(), TypeRef::of::<Member>());
    assert_eq!(members.associated_entity_table_name(), "Member");
    assert_eq!(
        members.name_with_alias_associated_entity(),
        "Member.members_team_id"
    );

    assert!(team.column("members").is_none());
    assert_eq!(team.column_names(), vec!["team_id"]);
    assert_eq!(team.associations().count(), 2);
}

#[test]
fn test_column_hints() {
    let provider = provider();
    let customer = provider.entity_metadata_of::<Customer>().unwrap();

    assert_eq!(customer.table_name(), "customers");
    assert_eq!(
        customer.column_names(),
        vec![
            "customer_id",
            "email_address",
            "created",
            "address_address_id",
            "bill_to"
        ]
    );

    let id = customer.id_column();
    assert!(id.is_id());
    assert!(id.is_auto_increment());
    assert_eq!(id.scalar_type(), Some(ScalarType::Int64));
    assert!(!id.is_string_valued());

    let email = customer.column("email").unwrap();
    assert_eq!(email.name(), "email_address");
    assert!(email.is_not_null());
    assert!(email.is_string_valued());
    assert_eq!(email.string_length(), 120);

    let created = customer.column("created").unwrap();
    assert!(!created.is_insertable());
    assert!(!created.is_not_null());
    assert_eq!(created.string_length(), DEFAULT_STRING_LENGTH);

    assert!(customer.column("cache").is_none());

    let insertable: Vec<&str> = customer.insertable_columns().map(|c| c.name()).collect();
    assert_eq!(insertable, vec!["email_address", "address_address_id", "bill_to"]);
}

#[test]
fn test_cycle_targets_resolve_to_cached_metadata() {
    let provider = provider();
    let review = provider.entity_metadata_of::<Review>().unwrap();

    let item = review.column("item").and_then(|c| c.as_many_to_one()).unwrap();
    let item_metadata = item.associated_entity_metadata();
    let reviews = &item_metadata.one_to_many_associations()[0];
    assert!(Arc::ptr_eq(&reviews.associated_entity_metadata(), &review));

    let badge = provider.entity_metadata_of::<Badge>().unwrap();
    let member = badge.one_to_many_associations()[0].associated_entity_metadata();
    let badges = member.one_to_many_associations()[0].associated_entity_metadata();
    assert!(Arc::ptr_eq(&badges, &badge));
}

#[test]
fn test_factory_handles_cycles_without_provider() {
    let with_id = EntityMetadata::of::<WithId>().unwrap();
    let team = with_id.column("team").and_then(|c| c.as_many_to_one()).unwrap();

    let team_metadata = team.associated_entity_metadata();
    let owners = &team_metadata.one_to_many_associations()[1];
    assert!(Arc::ptr_eq(&owners.associated_entity_metadata(), &with_id));
}

#[test]
fn test_dropped_ancestor_is_rebuilt_once() {
    let with_id = EntityMetadata::of::<WithId>().unwrap();
    let team = with_id
        .column("team")
        .and_then(|c| c.as_many_to_one())
        .unwrap()
        .associated_entity_metadata();
    drop(with_id);

    let owners = &team.one_to_many_associations()[1];
    let first = owners.associated_entity_metadata();
    let second = owners.associated_entity_metadata();
    assert_eq!(first.entity_type(), TypeRef::of::<WithId>());
    assert!(Arc::ptr_eq(&first, &second));
}

#[test]
fn test_snapshot_json() {
    let provider = provider();
    let order = provider.entity_metadata_of::<Order>().unwrap();
    let snapshot = order.snapshot();

    assert_eq!(snapshot.table, "orders");
    assert_eq!(snapshot.columns[0].kind, ColumnKind::Field);
    assert!(snapshot.columns[0].auto_increment);
    assert_eq!(snapshot.columns[1].name, "owner_ref");
    assert_eq!(snapshot.one_to_many[0].join_column, "items_id");

    let json = snapshot.to_json().unwrap();
    assert!(json.contains("\"table\": \"orders\""));
    assert!(json.contains("\"kind\": \"many_to_one\""));
    assert!(json.contains("\"fetch\": \"EAGER\""));
    assert!(json.contains("\"fetch\": \"LAZY\""));
}
