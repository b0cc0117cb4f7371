//! Shared fixture entities for the integration tests.
//!
//! `Application` is a package-like root listing the directly registered
//! types. Some entities (`Tag`, `Review`) are only reachable through
//! associations.

#![allow(dead_code)]

use ormeta_core::{
    ColumnHint, FetchType, FieldInfo, GenerationType, JoinColumnHint, Reflect, TypeInfo,
};

pub struct Application;

impl Reflect for Application {
    fn type_info() -> TypeInfo {
        TypeInfo::plain()
            .with_member::<WithId>()
            .with_member::<Customer>()
            .with_member::<Address>()
    }
}

/// Root of the association graph.
///
/// One-to-many edges reachable from here, directly or transitively:
/// `Order`, `OrderItem`, `Review`, `Member`, `Badge`, `Tag`. `Team` and
/// `Product` are only many-to-one targets. `Team` also points back at
/// `WithId` through a one-to-many edge.
pub struct WithId;
pub struct Team;
pub struct Member;
pub struct Badge;
pub struct Order;
pub struct OrderItem;
pub struct Review;
pub struct Product;
pub struct Tag;

impl Reflect for WithId {
    fn type_info() -> TypeInfo {
        TypeInfo::entity()
            .with_field(FieldInfo::new::<i64>("id").id())
            .with_field(FieldInfo::new::<String>("name"))
            .with_field(FieldInfo::one_to_many::<Order>("orders"))
            .with_field(FieldInfo::many_to_one::<Team>("team"))
    }
}

impl Reflect for Team {
    fn type_info() -> TypeInfo {
        TypeInfo::entity()
            .with_table("teams")
            .with_field(FieldInfo::new::<i64>("id").id().column_name("team_id"))
            .with_field(FieldInfo::one_to_many::<Member>("members"))
            .with_field(FieldInfo::one_to_many::<WithId>("owners"))
    }
}

impl Reflect for Member {
    fn type_info() -> TypeInfo {
        TypeInfo::entity()
            .with_field(FieldInfo::new::<i64>("id").id())
            .with_field(FieldInfo::one_to_many::<Badge>("badges"))
    }
}

impl Reflect for Badge {
    fn type_info() -> TypeInfo {
        TypeInfo::entity()
            .with_field(FieldInfo::new::<i64>("id").id())
            .with_field(FieldInfo::one_to_many::<Member>("holders"))
    }
}

impl Reflect for Order {
    fn type_info() -> TypeInfo {
        TypeInfo::entity()
            .with_table("orders")
            .with_field(
                FieldInfo::new::<i64>("id")
                    .id()
                    .generated(GenerationType::Identity),
            )
            .with_field(FieldInfo::many_to_one::<WithId>("owner").join_column_name("owner_ref"))
            .with_field(FieldInfo::one_to_many::<OrderItem>("items"))
    }
}

impl Reflect for OrderItem {
    fn type_info() -> TypeInfo {
        TypeInfo::entity()
            .with_field(FieldInfo::new::<i64>("id").id())
            .with_field(FieldInfo::new::<i32>("quantity"))
            .with_field(FieldInfo::many_to_one::<Product>("product").fetch(FetchType::Lazy))
            .with_field(FieldInfo::one_to_many::<Review>("reviews"))
    }
}

impl Reflect for Review {
    fn type_info() -> TypeInfo {
        TypeInfo::entity()
            .with_field(FieldInfo::new::<i64>("id").id())
            .with_field(FieldInfo::many_to_one::<OrderItem>("item"))
            .with_field(FieldInfo::one_to_many::<Order>("orders"))
    }
}

impl Reflect for Product {
    fn type_info() -> TypeInfo {
        TypeInfo::entity()
            .with_field(FieldInfo::new::<String>("sku").id())
            .with_field(FieldInfo::one_to_many::<Tag>("tags"))
    }
}

impl Reflect for Tag {
    fn type_info() -> TypeInfo {
        TypeInfo::entity()
            .with_field(FieldInfo::new::<i64>("id").id())
            .with_field(FieldInfo::new::<String>("label").length(32))
    }
}

/// Entity exercising column hints.
pub struct Customer;

impl Reflect for Customer {
    fn type_info() -> TypeInfo {
        TypeInfo::entity()
            .with_table("customers")
            .with_field(
                FieldInfo::new::<i64>("id")
                    .id()
                    .column_name("customer_id")
                    .generated(GenerationType::Identity),
            )
            .with_field(FieldInfo::new::<String>("email").column(ColumnHint {
                name: Some("email_address".into()),
                nullable: false,
                insertable: true,
                length: Some(120),
            }))
            .with_field(FieldInfo::new::<String>("created").column(ColumnHint {
                insertable: false,
                ..ColumnHint::default()
            }))
            .with_field(FieldInfo::new::<String>("cache").transient())
            .with_field(FieldInfo::many_to_one::<Address>("address").join_column(
                JoinColumnHint {
                    nullable: false,
                    ..JoinColumnHint::named("   ")
                },
            ))
            .with_field(FieldInfo::many_to_one::<Address>("billing").join_column_name("bill_to"))
    }
}

pub struct Address;

impl Reflect for Address {
    fn type_info() -> TypeInfo {
        TypeInfo::entity()
            .with_table("addresses")
            .with_field(FieldInfo::new::<i64>("id").id().column_name("address_id"))
            .with_field(FieldInfo::new::<String>("street"))
    }
}

/// Not an entity.
pub struct WithoutEntity;

impl Reflect for WithoutEntity {
    fn type_info() -> TypeInfo {
        TypeInfo::plain().with_field(FieldInfo::new::<i64>("id").id())
    }
}

pub struct WithoutId;

impl Reflect for WithoutId {
    fn type_info() -> TypeInfo {
        TypeInfo::entity().with_field(FieldInfo::new::<String>("name"))
    }
}

pub struct WithTwoIds;

impl Reflect for WithTwoIds {
    fn type_info() -> TypeInfo {
        TypeInfo::entity()
            .with_field(FieldInfo::new::<i64>("id").id())
            .with_field(FieldInfo::new::<i64>("other_id").id())
    }
}

/// Entity whose association targets an unmapped type.
pub struct WithUnmappedTarget;

impl Reflect for WithUnmappedTarget {
    fn type_info() -> TypeInfo {
        TypeInfo::entity()
            .with_field(FieldInfo::new::<i64>("id").id())
            .with_field(FieldInfo::many_to_one::<WithoutEntity>("detail"))
    }
}
