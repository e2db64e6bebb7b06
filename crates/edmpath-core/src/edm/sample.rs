//! Small reference models.
//!
//! Used by tests, benchmarks, and the CLI. The customer/order model covers
//! inheritance, bindings, singletons, media entities, and overloaded bound
//! operations; the open model covers dynamic properties.

use super::builder::EdmModelBuilder;
use super::container::NavigationSourceRef;
use super::model::EdmModel;
use super::operation::OperationDef;
use super::types::{Multiplicity, TypeRef};
use edmpath_common::types::PrimitiveKind;
use edmpath_common::utils::error::ModelError;

/// Customers, orders, and photos in namespace `Default`.
///
/// | Element | Shape |
/// |---------|-------|
/// | `Customers`, `Orders`, `Photos` | entity sets |
/// | `Me` | singleton of `Customer` |
/// | `Customer` ← `SpecialCustomer` | key `ID`, navigation `Orders` |
/// | `Order` ← `SpecialOrder` | key `ID`, navigation `Customer` |
/// | `Photo` | media entity |
/// | `Address` ← `UsAddress`, `CnAddress` | complex types |
///
/// # Errors
///
/// Returns the builder's [`ModelError`] if the declarations are rejected.
pub fn customer_order_model() -> Result<EdmModel, ModelError> {
    let mut b = EdmModelBuilder::new("Default");

    let address = b.complex_type("Address");
    b.property(address, "Street", PrimitiveKind::String)
        .property(address, "City", PrimitiveKind::String);
    let us_address = b.derived_complex_type("UsAddress", address);
    b.property(us_address, "ZipCode", PrimitiveKind::String);
    let cn_address = b.derived_complex_type("CnAddress", address);
    b.property(cn_address, "PostCode", PrimitiveKind::String);

    let level = b.enum_type("CustomerLevel", &[("Normal", 0), ("Gold", 1), ("Platinum", 2)]);

    let customer = b.entity_type("Customer");
    let order = b.entity_type("Order");
    let special_customer = b.derived_entity_type("SpecialCustomer", customer);
    let special_order = b.derived_entity_type("SpecialOrder", order);
    let photo = b.entity_type("Photo");

    b.property(customer, "ID", PrimitiveKind::Int32)
        .key(customer, &["ID"])
        .property(customer, "FirstName", PrimitiveKind::String)
        .property(customer, "LastName", PrimitiveKind::String)
        .property(customer, "City", PrimitiveKind::String)
        .property(customer, "Address", TypeRef::Complex(address))
        .property(customer, "Level", TypeRef::Enum(level))
        .property(
            customer,
            "Emails",
            TypeRef::collection(PrimitiveKind::String.into()),
        )
        .navigation(customer, "Orders", order, Multiplicity::Many);
    b.property(special_customer, "Bonus", PrimitiveKind::Decimal)
        .navigation(special_customer, "SpecialOrders", special_order, Multiplicity::Many);

    b.property(order, "ID", PrimitiveKind::Int32)
        .key(order, &["ID"])
        .property(order, "Name", PrimitiveKind::String)
        .property(order, "Amount", PrimitiveKind::Decimal)
        .navigation(order, "Customer", customer, Multiplicity::One);
    b.navigation(
        special_order,
        "SpecialCustomer",
        special_customer,
        Multiplicity::ZeroOrOne,
    );

    b.property(photo, "ID", PrimitiveKind::Int32)
        .key(photo, &["ID"])
        .property(photo, "Title", PrimitiveKind::String)
        .media_type(photo);

    let customers_id = b.entity_set("Customers", customer);
    let customers = NavigationSourceRef::EntitySet(customers_id);
    let orders_id = b.entity_set("Orders", order);
    let orders = NavigationSourceRef::EntitySet(orders_id);
    b.entity_set("Photos", photo);
    let me = NavigationSourceRef::Singleton(b.singleton("Me", customer));

    b.bind(customers, customer, "Orders", orders)
        .bind(customers, special_customer, "SpecialOrders", orders)
        .bind(orders, order, "Customer", customers)
        .bind(orders, special_order, "SpecialCustomer", customers)
        .bind(me, customer, "Orders", orders);

    let customer_ref = TypeRef::Entity(customer);
    let customers_ref = TypeRef::collection(customer_ref.clone());
    let orders_ref = TypeRef::collection(TypeRef::Entity(order));

    b.operation(
        OperationDef::function("GetTopOrders")
            .bound_to(customer_ref.clone())
            .returns(orders_ref.clone())
            .entity_set_path("bindingParameter/Orders")
            .composable(),
    );
    b.operation(
        OperationDef::function("GetTopOrders")
            .bound_to(customer_ref.clone())
            .parameter("n", PrimitiveKind::Int32)
            .returns(orders_ref.clone())
            .entity_set_path("bindingParameter/Orders")
            .composable(),
    );
    b.operation(
        OperationDef::function("GetOrdersSince")
            .bound_to(customer_ref.clone())
            .parameter("since", PrimitiveKind::Date)
            .optional_parameter("max", PrimitiveKind::Int32)
            .returns(orders_ref.clone())
            .entity_set_path("bindingParameter/Orders")
            .composable(),
    );
    b.operation(
        OperationDef::function("Describe")
            .bound_to(customer_ref.clone())
            .returns(PrimitiveKind::String),
    );
    b.operation(
        OperationDef::function("Describe")
            .bound_to(TypeRef::Entity(special_customer))
            .returns(PrimitiveKind::String),
    );
    b.operation(
        OperationDef::function("GetMostValuable")
            .bound_to(customers_ref.clone())
            .returns(customer_ref.clone())
            .entity_set_path("bindingParameter")
            .composable(),
    );
    b.operation(
        OperationDef::function("CountByLevel")
            .bound_to(customers_ref.clone())
            .parameter("level", TypeRef::Enum(level))
            .returns(PrimitiveKind::Int32),
    );
    b.operation(
        OperationDef::action("Rate")
            .bound_to(customer_ref.clone())
            .parameter("rating", PrimitiveKind::Int32),
    );
    b.operation(
        OperationDef::function("Find")
            .bound_to(TypeRef::collection(TypeRef::Entity(order)))
            .parameter("value", PrimitiveKind::Int32)
            .returns(TypeRef::Entity(order)),
    );
    b.operation(
        OperationDef::function("Find")
            .bound_to(TypeRef::collection(TypeRef::Entity(order)))
            .parameter("value", PrimitiveKind::Int64)
            .returns(TypeRef::Entity(order)),
    );

    let vip = b.operation(
        OperationDef::function("GetVipCustomers")
            .returns(customers_ref)
            .composable(),
    );
    b.function_import("GetVipCustomers", vip, Some(customers_id));
    let count =
        b.operation(OperationDef::function("GetCustomerCount").returns(PrimitiveKind::Int32));
    b.function_import("GetCustomerCount", count, None);
    let by_city = b.operation(
        OperationDef::function("GetCustomersByCity")
            .parameter("city", PrimitiveKind::String)
            .returns(TypeRef::collection(customer_ref))
            .composable(),
    );
    b.function_import("GetCustomersByCity", by_city, Some(customers_id));
    let reset = b.operation(OperationDef::action("ResetDataSource"));
    b.action_import("ResetDataSource", reset, None);

    b.build()
}

/// An open `Customer` entity type with an open `Address` complex type, in
/// namespace `Default`. Entity set `Customers`.
///
/// # Errors
///
/// Returns the builder's [`ModelError`] if the declarations are rejected.
pub fn open_type_model() -> Result<EdmModel, ModelError> {
    let mut b = EdmModelBuilder::new("Default");

    let address = b.complex_type("Address");
    b.property(address, "Street", PrimitiveKind::String)
        .property(address, "City", PrimitiveKind::String)
        .open_type(address);
    let zip = b.complex_type("ZipCode");
    b.property(zip, "Code", PrimitiveKind::String).open_type(zip);
    let simple = b.enum_type(
        "SimpleEnum",
        &[("First", 0), ("Second", 1), ("Third", 2), ("Fourth", 3)],
    );

    let customer = b.entity_type("Customer");
    b.property(customer, "CustomerId", PrimitiveKind::Int32)
        .key(customer, &["CustomerId"])
        .property(customer, "Name", PrimitiveKind::String)
        .property(customer, "Address", TypeRef::Complex(address))
        .property(customer, "Zip", TypeRef::Complex(zip))
        .property(customer, "Kind", TypeRef::Enum(simple))
        .open_type(customer);
    b.entity_set("Customers", customer);

    b.build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_models_build() {
        let model = customer_order_model().unwrap();
        assert_eq!(model.entity_sets().count(), 3);
        assert_eq!(model.singletons().count(), 1);
        assert_eq!(model.operation_imports().count(), 4);
        assert!(open_type_model().is_ok());
    }
}
