//! Common ZDL source fixtures for tests.

// Single constructs
pub const SIMPLE_ENTITY: &str = "entity Customer { customerId Long required }";

pub const ENUM_FIELD: &str = r#"
enum OrderStatus { PLACED, SHIPPED }

entity Order {
    status OrderStatus
    total BigDecimal
}
"#;

pub const RELATIONSHIP_WITH_FIELD: &str = r#"
entity Address { street String }
entity Customer { name String }

relationship ManyToOne {
    Address{customer} to Customer
}
"#;

pub const SERVICE_WITHOUT_AGGREGATE: &str = r#"
entity Order { number String }

service OrderService for (Order) {
    getOrder(id) Order?
}
"#;

pub const SERVICE_WITH_UNKNOWN_EVENT: &str = r#"
entity Order { number String }
event EventA { id Long }

service OrderService {
    placeOrder(Order) withEvents [EventA | EventB]
}
"#;

pub const NESTED_ENTITY: &str = r#"
entity Customer {
    /** home address */
    @json
    address Address(customer_address) {
        street String required
        city String
    } required unique
}
"#;

pub const LEGACY_SERVICE: &str = r#"
@aggregate
entity Customer { name String }
@aggregate
entity OrderItem { quantity Integer }

service Customer, OrderItem with LegacyService
"#;

pub const SYNTAX_ERRORS: &str = r#"
entity Broken {
    name
}

entity Valid {
    code String required
}
"#;

/// A complete, valid model touching every construct.
pub const ORDERS_MODEL: &str = r#"/**
 * Orders domain
 */

MAX_ITEMS = 100

@import("common.zdl")

config {
    title "Orders"
    basePackage "io.example.orders"
    persistence mongodb
}

apis {
    @rest
    openapi(provider) default {
        uri "openapi.yml"
    }
    asyncapi(client) payments {
        uri "payments-asyncapi.yml"
    }
}

plugins {
    /** Generates the backend */
    BackendPlugin (inherit: false) {
        targetFolder "backend"
        --force
    }
    disabled DocsPlugin {
        title "Docs"
    }
}

policies(Order) {
    retention 30
}

/** Customer entity */
@aggregate
entity Customer(customer_table) {
    /** the email */
    email String required unique maxlength(100) pattern("^.+@.+$")
    name String required minlength(2)
    @json
    address Address {
        street String
        city String
    } required
    status CustomerStatus = CustomerStatus.ACTIVE
}

@aggregate
entity Order {
    orderNumber String required
    total BigDecimal
    items OrderItem[]
    customer Customer
}

entity OrderItem {
    quantity Integer min(1) max(999)
    price BigDecimal
}

enum CustomerStatus {
    ACTIVE(1),
    INACTIVE(2) /** no longer active */
}

input CustomerFilter {
    name String
    status CustomerStatus
}

output CustomerPage {
    items Customer[]
    filter CustomerFilter
    total Long
}

event CustomerCreated {
    customerId Long
    customer Customer
}

event CustomerDeleted {
    customerId Long
}

relationship OneToMany {
    /** orders of a customer */
    Customer{orders(orderNumber)} to @eager Order{customer required}
}

relationship ManyToOne {
    OrderItem{order} to Order
}

@rest("/customers")
service CustomerService for (Customer, Order) {
    @post
    createCustomer(Customer) Customer withEvents CustomerCreated
    @get("/{id}")
    getCustomer(id) Customer?
    @get
    searchCustomers(CustomerFilter) CustomerPage[]
    @delete("/{id}")
    deleteCustomer(id) withEvents [CustomerDeleted | CustomerCreated]
}

service Order with LegacyOrders

aggregate CustomerAggregate(Customer) {
    register(Customer) withEvents CustomerCreated
}
"#;

/// The same model with one broken reference of each kind.
pub const BROKEN_MODEL: &str = r#"
apis {
    openapi(server) default { }
}

entity Customer {
    address Location
}

input Filter { page Page }

event Created { payload Filter }

relationship OneToOne {
    Customer to Ghost
}

service CustomerService for (Customer) {
    find(Ghost) Filter
}

aggregate CustomerAggregate(Phantom) {
    register(Customer) withEvents Missing
}
"#;
