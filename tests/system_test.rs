use pretty_assertions::assert_eq;
use rest_framework::mock::MockTransport;
use rest_framework::view::EntityRoute;
use rest_framework::{EntityClient, Method, RawResponse, RequestOptions};
use serde_json::json;
use std::sync::Arc;
use storefront_admin::customer::CustomerError;
use storefront_admin::lifecycle::{Screen, StorefrontSystem, SystemError};
use storefront_admin::model::{Customer, CustomerId, Order, OrderId};
use storefront_admin::routes::AppRoute;

fn system(transport: &MockTransport) -> StorefrontSystem {
    StorefrontSystem::with_transport(Arc::new(transport.clone()), 8)
}

#[tokio::test]
async fn create_then_update_sends_an_equivalent_payload() {
    let stored = json!({"id": 1, "name": "Ada"});
    let transport = MockTransport::new();
    transport
        .on(Method::POST, "api/customers", RawResponse::json(201, &stored))
        .on(Method::PUT, "api/customers/1", RawResponse::json(200, &stored));
    let system = system(&transport);

    let created = system
        .customer_client
        .create(Customer::new("Ada"))
        .await
        .unwrap()
        .body
        .unwrap();
    system.customer_client.update(created).await.unwrap();

    let requests = transport.requests();
    assert_eq!(requests[0].body, Some(json!({"name": "Ada"})));
    assert_eq!(requests[1].path, "api/customers/1");
    assert_eq!(requests[1].body, Some(stored));

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn delete_from_the_list_reloads_it_over_the_wire() {
    let transport = MockTransport::new();
    transport
        .on(
            Method::GET,
            "api/customers",
            RawResponse::json(200, &json!([{"id": 1, "name": "Ada"}, {"id": 2, "name": "Bo"}])),
        )
        .on(Method::GET, "api/customers", RawResponse::json(200, &json!([{"id": 2, "name": "Bo"}])))
        .on(Method::DELETE, "api/customers/1", RawResponse::new(204, ""));
    let system = system(&transport);

    let mut list = system.customer_list();
    let mut watch = list.watch();
    list.init().await.unwrap();
    assert_eq!(list.entities().unwrap().len(), 2);

    let mut dialog = list.delete(Customer::with_id(1).name("Ada"));
    dialog.confirm_delete().await.unwrap();
    watch.wait_for(|s| s.revision == 2).await.unwrap();

    assert_eq!(list.entities(), Some(vec![Customer::with_id(2).name("Bo")]));
    assert_eq!(transport.requests_to(Method::GET, "api/customers").len(), 2);
    assert_eq!(transport.requests_to(Method::DELETE, "api/customers/1").len(), 1);

    drop(dialog);
    drop(list);
    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn customer_orders_are_listed_from_the_nested_resource() {
    let transport = MockTransport::new();
    transport.on(
        Method::GET,
        "api/customers/4/orders",
        RawResponse::json(
            200,
            &json!({
                "content": [{"id": 40, "product": "Lamp", "cost": 12.5, "customer": {"id": 4}}],
                "controls": {"paths": {}}
            }),
        ),
    );
    let system = system(&transport);

    let res = system
        .order_client
        .query_by_customer(CustomerId(4), RequestOptions::new().page(0).size(5))
        .await
        .unwrap();
    let orders = res.body.unwrap();
    assert_eq!(orders[0].id, Some(OrderId(40)));
    assert_eq!(orders[0].customer_id(), Some(CustomerId(4)));
    assert_eq!(
        transport.requests()[0].query,
        vec![("page".to_string(), "0".to_string()), ("size".to_string(), "5".to_string())]
    );

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn routes_open_their_screens() {
    let transport = MockTransport::new();
    transport
        .on(Method::GET, "api/customers/3", RawResponse::json(200, &json!({"id": 3, "name": "Cy"})))
        .on(Method::GET, "api/orders/9", RawResponse::json(200, &json!({"id": 9, "product": "Desk"})))
        .on(Method::GET, "api/customers", RawResponse::json(200, &json!([{"id": 3}])))
        .on(Method::GET, "api/customers/404", RawResponse::new(404, ""));
    let system = system(&transport);

    match system.open(AppRoute::parse("customer/3/view").unwrap()).await.unwrap() {
        Screen::CustomerDetail(detail) => assert_eq!(detail.entity().name.as_deref(), Some("Cy")),
        _ => panic!("expected customer detail"),
    }

    match system.open(AppRoute::Order(EntityRoute::Edit(OrderId(9)))).await.unwrap() {
        Screen::OrderForm(form) => {
            assert_eq!(form.entity(), &{
                let mut order = Order::with_id(9);
                order.product = Some("Desk".into());
                order
            });
            assert_eq!(form.customer_options().len(), 1);
        }
        _ => panic!("expected order form"),
    }

    match system.open(AppRoute::parse("customer/new").unwrap()).await.unwrap() {
        Screen::CustomerForm(form) => assert_eq!(form.entity(), &Customer::default()),
        _ => panic!("expected customer form"),
    }

    assert!(matches!(
        system.open(AppRoute::parse("customer/404/edit").unwrap()).await,
        Err(SystemError::Customer(CustomerError::NotFound(_)))
    ));

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn entry_lists_the_served_resources() {
    let transport = MockTransport::new();
    transport.on(
        Method::GET,
        "api",
        RawResponse::json(
            200,
            &json!({"content": null, "controls": {"paths": {"/customers": {}, "/orders": {}}}}),
        ),
    );
    let system = system(&transport);

    let entry = system.entry().await.unwrap();
    assert!(entry.body.is_none());
    assert_eq!(
        entry.controls,
        Some(json!({"paths": {"/customers": {}, "/orders": {}}}))
    );

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn unreachable_entry_is_reported() {
    let transport = MockTransport::new();
    let system = system(&transport);

    assert!(matches!(system.entry().await, Err(SystemError::Entry(_))));

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn order_list_pages_from_envelope_controls() {
    let transport = MockTransport::new();
    transport.on(
        Method::GET,
        "api/orders",
        RawResponse::json(
            200,
            &json!({
                "content": [{"id": 8, "product": "Desk", "cost": 250.5}],
                "controls": {"paths": {"/orders": {"get": {"totalPages": 3, "currentPage": 1}}}}
            }),
        ),
    );
    let system = system(&transport);

    let mut orders = system.order_list();
    orders.init().await.unwrap();

    let state = orders.state();
    assert_eq!(state.entities.as_ref().map(Vec::len), Some(1));
    assert_eq!(state.page.map(|p| p.total_pages), Some(3));
    assert_eq!(state.links.get("first"), Some(&0));
    assert_eq!(state.links.get("next"), Some(&2));
    assert_eq!(state.links.get("prev"), Some(&0));
    assert!(state.controls.is_some());

    drop(orders);
    system.shutdown().await.unwrap();
}
