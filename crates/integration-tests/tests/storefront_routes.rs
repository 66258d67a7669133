//! In-process storefront router tests.
//!
//! Requests are driven through `tower::ServiceExt::oneshot`; the session
//! cookie from the first response is carried by hand, the way a browser
//! would.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response, StatusCode, header};
use tower::ServiceExt;

use tianguis_integration_tests::test_app;

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    cookie: Option<&str>,
    form_body: Option<&str>,
) -> (StatusCode, Option<String>, String) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    let request = if let Some(body) = form_body {
        builder
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_owned()))
            .expect("request")
    } else {
        builder.body(Body::empty()).expect("request")
    };

    let response: Response<_> = app.clone().oneshot(request).await.expect("response");
    let status = response.status();
    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .map(str::to_owned);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    let body = String::from_utf8_lossy(&bytes).into_owned();

    (status, set_cookie, body)
}

#[tokio::test]
async fn health_and_home_respond() {
    let app = test_app();

    let (status, _, body) = send(&app, "GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "ok");

    let (status, _, body) = send(&app, "GET", "/", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Tianguis"));
    assert!(body.contains("Destacados"));
}

#[tokio::test]
async fn unknown_product_is_404() {
    let app = test_app();
    let (status, _, _) = send(&app, "GET", "/products/999", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn full_checkout_happy_path() {
    let app = test_app();

    // Add product 1 (María González, ships municipality-wide from San
    // Bartolo Coyotepec) to the cart.
    let (status, cookie, body) = send(
        &app,
        "POST",
        "/cart/add",
        None,
        Some("product_id=1&quantity=2"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains('2'));
    let cookie = cookie.expect("session cookie issued");

    let (status, _, body) = send(&app, "GET", "/cart/count", Some(&cookie), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains('2'));

    // A malformed postal code is rejected before any lookup.
    let (status, _, body) = send(
        &app,
        "POST",
        "/checkout/postal-code",
        Some(&cookie),
        Some("postal_code=12A45"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("5 dígitos"));

    // 71294 resolves to the artisan's own municipality: compatible.
    let (status, _, body) = send(
        &app,
        "POST",
        "/checkout/postal-code",
        Some(&cookie),
        Some("postal_code=71294"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("María González"));
    assert!(body.contains("Compatible ✓"));
    assert!(!body.contains("No compatible"));

    // Continue to the payment step.
    let (status, _, body) = send(
        &app,
        "POST",
        "/checkout/continue",
        Some(&cookie),
        Some("full_name=Ana%20Cliente&email=ana%40correo.mx&phone=9511234567&street=Hidalgo%2012"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Método de Pago"));
    assert!(body.contains("Efectivo"));

    // Submit with cash selected for artisan 1.
    let (status, _, body) = send(
        &app,
        "POST",
        "/checkout/submit",
        Some(&cookie),
        Some("payment_1=cash"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Gracias por tu compra"));
    assert!(body.contains("ORD-"));

    // The cart was cleared and the order shows in the session history.
    let (_, _, body) = send(&app, "GET", "/cart/count", Some(&cookie), None).await;
    assert!(body.contains('0'));
    let (status, _, body) = send(&app, "GET", "/orders", Some(&cookie), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("ORD-"));
    assert!(body.contains("Pendiente"));
}

#[tokio::test]
async fn blocked_checkout_enumerates_the_incompatible_artisan() {
    let app = test_app();

    // Product 3 (Juan Pérez, state-wide) and product 5 (Lucía Ramírez,
    // colony-only from "Centro").
    let (_, cookie, _) = send(&app, "POST", "/cart/add", None, Some("product_id=3")).await;
    let cookie = cookie.expect("session cookie issued");
    send(&app, "POST", "/cart/add", Some(&cookie), Some("product_id=5")).await;

    // 68050 is colony "Reforma" in Oaxaca: fine for the state-wide
    // artisan, blocked for the colony-only one.
    let (status, _, body) = send(
        &app,
        "POST",
        "/checkout/postal-code",
        Some(&cookie),
        Some("postal_code=68050"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Juan Pérez: Compatible ✓"));
    assert!(body.contains("Lucía Ramírez: No compatible ⨯"));
    assert!(body.contains("elimina esos productos"));

    // The gate refuses to continue while blocked.
    let (status, _, body) = send(
        &app,
        "POST",
        "/checkout/continue",
        Some(&cookie),
        Some("full_name=Ana&email=ana%40correo.mx&phone=951&street=Hidalgo"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Verifica la compatibilidad de envío"));

    // Editing the postal code to the artisan's colony unblocks it.
    let (_, _, body) = send(
        &app,
        "POST",
        "/checkout/postal-code",
        Some(&cookie),
        Some("postal_code=71506"),
    )
    .await;
    assert!(body.contains("Lucía Ramírez: Compatible ✓"));
}

#[tokio::test]
async fn lookup_failure_is_reported_as_retryable_and_keeps_the_cart() {
    let app = test_app();

    let (_, cookie, _) = send(&app, "POST", "/cart/add", None, Some("product_id=1")).await;
    let cookie = cookie.expect("session cookie issued");

    // "00000" simulates a directory outage.
    let (status, _, body) = send(
        &app,
        "POST",
        "/checkout/postal-code",
        Some(&cookie),
        Some("postal_code=00000"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("No pudimos consultar"));
    // Failure messaging is about the lookup, never about compatibility.
    assert!(!body.contains("No compatible"));

    // The cart is untouched by the failed lookup.
    let (_, _, body) = send(&app, "GET", "/cart/count", Some(&cookie), None).await;
    assert!(body.contains('1'));
}

#[tokio::test]
async fn cart_update_and_remove_rerender_the_items() {
    let app = test_app();

    let (_, cookie, _) = send(&app, "POST", "/cart/add", None, Some("product_id=1")).await;
    let cookie = cookie.expect("session cookie issued");

    let (status, _, body) = send(
        &app,
        "POST",
        "/cart/update",
        Some(&cookie),
        Some("product_id=1&quantity=3"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Artesanía de Barro Negro"));

    let (status, _, body) = send(
        &app,
        "POST",
        "/cart/remove",
        Some(&cookie),
        Some("product_id=1"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Tu carrito está vacío"));
}

#[tokio::test]
async fn out_of_stock_product_cannot_be_added() {
    let app = test_app();
    // Product 8 is seeded with zero stock.
    let (status, _, body) = send(&app, "POST", "/cart/add", None, Some("product_id=8")).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body.contains("agotado") || body.contains("Agotado"));
}
