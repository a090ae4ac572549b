use std::io::Cursor;
use std::str::FromStr;
use std::sync::Arc;

use chrono::{Duration as ChronoDuration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use reqwest::StatusCode;
use rust_decimal::Decimal;
use serde_json::json;

use stockroom_api::app::services::AppServices;
use stockroom_auth::{JwtClaims, PrincipalId, Role};
use stockroom_catalog::ProductDraft;
use stockroom_core::{BrandId, CategoryId};
use stockroom_store::{InMemoryCatalog, ProductStore};

struct TestServer {
    base_url: String,
    services: Arc<AppServices>,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn(jwt_secret: &str) -> Self {
        // Same router as prod, in-memory storage, ephemeral port.
        let services = Arc::new(AppServices::in_memory());
        let app = stockroom_api::app::app_with_services(jwt_secret.to_string(), services.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url,
            services,
            handle,
        }
    }

    fn catalog(&self) -> Arc<InMemoryCatalog> {
        self.services
            .in_memory_catalog()
            .expect("test server wires the in-memory backend")
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn mint_jwt(jwt_secret: &str, roles: Vec<Role>) -> String {
    let now = Utc::now();
    let claims = JwtClaims {
        sub: PrincipalId::new(),
        roles,
        iat: now.timestamp(),
        exp: (now + ChronoDuration::minutes(10)).timestamp(),
    };

    jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(jwt_secret.as_bytes()),
    )
    .expect("failed to encode jwt")
}

fn draft(
    title: &str,
    category: Option<CategoryId>,
    brand: Option<BrandId>,
    serie: Option<&str>,
) -> ProductDraft {
    ProductDraft {
        title: title.to_string(),
        category,
        brand,
        serie_number: serie.map(str::to_string),
        cost_price: Decimal::from_str("1.50").unwrap(),
        selling_price: Decimal::from_str("3.00").unwrap(),
        quantity: 100,
    }
}

#[tokio::test]
async fn health_is_public() {
    let srv = TestServer::spawn("test-secret").await;

    let res = reqwest::Client::new()
        .get(format!("{}/health", srv.base_url))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn auth_required_for_protected_endpoints() {
    let srv = TestServer::spawn("test-secret").await;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/products", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    // A token signed with the wrong secret is rejected the same way.
    let forged = mint_jwt("other-secret", vec![Role::new("admin")]);
    let res = client
        .get(format!("{}/products", srv.base_url))
        .bearer_auth(forged)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn whoami_reflects_token_roles() {
    let jwt_secret = "test-secret";
    let srv = TestServer::spawn(jwt_secret).await;
    let token = mint_jwt(jwt_secret, vec![Role::new("clerk"), Role::new("viewer")]);

    let res = reqwest::Client::new()
        .get(format!("{}/whoami", srv.base_url))
        .bearer_auth(token)
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    let roles = body["roles"].as_array().unwrap();
    assert!(roles.iter().any(|r| r == "clerk"));
    assert!(roles.iter().any(|r| r == "viewer"));
}

#[tokio::test]
async fn viewer_cannot_create_products() {
    let jwt_secret = "test-secret";
    let srv = TestServer::spawn(jwt_secret).await;
    let token = mint_jwt(jwt_secret, vec![Role::new("viewer")]);
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/products/new", srv.base_url))
        .bearer_auth(&token)
        .form(&[("title", "Bolt"), ("cost_price", "1"), ("selling_price", "2"), ("quantity", "1")])
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "forbidden");

    // The blank form needs the same permission as the create action.
    let res = client
        .get(format!("{}/products/new", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn clerk_cannot_delete_products() {
    let jwt_secret = "test-secret";
    let srv = TestServer::spawn(jwt_secret).await;
    let product = srv
        .catalog()
        .insert(draft("Bolt", None, None, None))
        .await
        .unwrap();

    let token = mint_jwt(jwt_secret, vec![Role::new("clerk")]);
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/products/{}/delete", srv.base_url, product.id))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = client
        .post(format!("{}/products/{}/delete", srv.base_url, product.id))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    // Still there.
    let res = client
        .get(format!("{}/products/{}", srv.base_url, product.id))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn create_product_via_form_then_detail() {
    let jwt_secret = "test-secret";
    let srv = TestServer::spawn(jwt_secret).await;
    let hardware = srv.catalog().add_category("Hardware").unwrap();
    let acme = srv.catalog().add_brand("Acme").unwrap();

    let token = mint_jwt(jwt_secret, vec![Role::new("clerk")]);
    let client = reqwest::Client::new();

    let category_id = hardware.id.to_string();
    let brand_id = acme.id.to_string();
    let res = client
        .post(format!("{}/products/new", srv.base_url))
        .bearer_auth(&token)
        .form(&[
            ("title", "Bolt"),
            ("category", category_id.as_str()),
            ("brand", brand_id.as_str()),
            ("serie_number", "SN1"),
            ("cost_price", "1.50"),
            ("selling_price", "3.00"),
            ("quantity", "100"),
        ])
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::CREATED);
    let created: serde_json::Value = res.json().await.unwrap();
    assert_eq!(created["title"], "Bolt");
    assert_eq!(created["category_name"], "Hardware");
    assert_eq!(created["brand_name"], "Acme");
    assert_eq!(created["cost_price"], "1.50");
    assert_eq!(created["selling_price"], "3.00");
    assert_eq!(created["quantity"], 100);
    let id = created["id"].as_i64().expect("numeric id");

    let res = client
        .get(format!("{}/products/{}", srv.base_url, id))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let detail: serde_json::Value = res.json().await.unwrap();
    assert_eq!(detail["serie_number"], "SN1");
    assert_eq!(detail["category_name"], "Hardware");
}

#[tokio::test]
async fn form_validation_reports_field_errors() {
    let jwt_secret = "test-secret";
    let srv = TestServer::spawn(jwt_secret).await;
    let token = mint_jwt(jwt_secret, vec![Role::new("clerk")]);

    let res = reqwest::Client::new()
        .post(format!("{}/products/new", srv.base_url))
        .bearer_auth(&token)
        .form(&[
            ("title", "   "),
            ("cost_price", "abc"),
            ("quantity", "1.5"),
        ])
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "validation_failed");
    let fields = body["fields"].as_object().unwrap();
    assert!(fields.contains_key("title"));
    assert!(fields.contains_key("cost_price"));
    // selling_price was never sent at all.
    assert!(fields.contains_key("selling_price"));
    assert!(fields.contains_key("quantity"));
}

#[tokio::test]
async fn unknown_references_are_field_errors() {
    let jwt_secret = "test-secret";
    let srv = TestServer::spawn(jwt_secret).await;
    let token = mint_jwt(jwt_secret, vec![Role::new("clerk")]);

    let res = reqwest::Client::new()
        .post(format!("{}/products/new", srv.base_url))
        .bearer_auth(&token)
        .form(&[
            ("title", "Bolt"),
            ("category", "999"),
            ("cost_price", "1.50"),
            ("selling_price", "3.00"),
            ("quantity", "100"),
        ])
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "validation_failed");
    assert!(body["fields"].as_object().unwrap().contains_key("category"));
}

#[tokio::test]
async fn listing_filters_and_paginates() {
    let jwt_secret = "test-secret";
    let srv = TestServer::spawn(jwt_secret).await;
    let catalog = srv.catalog();
    let hardware = catalog.add_category("Hardware").unwrap();
    let plumbing = catalog.add_category("Plumbing").unwrap();

    for n in 1..=12 {
        catalog
            .insert(draft(
                &format!("Bolt {n:02}"),
                Some(hardware.id),
                None,
                Some(&format!("SN-{n:02}")),
            ))
            .await
            .unwrap();
    }
    catalog
        .insert(draft("Nut", Some(plumbing.id), None, Some("NT-01")))
        .await
        .unwrap();

    let token = mint_jwt(jwt_secret, vec![Role::new("viewer")]);
    let client = reqwest::Client::new();

    // Title filter is a case-insensitive substring; fixed page size of 10.
    let res = client
        .get(format!("{}/products?title=BOLT", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["products"].as_array().unwrap().len(), 10);
    assert_eq!(body["total"], 12);
    assert_eq!(body["page"], 1);
    assert_eq!(body["page_size"], 10);
    assert_eq!(body["has_more"], true);

    let res = client
        .get(format!("{}/products?title=bolt&page=2", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["products"].as_array().unwrap().len(), 2);
    assert_eq!(body["has_more"], false);

    // Serie number narrows to a single row.
    let res = client
        .get(format!("{}/products?serie_number=sn-07", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["total"], 1);
    assert_eq!(body["products"][0]["title"], "Bolt 07");

    // Category id matches exactly.
    let res = client
        .get(format!("{}/products?category={}", srv.base_url, plumbing.id))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["total"], 1);
    assert_eq!(body["products"][0]["title"], "Nut");
    assert_eq!(body["products"][0]["category_name"], "Plumbing");

    // Criteria combine conjunctively.
    let res = client
        .get(format!(
            "{}/products?title=bolt&category={}",
            srv.base_url, plumbing.id
        ))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["total"], 0);
    assert_eq!(body["products"].as_array().unwrap().len(), 0);

    // A page past the end is empty, not an error.
    let res = client
        .get(format!("{}/products?title=bolt&page=9", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["products"].as_array().unwrap().len(), 0);
    assert_eq!(body["total"], 12);
}

#[tokio::test]
async fn malformed_filter_criteria_are_ignored() {
    let jwt_secret = "test-secret";
    let srv = TestServer::spawn(jwt_secret).await;
    let catalog = srv.catalog();
    catalog.insert(draft("Bolt", None, None, None)).await.unwrap();
    catalog.insert(draft("Nut", None, None, None)).await.unwrap();

    let token = mint_jwt(jwt_secret, vec![Role::new("viewer")]);

    // Non-numeric ids, blank criteria, and an unparseable page all degrade to
    // the unfiltered first page.
    let res = reqwest::Client::new()
        .get(format!(
            "{}/products?category=abc&brand=&title=&page=zzz",
            srv.base_url
        ))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["total"], 2);
    assert_eq!(body["page"], 1);
}

#[tokio::test]
async fn metrics_cover_whole_catalog_regardless_of_filter() {
    let jwt_secret = "test-secret";
    let srv = TestServer::spawn(jwt_secret).await;
    let catalog = srv.catalog();
    for n in 1..=5 {
        catalog
            .insert(draft(&format!("Bolt {n}"), None, None, None))
            .await
            .unwrap();
    }
    catalog.insert(draft("Nut", None, None, None)).await.unwrap();

    let token = mint_jwt(jwt_secret, vec![Role::new("viewer")]);
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/products", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    let unfiltered: serde_json::Value = res.json().await.unwrap();

    let res = client
        .get(format!("{}/products?title=nut", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    let filtered: serde_json::Value = res.json().await.unwrap();

    assert_eq!(filtered["total"], 1);
    assert_eq!(filtered["product_metrics"]["product_count"], 6);
    assert_eq!(filtered["product_metrics"]["units_in_stock"], 600);
    // 6 products * 100 units * 1.50 cost.
    assert_eq!(filtered["product_metrics"]["stock_cost"], "900.00");
    assert_eq!(filtered["product_metrics"], unfiltered["product_metrics"]);
    assert_eq!(filtered["sales_metrics"], unfiltered["sales_metrics"]);
}

#[tokio::test]
async fn extreme_catalog_values_surface_as_metrics_errors() {
    let jwt_secret = "test-secret";
    let srv = TestServer::spawn(jwt_secret).await;

    // Valid per the draft rules, but the aggregate cost exceeds Decimal.
    let mut bulk = draft("Bulk gravel", None, None, None);
    bulk.cost_price = Decimal::MAX;
    bulk.quantity = 2;
    srv.catalog().insert(bulk).await.unwrap();

    let token = mint_jwt(jwt_secret, vec![Role::new("viewer")]);
    let res = reqwest::Client::new()
        .get(format!("{}/products", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "metrics_error");
}

#[tokio::test]
async fn api_crud_lifecycle() {
    let jwt_secret = "test-secret";
    let srv = TestServer::spawn(jwt_secret).await;
    let hardware = srv.catalog().add_category("Hardware").unwrap();

    let token = mint_jwt(jwt_secret, vec![Role::new("manager")]);
    let client = reqwest::Client::new();

    // Create.
    let res = client
        .post(format!("{}/api/products", srv.base_url))
        .bearer_auth(&token)
        .json(&json!({
            "title": "Washer",
            "category": hardware.id,
            "serie_number": "W-1",
            "cost_price": "0.10",
            "selling_price": "0.25",
            "quantity": 500
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let created: serde_json::Value = res.json().await.unwrap();
    let id = created["id"].as_i64().expect("numeric id");
    assert_eq!(created["cost_price"], "0.10");

    // List carries the raw record.
    let res = client
        .get(format!("{}/api/products", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["items"].as_array().unwrap().len(), 1);
    assert_eq!(body["items"][0]["title"], "Washer");

    // Patch touches only the supplied fields.
    let res = client
        .patch(format!("{}/api/products/{}", srv.base_url, id))
        .bearer_auth(&token)
        .json(&json!({ "quantity": 450 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let patched: serde_json::Value = res.json().await.unwrap();
    assert_eq!(patched["quantity"], 450);
    assert_eq!(patched["title"], "Washer");
    assert_eq!(patched["serie_number"], "W-1");

    // Put replaces the record; omitted references clear.
    let res = client
        .put(format!("{}/api/products/{}", srv.base_url, id))
        .bearer_auth(&token)
        .json(&json!({
            "title": "Washer XL",
            "cost_price": "0.12",
            "selling_price": "0.30",
            "quantity": 400
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let replaced: serde_json::Value = res.json().await.unwrap();
    assert_eq!(replaced["title"], "Washer XL");
    assert!(replaced["category"].is_null());
    assert!(replaced["serie_number"].is_null());

    // Delete, then the record is gone.
    let res = client
        .delete(format!("{}/api/products/{}", srv.base_url, id))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let res = client
        .get(format!("{}/api/products/{}", srv.base_url, id))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "not_found");
}

#[tokio::test]
async fn api_validation_rejects_bad_drafts() {
    let jwt_secret = "test-secret";
    let srv = TestServer::spawn(jwt_secret).await;
    let token = mint_jwt(jwt_secret, vec![Role::new("manager")]);

    let res = reqwest::Client::new()
        .post(format!("{}/api/products", srv.base_url))
        .bearer_auth(&token)
        .json(&json!({
            "title": "",
            "cost_price": "1.00",
            "selling_price": "-2.00",
            "quantity": 1
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "validation_failed");
    let fields = body["fields"].as_object().unwrap();
    assert!(fields.contains_key("title"));
    assert!(fields.contains_key("selling_price"));
}

#[tokio::test]
async fn bad_and_missing_ids_are_distinct_errors() {
    let jwt_secret = "test-secret";
    let srv = TestServer::spawn(jwt_secret).await;
    let token = mint_jwt(jwt_secret, vec![Role::new("viewer")]);
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/products/abc", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "invalid_id");

    let res = client
        .get(format!("{}/products/12345", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "not_found");
}

#[tokio::test]
async fn export_downloads_the_whole_catalog() {
    let jwt_secret = "test-secret";
    let srv = TestServer::spawn(jwt_secret).await;
    let catalog = srv.catalog();
    let hardware = catalog.add_category("Hardware").unwrap();
    let acme = catalog.add_brand("Acme").unwrap();
    catalog
        .insert(draft("Bolt", Some(hardware.id), Some(acme.id), Some("SN1")))
        .await
        .unwrap();
    catalog
        .insert(draft("Nut", Some(hardware.id), None, None))
        .await
        .unwrap();

    let token = mint_jwt(jwt_secret, vec![Role::new("viewer")]);

    // Filter parameters are ignored: the export always covers everything.
    let res = reqwest::Client::new()
        .get(format!("{}/products/export?title=bolt", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(
        res.headers()["content-type"],
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
    );
    assert_eq!(
        res.headers()["content-disposition"],
        "attachment; filename=products.xlsx"
    );

    let bytes = res.bytes().await.unwrap();
    let book = umya_spreadsheet::reader::xlsx::read_reader(Cursor::new(bytes.to_vec()), true)
        .expect("downloaded workbook parses");
    let sheet = book.get_sheet_by_name("Products").expect("Products sheet");

    let cell = |coordinate: &str| {
        sheet
            .get_cell(coordinate)
            .map(|c| c.get_value().to_string())
            .unwrap_or_default()
    };

    assert_eq!(cell("A1"), "ID");
    assert_eq!(cell("J1"), "Updated At");
    assert_eq!(cell("B2"), "Bolt");
    assert_eq!(cell("C2"), "Hardware");
    assert_eq!(cell("D2"), "Acme");
    assert_eq!(cell("E2"), "SN1");
    assert_eq!(cell("B3"), "Nut");
    // Nut has no brand and no serie number.
    assert_eq!(cell("D3"), "");
    assert_eq!(cell("E3"), "");
    // Exactly two data rows.
    assert_eq!(cell("B4"), "");
}

#[tokio::test]
async fn edit_form_serves_current_values_and_options() {
    let jwt_secret = "test-secret";
    let srv = TestServer::spawn(jwt_secret).await;
    let catalog = srv.catalog();
    let hardware = catalog.add_category("Hardware").unwrap();
    catalog.add_brand("Acme").unwrap();
    let product = catalog
        .insert(draft("Bolt", Some(hardware.id), None, None))
        .await
        .unwrap();

    let token = mint_jwt(jwt_secret, vec![Role::new("clerk")]);
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/products/new", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["categories"].as_array().unwrap().len(), 1);
    assert_eq!(body["brands"].as_array().unwrap().len(), 1);

    let res = client
        .get(format!("{}/products/{}/edit", srv.base_url, product.id))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["product"]["title"], "Bolt");
    assert_eq!(body["product"]["category_name"], "Hardware");
    assert_eq!(body["categories"][0]["name"], "Hardware");

    // Updating through the form keeps the same id.
    let category_id = hardware.id.to_string();
    let res = client
        .post(format!("{}/products/{}/edit", srv.base_url, product.id))
        .bearer_auth(&token)
        .form(&[
            ("title", "Bolt M8"),
            ("category", category_id.as_str()),
            ("cost_price", "1.75"),
            ("selling_price", "3.25"),
            ("quantity", "90"),
        ])
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["id"], product.id.value());
    assert_eq!(body["title"], "Bolt M8");
    assert_eq!(body["quantity"], 90);
}
