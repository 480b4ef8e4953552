#![cfg(feature = "resources")]

mod common;

use backoffice_client::resources::ProductLink;
use backoffice_client::{PageQuery, RecordId, UploadForm};
use common::{MockServer, Recorded, client, session};
use futures::FutureExt;
use futures::future::BoxFuture;
use reqwest::Method;
use serde_json::json;

fn echo(req: Recorded) -> BoxFuture<'static, common::Reply> {
    async move { (200, json!({ "data": req.path_and_query() })) }.boxed()
}

async fn setup() -> (MockServer, backoffice_client::ApiClient) {
    let server = MockServer::start(echo).await;
    let (client, _) = client(server.config(), Some(session("tok-1")));
    (server, client)
}

#[tokio::test]
async fn collection_list_forwards_filters() {
    let (server, client) = setup().await;

    let res = client
        .players()
        .list(&PageQuery::new(2, 25).with_status("active"))
        .await;

    assert!(res.success);
    let req = server.last();
    assert_eq!(req.method, Method::GET);
    assert_eq!(req.path_and_query(), "/players?page=2&perPage=25&status=active");
}

#[tokio::test]
async fn collection_crud_paths() {
    let (server, client) = setup().await;
    let contacts = client.contacts();
    let id = RecordId::from(42_u64);

    contacts.get(&id).await;
    contacts.create(json!({ "name": "Bo" })).await;
    contacts.update(&id, json!({ "name": "Bea" })).await;
    contacts.delete(&id).await;

    let seen: Vec<(Method, String)> = server
        .requests()
        .into_iter()
        .map(|r| (r.method.clone(), r.path_and_query()))
        .collect();
    assert_eq!(
        seen,
        vec![
            (Method::GET, "/contacts/42".to_string()),
            (Method::POST, "/contacts".to_string()),
            (Method::PUT, "/contacts/42".to_string()),
            (Method::DELETE, "/contacts/42".to_string()),
        ]
    );
    assert_eq!(server.requests()[2].json(), json!({ "name": "Bea" }));
}

#[tokio::test]
async fn form_responses_and_moderation() {
    let (server, client) = setup().await;
    let forms = client.forms();
    let form = RecordId::from("f1");
    let response = RecordId::from("r9");

    forms
        .responses(&form, &PageQuery::new(1, 10).with_status("pending"))
        .await;
    assert_eq!(
        server.last().path_and_query(),
        "/dashboard/forms/f1/responses?page=1&perPage=10&status=pending"
    );

    forms.hide(&response).await;
    let hide = server.last();
    assert_eq!(hide.method, Method::PATCH);
    assert_eq!(hide.path_and_query(), "/dashboard/forms/responses/r9/hide");

    forms.fetch_image("https://cdn.example.com/a.png").await;
    assert_eq!(
        server.last().json(),
        json!({ "url": "https://cdn.example.com/a.png" })
    );
}

#[tokio::test]
async fn question_answer_delete_encodes_timestamp() {
    let (server, client) = setup().await;

    client
        .questions()
        .delete_answer(&RecordId::from("q7"), "2024-05-01T10:00:00+02:00")
        .await;

    let req = server.last();
    assert_eq!(req.method, Method::DELETE);
    assert_eq!(
        req.path_and_query(),
        "/api/questions/q7/answers?createdAt=2024-05-01T10%3A00%3A00%2B02%3A00"
    );
}

#[tokio::test]
async fn whatsapp_send_body() {
    let (server, client) = setup().await;

    client
        .whatsapp()
        .send(&["+15550100".into(), "+15550101".into()], "Tee time moved")
        .await;

    let req = server.last();
    assert_eq!(req.path_and_query(), "/whatsapp/send");
    assert_eq!(
        req.json(),
        json!({ "numbers": ["+15550100", "+15550101"], "bodyText": "Tee time moved" })
    );

    client.whatsapp().replies(3, 20).await;
    assert_eq!(server.last().path_and_query(), "/whatsapp/replies?page=3&limit=20");
}

#[tokio::test]
async fn admin_password_uses_server_key() {
    let (server, client) = setup().await;

    client.admin().update_password("old", "new").await;

    let req = server.last();
    assert_eq!(req.method, Method::PATCH);
    assert_eq!(req.path_and_query(), "/admin/password");
    assert_eq!(req.json(), json!({ "oldPaasword": "old", "newPassword": "new" }));
}

#[tokio::test]
async fn product_duplication_is_multipart() {
    let (server, client) = setup().await;

    let res = client
        .products()
        .duplicate_printify_product(
            &RecordId::from("r9"),
            "Spring",
            ("cover.png", vec![1, 2, 3]),
            ("calendar.png", vec![4, 5, 6]),
        )
        .await;
    assert!(res.success);

    let req = server.last();
    assert_eq!(req.path_and_query(), "/product/duplicatePrintifyProduct");
    assert!(
        req.header("content-type")
            .unwrap()
            .starts_with("multipart/form-data; boundary=")
    );
    let body = String::from_utf8_lossy(&req.body);
    for field in ["responseId", "title", "coverPhoto", "calenderPhoto"] {
        assert!(body.contains(&format!("name=\"{field}\"")), "missing {field}");
    }
}

#[tokio::test]
async fn product_link_body_is_camel_case() {
    let (server, client) = setup().await;

    client
        .products()
        .send_product_link(&ProductLink {
            lead_id: RecordId::from("l1"),
            product_link: "https://shop.example.com/p/1".into(),
            immediate: true,
            phone_number: "+15550100".into(),
        })
        .await;

    assert_eq!(
        server.last().json(),
        json!({
            "leadId": "l1",
            "productLink": "https://shop.example.com/p/1",
            "immediate": true,
            "phoneNumber": "+15550100",
        })
    );
}

#[tokio::test]
async fn product_templates_page_three_at_a_time() {
    let (server, client) = setup().await;

    client.templates().product_templates(4).await;

    assert_eq!(
        server.last().path_and_query(),
        "/template/product/printify?page=4&perPage=3"
    );
}

#[tokio::test]
async fn uploads_go_to_their_endpoints() {
    let (server, client) = setup().await;

    client
        .attachments()
        .upload(UploadForm::new().file("file", "notes.pdf", b"%PDF".to_vec()))
        .await;
    assert_eq!(server.last().path_and_query(), "/attachment/upload");

    client
        .admin()
        .upload_profile_image(UploadForm::new().file_with_mime(
            "image",
            "me.jpg",
            "image/jpeg",
            vec![0xff, 0xd8],
        ))
        .await;
    let req = server.last();
    assert_eq!(req.method, Method::POST);
    assert_eq!(req.path_and_query(), "/me/profileImage");
    assert!(req.header("content-type").unwrap().starts_with("multipart/form-data"));
}

#[tokio::test]
async fn contacts_page_defaults_to_fifty() {
    let (server, client) = setup().await;

    client.contacts().page(2).await;
    assert_eq!(server.last().path_and_query(), "/contacts?page=2&perPage=50");

    client.listings().page(1).await;
    assert_eq!(server.last().path_and_query(), "/listings?page=1&perPage=10");
}

#[tokio::test]
async fn record_ids_stay_inside_their_segment() {
    let (server, client) = setup().await;

    client.contacts().get(&RecordId::from("a/b?x=1")).await;
    assert_eq!(server.last().path_and_query(), "/contacts/a%2Fb%3Fx%3D1");

    client.forms().confirm(&RecordId::from("r 9")).await;
    assert_eq!(
        server.last().path_and_query(),
        "/dashboard/forms/responses/r%209/confirm"
    );
}
