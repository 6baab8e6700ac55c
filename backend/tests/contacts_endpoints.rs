//! Contact endpoints exercised end to end over the in-memory adapters.
//!
//! Each test signs up real accounts, so bearer tokens pass through the
//! argon2 hasher and JWT codec exactly as in production.

mod support;

use std::net::SocketAddr;

use actix_web::http::StatusCode;
use actix_web::http::header::{AUTHORIZATION, RETRY_AFTER};
use actix_web::test;
use backend::RateLimitConfig;
use rstest::rstest;
use serde_json::{Value, json};

use support::{
    contact_payload, create_contact, instant, signup_and_login, test_app, unlimited_world_at,
    world_at,
};

fn names(contacts: &Value) -> Vec<String> {
    contacts
        .as_array()
        .expect("array body")
        .iter()
        .map(|c| c["first_name"].as_str().expect("first name").to_owned())
        .collect()
}

#[actix_web::test]
async fn requests_without_a_token_are_unauthorized() {
    let world = unlimited_world_at(instant(2025, 6, 1));
    let app = test::init_service(test_app(&world)).await;

    let res = test::call_service(&app, test::TestRequest::get().uri("/api/contacts").to_request())
        .await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["code"], "unauthorized");
}

#[actix_web::test]
async fn contact_lifecycle() {
    let world = unlimited_world_at(instant(2025, 6, 1));
    let app = test::init_service(test_app(&world)).await;
    let bearer = signup_and_login(&app, "ada", "ada@example.com").await;

    let created = create_contact(
        &app,
        &bearer,
        contact_payload("Charles", "Babbage", Some("1791-12-26")),
    )
    .await;
    let id = created["id"].as_i64().expect("contact id");
    assert_eq!(created["birthday"], "1791-12-26");
    let uri = format!("/api/contacts/{id}");

    let fetched: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri(&uri)
            .insert_header((AUTHORIZATION, bearer.clone()))
            .to_request(),
    )
    .await;
    assert_eq!(fetched, created);

    let updated: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::put()
            .uri(&uri)
            .insert_header((AUTHORIZATION, bearer.clone()))
            .set_json(json!({
                "first_name": "Charles",
                "last_name": "Babbage",
                "email": null,
                "phone_number": "555-0199",
                "birthday": null
            }))
            .to_request(),
    )
    .await;
    assert_eq!(updated["id"], id);
    assert_eq!(updated["phone_number"], "555-0199");
    assert!(updated["email"].is_null());
    assert!(updated["birthday"].is_null());

    let res = test::call_service(
        &app,
        test::TestRequest::delete()
            .uri(&uri)
            .insert_header((AUTHORIZATION, bearer.clone()))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let deleted: Value = test::read_body_json(res).await;
    assert_eq!(deleted, updated);

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&uri)
            .insert_header((AUTHORIZATION, bearer))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[rstest]
#[case::get("GET")]
#[case::put("PUT")]
#[case::delete("DELETE")]
#[actix_web::test]
async fn other_users_contacts_are_invisible(#[case] method: &str) {
    let world = unlimited_world_at(instant(2025, 6, 1));
    let app = test::init_service(test_app(&world)).await;
    let owner = signup_and_login(&app, "ada", "ada@example.com").await;
    let intruder = signup_and_login(&app, "eve", "eve@example.com").await;

    let created = create_contact(&app, &owner, contact_payload("Mary", "Somerville", None)).await;
    let uri = format!("/api/contacts/{}", created["id"]);

    let request = match method {
        "GET" => test::TestRequest::get(),
        "PUT" => test::TestRequest::put().set_json(contact_payload("Eve", "Hacker", None)),
        _ => test::TestRequest::delete(),
    };
    let res = test::call_service(
        &app,
        request
            .uri(&uri)
            .insert_header((AUTHORIZATION, intruder.clone()))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let intruder_list: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri("/api/contacts")
            .insert_header((AUTHORIZATION, intruder))
            .to_request(),
    )
    .await;
    assert_eq!(intruder_list, json!([]));

    let still_there: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri(&uri)
            .insert_header((AUTHORIZATION, owner))
            .to_request(),
    )
    .await;
    assert_eq!(still_there, created);
}

#[actix_web::test]
async fn listing_pages_in_creation_order() {
    let world = unlimited_world_at(instant(2025, 6, 1));
    let app = test::init_service(test_app(&world)).await;
    let bearer = signup_and_login(&app, "ada", "ada@example.com").await;
    for n in 0..12 {
        create_contact(&app, &bearer, contact_payload(&format!("C{n}"), "Row", None)).await;
    }

    let first_page: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri("/api/contacts")
            .insert_header((AUTHORIZATION, bearer.clone()))
            .to_request(),
    )
    .await;
    assert_eq!(names(&first_page).len(), 10);
    assert_eq!(names(&first_page)[0], "C0");

    let second_page: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri("/api/contacts?limit=10&offset=10")
            .insert_header((AUTHORIZATION, bearer))
            .to_request(),
    )
    .await;
    assert_eq!(names(&second_page), vec!["C10", "C11"]);
}

#[actix_web::test]
async fn search_combines_filters_with_or() {
    let world = unlimited_world_at(instant(2025, 6, 1));
    let app = test::init_service(test_app(&world)).await;
    let bearer = signup_and_login(&app, "ada", "ada@example.com").await;
    for (first, last) in [("Ada", "Lovelace"), ("Alan", "Turing"), ("Grace", "Hopper")] {
        create_contact(&app, &bearer, contact_payload(first, last, None)).await;
    }

    let found: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri("/api/contacts/search?first_name=Ada&last_name=Hopper")
            .insert_header((AUTHORIZATION, bearer.clone()))
            .to_request(),
    )
    .await;
    assert_eq!(names(&found), vec!["Ada", "Grace"]);

    let by_email: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri("/api/contacts/search?email=alan@example.com")
            .insert_header((AUTHORIZATION, bearer.clone()))
            .to_request(),
    )
    .await;
    assert_eq!(names(&by_email), vec!["Alan"]);

    let everything: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri("/api/contacts/search")
            .insert_header((AUTHORIZATION, bearer))
            .to_request(),
    )
    .await;
    assert_eq!(names(&everything), vec!["Ada", "Alan", "Grace"]);
}

#[actix_web::test]
async fn search_never_returns_another_users_namesakes() {
    let world = unlimited_world_at(instant(2025, 6, 1));
    let app = test::init_service(test_app(&world)).await;
    let owner = signup_and_login(&app, "ada", "ada@example.com").await;
    let other = signup_and_login(&app, "eve", "eve@example.com").await;

    let first = create_contact(&app, &owner, contact_payload("Ada", "Lovelace", None)).await;
    create_contact(&app, &other, contact_payload("Ada", "Byron", None)).await;
    let second = create_contact(&app, &owner, contact_payload("Ada", "King", None)).await;

    let found: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri("/api/contacts/search?first_name=Ada")
            .insert_header((AUTHORIZATION, owner))
            .to_request(),
    )
    .await;
    let ids: Vec<&Value> = found
        .as_array()
        .expect("array body")
        .iter()
        .map(|c| &c["id"])
        .collect();
    assert_eq!(ids, vec![&first["id"], &second["id"]]);
}

#[actix_web::test]
async fn birthdays_early_in_january_are_due_from_december_28() {
    let world = unlimited_world_at(instant(2024, 12, 28));
    let app = test::init_service(test_app(&world)).await;
    let bearer = signup_and_login(&app, "ada", "ada@example.com").await;
    create_contact(&app, &bearer, contact_payload("January", "Person", Some("2020-01-03"))).await;
    create_contact(&app, &bearer, contact_payload("Passed", "Person", Some("2024-12-20"))).await;

    let found: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri("/api/contacts/birthdays")
            .insert_header((AUTHORIZATION, bearer))
            .to_request(),
    )
    .await;
    assert_eq!(names(&found), vec!["January"]);
}

#[rstest]
#[case::search("/api/contacts/search/?first_name=Ada", vec!["Ada"])]
#[case::birthdays("/api/contacts/birthdays/", vec!["Ada"])]
#[case::list("/api/contacts/", vec!["Ada", "Grace"])]
#[actix_web::test]
async fn trailing_slashes_reach_the_same_routes(#[case] uri: &str, #[case] expected: Vec<&str>) {
    let world = unlimited_world_at(instant(2025, 12, 8));
    let app = test::init_service(test_app(&world)).await;
    let bearer = signup_and_login(&app, "ada", "ada@example.com").await;
    create_contact(&app, &bearer, contact_payload("Ada", "Lovelace", Some("1815-12-10"))).await;
    create_contact(&app, &bearer, contact_payload("Grace", "Hopper", Some("1906-12-30"))).await;

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(uri)
            .insert_header((AUTHORIZATION, bearer))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK, "{uri}");
    let body: Value = test::read_body_json(res).await;
    assert_eq!(names(&body), expected);
}

#[actix_web::test]
async fn birthdays_wrap_the_year_end() {
    let world = unlimited_world_at(instant(2025, 12, 29));
    let app = test::init_service(test_app(&world)).await;
    let bearer = signup_and_login(&app, "ada", "ada@example.com").await;
    for (first, birthday) in [
        ("January", Some("1990-01-02")),
        ("Today", Some("1985-12-29")),
        ("Later", Some("1970-01-10")),
        ("Past", Some("1999-12-28")),
        ("Unknown", None),
    ] {
        create_contact(&app, &bearer, contact_payload(first, "Person", birthday)).await;
    }

    let default_window: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri("/api/contacts/birthdays")
            .insert_header((AUTHORIZATION, bearer.clone()))
            .to_request(),
    )
    .await;
    assert_eq!(names(&default_window), vec!["Today", "January"]);

    let wider: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri("/api/contacts/birthdays?days=12")
            .insert_header((AUTHORIZATION, bearer))
            .to_request(),
    )
    .await;
    assert_eq!(names(&wider), vec!["Today", "January", "Later"]);
}

#[actix_web::test]
async fn leap_day_birthdays_fall_on_february_28() {
    let world = unlimited_world_at(instant(2027, 2, 25));
    let app = test::init_service(test_app(&world)).await;
    let bearer = signup_and_login(&app, "ada", "ada@example.com").await;
    create_contact(&app, &bearer, contact_payload("Leap", "Year", Some("2000-02-29"))).await;

    let found: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri("/api/contacts/birthdays?days=3")
            .insert_header((AUTHORIZATION, bearer.clone()))
            .to_request(),
    )
    .await;
    assert_eq!(names(&found), vec!["Leap"]);

    let too_short: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri("/api/contacts/birthdays?days=2")
            .insert_header((AUTHORIZATION, bearer))
            .to_request(),
    )
    .await;
    assert_eq!(too_short, json!([]));
}

#[actix_web::test]
async fn invalid_contacts_report_the_offending_field() {
    let world = unlimited_world_at(instant(2025, 6, 1));
    let app = test::init_service(test_app(&world)).await;
    let bearer = signup_and_login(&app, "ada", "ada@example.com").await;

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/contacts")
            .insert_header((AUTHORIZATION, bearer))
            .set_json(json!({
                "first_name": "",
                "last_name": "Lovelace",
                "phone_number": "555-0100"
            }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["details"]["field"], "first_name");
    assert_eq!(body["details"]["code"], "empty");
}

#[actix_web::test]
async fn contact_routes_are_rate_limited_per_client() {
    let world = world_at(
        instant(2025, 6, 1),
        RateLimitConfig::new(2, 60).expect("rate limit config"),
    );
    let app = test::init_service(test_app(&world)).await;
    let bearer = signup_and_login(&app, "ada", "ada@example.com").await;
    let client: SocketAddr = "203.0.113.9:4000".parse().expect("socket address");

    let call = |addr: SocketAddr| {
        test::TestRequest::get()
            .uri("/api/contacts")
            .peer_addr(addr)
            .insert_header((AUTHORIZATION, bearer.clone()))
            .to_request()
    };

    for _ in 0..2 {
        let res = test::call_service(&app, call(client)).await;
        assert_eq!(res.status(), StatusCode::OK);
    }
    let res = test::call_service(&app, call(client)).await;
    assert_eq!(res.status(), StatusCode::TOO_MANY_REQUESTS);
    assert!(res.headers().contains_key(RETRY_AFTER));
    assert!(res.headers().contains_key("trace-id"));
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["code"], "too_many_requests");

    let elsewhere: SocketAddr = "198.51.100.1:4000".parse().expect("socket address");
    let res = test::call_service(&app, call(elsewhere)).await;
    assert_eq!(res.status(), StatusCode::OK);

    // Auth routes sit outside the limited scope.
    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/users/me")
            .peer_addr(client)
            .insert_header((AUTHORIZATION, bearer.clone()))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
}
