mod common;

use ngo_cms::config::RegistrationMode;
use reqwest::StatusCode;
use serde_json::{json, Value};

fn ids(list: &Value) -> Vec<&str> {
    list.as_array()
        .unwrap()
        .iter()
        .map(|item| item["id"].as_str().unwrap())
        .collect()
}

fn contact_body(first_name: &str) -> Value {
    json!({
        "first_name": first_name,
        "last_name": "Otieno",
        "email": "amina@example.org",
        "phone_number": "",
        "inquiry_type": "volunteer",
        "message": "I would like to help on weekends."
    })
}

// ── Health ──────────────────────────────────────────────────────

#[tokio::test]
async fn health_returns_ok() {
    let app = common::spawn_app().await;

    let resp = app.client.get(app.url("/health")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()["x-content-type-options"], "nosniff");
    assert_eq!(resp.text().await.unwrap(), "ok");

    common::cleanup(app).await;
}

// ── Registration & Auth ─────────────────────────────────────────

#[tokio::test]
async fn first_user_is_staff_and_registration_then_closes() {
    let app = common::spawn_app().await;

    let (body, status) = app.register("admin@test.com", "password123", "Admin").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["is_staff"], true);
    assert!(body["access_token"].is_string());
    assert!(body["refresh_token"].is_string());

    let (body, status) = app.register("other@test.com", "password123", "Other").await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(body["error"].as_str().unwrap().contains("disabled"));

    common::cleanup(app).await;
}

#[tokio::test]
async fn login_rejects_bad_password() {
    let app = common::spawn_app().await;
    app.bootstrap().await;

    let (body, status) = app.login("admin@test.com", "password123").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["access_token"].is_string());

    let (_, status) = app.login("admin@test.com", "wrongpassword").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    common::cleanup(app).await;
}

#[tokio::test]
async fn refresh_token_reuse_revokes_sessions() {
    let app = common::spawn_app().await;
    app.bootstrap().await;
    let (login_body, _) = app.login("admin@test.com", "password123").await;
    let refresh = login_body["refresh_token"].as_str().unwrap().to_string();

    let resp = app
        .client
        .post(app.url("/api/v1/auth/refresh"))
        .header("cookie", format!("refresh_token={refresh}"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    let rotated = body["refresh_token"].as_str().unwrap().to_string();
    assert_ne!(rotated, refresh);

    // Spending the old token again kills every session, including the rotated one
    let resp = app
        .client
        .post(app.url("/api/v1/auth/refresh"))
        .header("cookie", format!("refresh_token={refresh}"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let resp = app
        .client
        .post(app.url("/api/v1/auth/refresh"))
        .header("cookie", format!("refresh_token={rotated}"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    common::cleanup(app).await;
}

#[tokio::test]
async fn invalid_token_is_rejected_not_anonymous() {
    let app = common::spawn_app().await;

    let (_, status) = app.get_auth("/api/v1/team-members", "not-a-jwt").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    common::cleanup(app).await;
}

// ── Access policy ───────────────────────────────────────────────

#[tokio::test]
async fn anonymous_writes_are_unauthenticated() {
    let app = common::spawn_app().await;

    let (_, status) = app.post("/api/v1/tags", &json!({ "name": "Water" })).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (_, status) = app.get("/api/v1/contact").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    common::cleanup(app).await;
}

#[tokio::test]
async fn contact_management_is_staff_only() {
    let app = common::spawn_app_with(|c| c.registration = RegistrationMode::Open).await;
    let staff = app.bootstrap().await;
    let volunteer = app.volunteer().await;

    // Ordinary accounts may still edit site content
    app.create_tag(&volunteer, "Sanitation").await;

    let (contact, status) = app.post("/api/v1/contact", &contact_body("Amina")).await;
    assert_eq!(status, StatusCode::CREATED);
    let id = contact["id"].as_str().unwrap();

    let (_, status) = app.get_auth("/api/v1/contact", &volunteer).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (_, status) = app
        .get_auth(&format!("/api/v1/contact/{id}"), &volunteer)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (list, status) = app.get_auth("/api/v1/contact", &staff).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&list), vec![id]);

    common::cleanup(app).await;
}

// ── Visibility ──────────────────────────────────────────────────

#[tokio::test]
async fn inactive_team_members_are_hidden_from_the_public() {
    let app = common::spawn_app().await;
    let token = app.bootstrap().await;

    let (active, status) = app
        .post_auth(
            "/api/v1/team-members",
            &token,
            &json!({ "name": "Grace", "designation": "Director", "role": "leadership" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{active}");
    assert_eq!(active["is_active"], true);

    let (inactive, status) = app
        .post_auth(
            "/api/v1/team-members",
            &token,
            &json!({
                "name": "Peter",
                "designation": "Treasurer",
                "role": "board",
                "is_active": false
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let hidden = inactive["id"].as_str().unwrap();

    let (public, _) = app.get("/api/v1/team-members").await;
    assert_eq!(ids(&public), vec![active["id"].as_str().unwrap()]);

    let (all, _) = app.get_auth("/api/v1/team-members", &token).await;
    assert_eq!(all.as_array().unwrap().len(), 2);

    let (_, status) = app.get(&format!("/api/v1/team-members/{hidden}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (_, status) = app
        .get_auth(&format!("/api/v1/team-members/{hidden}"), &token)
        .await;
    assert_eq!(status, StatusCode::OK);

    common::cleanup(app).await;
}

#[tokio::test]
async fn only_featured_testimonials_are_public() {
    let app = common::spawn_app().await;
    let token = app.bootstrap().await;

    let (featured, status) = app
        .post_auth(
            "/api/v1/testimonials",
            &token,
            &json!({ "name": "Joyce", "message": "Life changing.", "is_featured": true }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(featured["rating"], 5);

    let (_, status) = app
        .post_auth(
            "/api/v1/testimonials",
            &token,
            &json!({ "name": "Sam", "message": "Good.", "rating": 4 }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (public, _) = app.get("/api/v1/testimonials").await;
    assert_eq!(ids(&public), vec![featured["id"].as_str().unwrap()]);
    let (all, _) = app.get_auth("/api/v1/testimonials", &token).await;
    assert_eq!(all.as_array().unwrap().len(), 2);

    let (body, status) = app
        .post_auth(
            "/api/v1/testimonials",
            &token,
            &json!({ "name": "Max", "message": "Too good.", "rating": 6 }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["fields"]["rating"].is_array());

    common::cleanup(app).await;
}

#[tokio::test]
async fn faq_collections_are_separate() {
    let app = common::spawn_app().await;
    let token = app.bootstrap().await;

    let (contact_faq, status) = app
        .post_auth(
            "/api/v1/contact-faqs",
            &token,
            &json!({ "question": "Where are you?", "answer": "Nairobi." }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let (_, status) = app
        .post_auth(
            "/api/v1/membership-faqs",
            &token,
            &json!({ "question": "Is there a fee?", "answer": "No.", "is_published": false }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (contact_list, _) = app.get("/api/v1/contact-faqs").await;
    assert_eq!(ids(&contact_list), vec![contact_faq["id"].as_str().unwrap()]);

    let (membership_public, _) = app.get("/api/v1/membership-faqs").await;
    assert!(membership_public.as_array().unwrap().is_empty());
    let (membership_staff, _) = app.get_auth("/api/v1/membership-faqs", &token).await;
    assert_eq!(membership_staff.as_array().unwrap().len(), 1);

    // A contact FAQ id is not reachable through the membership collection
    let (_, status) = app
        .get_auth(
            &format!(
                "/api/v1/membership-faqs/{}",
                contact_faq["id"].as_str().unwrap()
            ),
            &token,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    common::cleanup(app).await;
}

// ── Contact ─────────────────────────────────────────────────────

#[tokio::test]
async fn contact_phone_validation() {
    let app = common::spawn_app().await;

    let mut body = contact_body("Amina");
    body["phone_number"] = json!("call me maybe");
    let (resp, status) = app.post("/api/v1/contact", &body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(resp["fields"]["phone_number"].is_array());

    body["phone_number"] = json!("+254712345678");
    let (resp, status) = app.post("/api/v1/contact", &body).await;
    assert_eq!(status, StatusCode::CREATED, "{resp}");
    assert_eq!(resp["full_name"], "Amina Otieno");
    assert_eq!(resp["inquiry_type"], "volunteer");
    assert_eq!(resp["responded"], false);

    common::cleanup(app).await;
}

#[tokio::test]
async fn mark_responded_is_idempotent() {
    let app = common::spawn_app().await;
    let token = app.bootstrap().await;

    let (contact, _) = app.post("/api/v1/contact", &contact_body("Amina")).await;
    let id = contact["id"].as_str().unwrap();
    let path = format!("/api/v1/contact/{id}/mark_responded");

    let (body, status) = app
        .post_auth(&path, &token, &json!({ "response_notes": "Called back." }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "contact marked as responded");

    // The latest notes replace the earlier ones
    let (body, status) = app
        .post_auth(&path, &token, &json!({ "response_notes": "Followed up by email." }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "contact marked as responded");

    let (stored, _) = app
        .get_auth(&format!("/api/v1/contact/{id}"), &token)
        .await;
    assert_eq!(stored["responded"], true);
    assert_eq!(stored["response_notes"], "Followed up by email.");

    // No notes at all keeps what is stored
    let (body, status) = app.post_auth(&path, &token, &json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "contact marked as responded");

    let (stored, _) = app
        .get_auth(&format!("/api/v1/contact/{id}"), &token)
        .await;
    assert_eq!(stored["responded"], true);
    assert_eq!(stored["response_notes"], "Followed up by email.");

    let (_, status) = app.post(&path, &json!({})).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    common::cleanup(app).await;
}

#[tokio::test]
async fn anonymous_contact_submissions_are_rate_limited() {
    let app = common::spawn_app().await;

    for n in 0..3 {
        let (_, status) = app
            .post("/api/v1/contact", &contact_body(&format!("Visitor{n}")))
            .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (_, status) = app.post("/api/v1/contact", &contact_body("Visitor3")).await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);

    // Staff entering contacts by hand are not limited
    let token = app.bootstrap().await;
    let (_, status) = app
        .post_auth("/api/v1/contact", &token, &contact_body("Walkin"))
        .await;
    assert_eq!(status, StatusCode::CREATED);

    common::cleanup(app).await;
}

// ── Tags ────────────────────────────────────────────────────────

#[tokio::test]
async fn tag_slug_is_derived_and_names_are_unique() {
    let app = common::spawn_app().await;
    let token = app.bootstrap().await;

    let tag = app.create_tag(&token, "Clean Water").await;
    assert_eq!(tag["slug"], "clean-water");

    let tag = app.create_tag(&token, "Women's Health").await;
    assert_eq!(tag["slug"], "womens-health");
    let tag = app.create_tag(&token, "Café Gardens").await;
    assert_eq!(tag["slug"], "cafe-gardens");

    let (body, status) = app.get("/api/v1/tags/clean-water").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Clean Water");

    let (body, status) = app
        .post_auth("/api/v1/tags", &token, &json!({ "name": "Clean Water", "slug": "water-2" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["fields"]["name"].is_array(), "{body}");

    let (body, status) = app
        .post_auth("/api/v1/tags", &token, &json!({ "name": "Wells", "slug": "Not A Slug" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["fields"]["slug"].is_array());

    common::cleanup(app).await;
}

// ── Projects ────────────────────────────────────────────────────

#[tokio::test]
async fn related_projects_rank_by_groups() {
    let app = common::spawn_app().await;
    let token = app.bootstrap().await;

    let water = app.create_tag(&token, "water").await;
    let water_id = water["id"].as_str().unwrap();

    let a = app
        .create_project(&token, "Project A", "Health", "2024", &[water_id])
        .await;
    let b = app.create_project(&token, "Project B", "Health", "2023", &[]).await;
    let c = app
        .create_project(&token, "Project C", "Education", "2023", &[water_id])
        .await;
    let d = app
        .create_project(&token, "Project D", "Health", "2022", &[water_id])
        .await;
    app.create_project(&token, "Project E", "Other", "2021", &[]).await;

    let (related, status) = app.get("/api/v1/projects/project-a/related").await;
    assert_eq!(status, StatusCode::OK);
    let related = ids(&related);

    // D shares both category and tag, then C (tag only), then B (category only)
    assert_eq!(
        related,
        vec![
            d["id"].as_str().unwrap(),
            c["id"].as_str().unwrap(),
            b["id"].as_str().unwrap(),
        ]
    );
    assert!(!related.contains(&a["id"].as_str().unwrap()));

    let (detail, _) = app.get("/api/v1/projects/project-a").await;
    assert_eq!(ids(&detail["related_projects"]), related);
    assert_eq!(detail["tags"][0]["slug"], "water");

    let (lonely, _) = app.get("/api/v1/projects/project-e/related").await;
    assert!(lonely.as_array().unwrap().is_empty());

    common::cleanup(app).await;
}

#[tokio::test]
async fn related_projects_cap_at_five() {
    let app = common::spawn_app().await;
    let token = app.bootstrap().await;

    app.create_project(&token, "Clinic", "Health", "2024", &[]).await;
    for n in 0..7 {
        app.create_project(&token, &format!("Outreach {n}"), "Health", "2024", &[])
            .await;
    }

    let (related, _) = app.get("/api/v1/projects/clinic/related").await;
    assert_eq!(related.as_array().unwrap().len(), 5);

    common::cleanup(app).await;
}

#[tokio::test]
async fn project_categories_and_years() {
    let app = common::spawn_app().await;
    let token = app.bootstrap().await;

    let (categories, status) = app.get("/api/v1/projects/categories").await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = categories
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect();
    assert_eq!(names.len(), 6);
    assert!(names.contains(&"Youth Development"));

    app.create_project(&token, "Boreholes", "Infrastructure", "2022", &[]).await;
    app.create_project(&token, "Scholarships", "Education", "2024", &[]).await;
    app.create_project(&token, "Mentoring", "Youth Development", "2024", &[]).await;

    let (years, _) = app.get("/api/v1/projects/years").await;
    assert_eq!(years, json!(["2024", "2022"]));

    let (filtered, _) = app.get("/api/v1/projects?category=Education").await;
    assert_eq!(filtered.as_array().unwrap().len(), 1);
    assert_eq!(filtered[0]["slug"], "scholarships");

    let (_, status) = app.get("/api/v1/projects?category=Sports").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    common::cleanup(app).await;
}

#[tokio::test]
async fn patch_merges_into_stored_project() {
    let app = common::spawn_app().await;
    let token = app.bootstrap().await;

    app.create_project(&token, "Boreholes", "Infrastructure", "2022", &[]).await;

    let (patched, status) = app
        .patch_auth(
            "/api/v1/projects/boreholes",
            &token,
            &json!({ "location": "Turkana" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{patched}");
    assert_eq!(patched["location"], "Turkana");
    assert_eq!(patched["title"], "Boreholes");
    assert_eq!(patched["year"], "2022");

    // A full replace needs every required field
    let (body, status) = app
        .put_auth(
            "/api/v1/projects/boreholes",
            &token,
            &json!({ "location": "Turkana" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["fields"]["title"].is_array());

    common::cleanup(app).await;
}

#[tokio::test]
async fn deleting_a_project_cascades() {
    let app = common::spawn_app().await;
    let token = app.bootstrap().await;

    let project = app
        .create_project(&token, "Water Kiosk", "Health", "2023", &[])
        .await;
    let project_id = project["id"].as_str().unwrap();

    let (image, status) = app
        .post_auth(
            "/api/v1/images",
            &token,
            &json!({ "project": project_id, "image": "project_images/kiosk.jpg", "order": 1 }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{image}");
    assert!(image["image_url"]
        .as_str()
        .unwrap()
        .ends_with("/media/project_images/kiosk.jpg"));

    let (_, status) = app
        .post_auth(
            "/api/v1/phases",
            &token,
            &json!({ "project": project_id, "name": "Survey", "duration": "2 weeks" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let (_, status) = app
        .post_auth(
            "/api/v1/outcomes",
            &token,
            &json!({ "project": project_id, "description": "Safe water for 300 homes" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (detail, _) = app.get("/api/v1/projects/water-kiosk").await;
    assert_eq!(detail["images"].as_array().unwrap().len(), 1);
    assert_eq!(detail["phases"].as_array().unwrap().len(), 1);
    assert_eq!(detail["outcomes"].as_array().unwrap().len(), 1);

    let status = app.delete_auth("/api/v1/projects/water-kiosk", &token).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, status) = app.get("/api/v1/projects/water-kiosk").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    for path in ["/api/v1/images", "/api/v1/phases", "/api/v1/outcomes"] {
        let (list, status) = app.get(path).await;
        assert_eq!(status, StatusCode::OK);
        assert!(list.as_array().unwrap().is_empty(), "{path} not empty");
    }

    common::cleanup(app).await;
}

#[tokio::test]
async fn unknown_project_reference_is_a_field_error() {
    let app = common::spawn_app().await;
    let token = app.bootstrap().await;

    let (body, status) = app
        .post_auth(
            "/api/v1/outcomes",
            &token,
            &json!({ "project": "0190f5c4-0000-7000-8000-000000000000", "description": "x" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["fields"]["project"].is_array(), "{body}");

    common::cleanup(app).await;
}

#[tokio::test]
async fn image_paths_outside_the_media_root_are_rejected() {
    let app = common::spawn_app().await;
    let token = app.bootstrap().await;

    let project = app.create_project(&token, "Kiosk", "Health", "2023", &[]).await;
    let elsewhere = tempfile::tempdir().unwrap();
    let victim = elsewhere.path().join("victim.png");
    std::fs::write(&victim, b"png").unwrap();

    for image in [
        victim.to_str().unwrap(),
        "project_images/../../victim.png",
        "downloads/victim.png",
    ] {
        let (body, status) = app
            .post_auth(
                "/api/v1/images",
                &token,
                &json!({ "project": project["id"], "image": image }),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{image} accepted");
        assert!(body["fields"]["image"].is_array(), "{body}");
    }

    let (list, _) = app.get("/api/v1/images").await;
    assert!(list.as_array().unwrap().is_empty());
    assert!(victim.exists());

    common::cleanup(app).await;
}

#[tokio::test]
async fn deleting_an_image_keeps_files_still_in_use() {
    let app = common::spawn_app().await;
    let token = app.bootstrap().await;
    let media = app.media_dir.path();

    let project = app.create_project(&token, "Kiosk", "Health", "2023", &[]).await;

    // A team photo reused as a project image
    std::fs::create_dir_all(media.join("team")).unwrap();
    std::fs::write(media.join("team/ada.png"), b"png").unwrap();
    let (_, status) = app
        .post_auth(
            "/api/v1/team-members",
            &token,
            &json!({
                "name": "Ada",
                "designation": "Engineer",
                "role": "staff",
                "image": "team/ada.png"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let (borrowed, status) = app
        .post_auth(
            "/api/v1/images",
            &token,
            &json!({ "project": project["id"], "image": "team/ada.png" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{borrowed}");

    let status = app
        .delete_auth(
            &format!("/api/v1/images/{}", borrowed["id"].as_str().unwrap()),
            &token,
        )
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(media.join("team/ada.png").exists());

    // One file behind two image rows survives until the last row goes
    std::fs::create_dir_all(media.join("project_images")).unwrap();
    std::fs::write(media.join("project_images/shared.jpg"), b"jpg").unwrap();
    let mut image_ids = Vec::new();
    for order in 0..2 {
        let (image, status) = app
            .post_auth(
                "/api/v1/images",
                &token,
                &json!({
                    "project": project["id"],
                    "image": "project_images/shared.jpg",
                    "order": order
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        image_ids.push(image["id"].as_str().unwrap().to_string());
    }

    app.delete_auth(&format!("/api/v1/images/{}", image_ids[0]), &token)
        .await;
    assert!(media.join("project_images/shared.jpg").exists());

    app.delete_auth(&format!("/api/v1/images/{}", image_ids[1]), &token)
        .await;
    assert!(!media.join("project_images/shared.jpg").exists());

    common::cleanup(app).await;
}

#[tokio::test]
async fn malformed_ids_are_json_not_found() {
    let app = common::spawn_app().await;
    let token = app.bootstrap().await;

    for path in [
        "/api/v1/team-members/not-a-uuid",
        "/api/v1/images/42",
        "/api/v1/contact/abc",
    ] {
        let (body, status) = app.get_auth(path, &token).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{path}");
        assert!(body["error"].is_string(), "{path}: {body}");
    }

    common::cleanup(app).await;
}

// ── Partners ────────────────────────────────────────────────────

#[tokio::test]
async fn partners_filter_by_project() {
    let app = common::spawn_app().await;
    let token = app.bootstrap().await;

    let kiosk = app.create_project(&token, "Kiosk", "Health", "2023", &[]).await;
    let school = app.create_project(&token, "School", "Education", "2023", &[]).await;

    let (partner, status) = app
        .post_auth(
            "/api/v1/partners",
            &token,
            &json!({ "name": "Rotary", "project_ids": [kiosk["id"]] }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{partner}");

    let (list, _) = app
        .get(&format!("/api/v1/partners?project={}", kiosk["id"].as_str().unwrap()))
        .await;
    assert_eq!(ids(&list), vec![partner["id"].as_str().unwrap()]);

    let (list, _) = app
        .get(&format!("/api/v1/partners?project={}", school["id"].as_str().unwrap()))
        .await;
    assert!(list.as_array().unwrap().is_empty());

    let (detail, _) = app.get("/api/v1/projects/kiosk").await;
    assert_eq!(detail["partners"][0]["name"], "Rotary");

    common::cleanup(app).await;
}

// ── Media ───────────────────────────────────────────────────────

#[tokio::test]
async fn media_upload_is_served_back() {
    let app = common::spawn_app().await;
    let token = app.bootstrap().await;

    let form = reqwest::multipart::Form::new()
        .text("folder", "team")
        .part(
            "file",
            reqwest::multipart::Part::bytes(b"fake-png".to_vec()).file_name("grace.png"),
        );
    let resp = app
        .client
        .post(app.url("/api/v1/media"))
        .bearer_auth(&token)
        .multipart(form)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = resp.json().await.unwrap();
    let path = body["path"].as_str().unwrap();
    assert!(path.starts_with("team/"));
    assert!(path.ends_with("grace.png"));

    let resp = app
        .client
        .get(app.url(&format!("/media/{path}")))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.bytes().await.unwrap().as_ref(), b"fake-png");

    let form = reqwest::multipart::Form::new().part(
        "file",
        reqwest::multipart::Part::bytes(b"%PDF".to_vec()).file_name("cv.pdf"),
    );
    let resp = app
        .client
        .post(app.url("/api/v1/media"))
        .bearer_auth(&token)
        .multipart(form)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    common::cleanup(app).await;
}

// ── Admin ───────────────────────────────────────────────────────

#[tokio::test]
async fn staff_changes_are_audited() {
    let app = common::spawn_app_with(|c| c.registration = RegistrationMode::Open).await;
    let staff = app.bootstrap().await;
    let volunteer = app.volunteer().await;

    let (_, status) = app.get_auth("/api/v1/admin/audit", &volunteer).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    app.create_tag(&staff, "Health").await;

    let (page, status) = app.get_auth("/api/v1/admin/audit", &staff).await;
    assert_eq!(status, StatusCode::OK);
    let actions: Vec<&str> = page["events"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["action"].as_str().unwrap())
        .collect();
    assert!(actions.contains(&"tag.created"), "{actions:?}");

    common::cleanup(app).await;
}
