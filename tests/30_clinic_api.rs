mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

#[tokio::test]
async fn cat_visit_treatment_flow() -> Result<()> {
    let server = common::ensure_server().await?;
    let token = common::admin_token(server).await?;
    let client = reqwest::Client::new();

    // Create Milo
    let res = client
        .post(server.url("/api/v1/cats"))
        .bearer_auth(&token)
        .json(&json!({ "name": "Milo", "age": 2, "breed": "Tabby", "weight": 4 }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let cat = res.json::<Value>().await?;
    let cat_id = cat["id"].as_i64().expect("cat id");

    // No visits yet
    let history = client
        .get(server.url(&format!("/api/v1/cats/{}/history", cat_id)))
        .bearer_auth(&token)
        .send()
        .await?
        .json::<Value>()
        .await?;
    assert_eq!(history["cat"]["name"], "Milo");
    assert_eq!(history["visits"], json!([]));

    // Visit with one treatment
    let res = client
        .post(server.url("/api/v1/visits"))
        .bearer_auth(&token)
        .json(&json!({
            "date": "2024-05-10T09:30:00Z",
            "motif": "vaccination",
            "veterinaire": "Dr. Vega",
            "cat_id": cat_id
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let visit_id = res.json::<Value>().await?["id"].as_i64().expect("visit id");

    let res = client
        .post(server.url("/api/v1/treatments"))
        .bearer_auth(&token)
        .json(&json!({ "name": "rabies shot", "visit_id": visit_id }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);

    let treatments = client
        .get(server.url(&format!("/api/v1/visits/{}/treatments", visit_id)))
        .bearer_auth(&token)
        .send()
        .await?
        .json::<Value>()
        .await?;
    assert_eq!(treatments[0]["name"], "rabies shot");

    // Deleting the cat keeps the visit but clears its cat
    let res = client
        .delete(server.url(&format!("/api/v1/cats/{}", cat_id)))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let visit = client
        .get(server.url(&format!("/api/v1/visits/{}", visit_id)))
        .bearer_auth(&token)
        .send()
        .await?
        .json::<Value>()
        .await?;
    assert_eq!(visit["cat_id"], Value::Null);

    Ok(())
}

#[tokio::test]
async fn standard_user_is_read_only() -> Result<()> {
    let server = common::ensure_server().await?;
    let admin = common::admin_token(server).await?;
    let client = reqwest::Client::new();

    let res = client
        .post(server.url("/api/v1/users"))
        .bearer_auth(&admin)
        .json(&json!({ "email": "reader@clinic.test", "password": "reader-password" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let user = res.json::<Value>().await?;
    assert_eq!(user["role"], "user");
    assert!(user.get("password").is_none());

    let token = common::login(server, "reader@clinic.test", "reader-password").await?;

    let res = client.get(server.url("/api/v1/cats")).bearer_auth(&token).send().await?;
    assert_eq!(res.status(), StatusCode::OK);

    let res = client
        .post(server.url("/api/v1/cats"))
        .bearer_auth(&token)
        .json(&json!({ "name": "Luna", "age": 1, "breed": "Persian", "weight": 3 }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = client.get(server.url("/api/v1/users")).bearer_auth(&token).send().await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    Ok(())
}

#[tokio::test]
async fn visit_filter_matches_both_criteria() -> Result<()> {
    let server = common::ensure_server().await?;
    let token = common::admin_token(server).await?;
    let client = reqwest::Client::new();

    let cat = client
        .post(server.url("/api/v1/cats"))
        .bearer_auth(&token)
        .json(&json!({ "name": "Oscar", "age": 7, "breed": "Maine Coon", "weight": 7.5 }))
        .send()
        .await?
        .json::<Value>()
        .await?;

    for (motif, vet) in [("dental", "Dr. Kim"), ("dental", "Dr. Roy"), ("surgery", "Dr. Kim")] {
        let res = client
            .post(server.url("/api/v1/visits"))
            .bearer_auth(&token)
            .json(&json!({
                "date": "2024-06-01T08:00:00Z",
                "motif": motif,
                "veterinaire": vet,
                "cat_id": cat["id"]
            }))
            .send()
            .await?;
        assert_eq!(res.status(), StatusCode::CREATED);
    }

    let both = client
        .get(server.url("/api/v1/visits/filter"))
        .query(&[("motif", "dental"), ("veterinaire", "Dr. Kim")])
        .bearer_auth(&token)
        .send()
        .await?
        .json::<Vec<Value>>()
        .await?;
    assert_eq!(both.len(), 1);
    assert_eq!(both[0]["motif"], "dental");
    assert_eq!(both[0]["veterinaire"], "Dr. Kim");

    let dental = client
        .get(server.url("/api/v1/visits/filter"))
        .query(&[("motif", "dental")])
        .bearer_auth(&token)
        .send()
        .await?
        .json::<Vec<Value>>()
        .await?;
    assert_eq!(dental.len(), 2);

    Ok(())
}
