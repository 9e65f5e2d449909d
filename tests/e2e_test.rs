mod fixtures;
mod helpers;

use reqwest::StatusCode;
use serde_json::{json, Value};

use helpers::{browser, location, login, seeded_pool, spawn_app};

async fn dashboard(client: &reqwest::Client, base_url: &str, query: &str) -> Value {
    let response = client
        .get(format!("{base_url}/dashboard{query}"))
        .send()
        .await
        .expect("Dashboard request failed");
    assert_eq!(response.status(), StatusCode::OK);
    response.json().await.expect("Dashboard is not JSON")
}

/// End-to-end walk through the form surface: seed, log in, add a job,
/// clear it.
#[tokio::test]
async fn test_e2e_staff_job_lifecycle() {
    let (pool, _) = seeded_pool(1).await;
    let base_url = spawn_app(pool).await;
    let client = browser();

    login(&client, &base_url, "user01", "Pass01!").await;

    let view = dashboard(&client, &base_url, "").await;
    assert_eq!(view["user"]["username"], "user01");
    assert!(view["user"].get("password_hash").is_none());
    assert_eq!(view["jobs"].as_array().unwrap().len(), 0);

    let response = client
        .post(format!("{base_url}/jobs/add"))
        .form(&[("reference", "SHP-1"), ("importer_name", "Acme")])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert!(location(&response).starts_with("/dashboard?message="));

    let view = dashboard(&client, &base_url, "").await;
    let jobs = view["jobs"].as_array().unwrap();
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0]["reference"], "SHP-1");
    assert_eq!(jobs[0]["status"], "Pending");
    let job_id = jobs[0]["id"].as_i64().unwrap();

    let form = client
        .get(format!("{base_url}/jobs/{job_id}/edit"))
        .send()
        .await
        .unwrap();
    assert_eq!(form.status(), StatusCode::OK);
    let form: Value = form.json().await.unwrap();
    assert_eq!(form["job"]["reference"], "SHP-1");
    assert!(form["assignable_users"].as_array().unwrap().contains(&json!("user01")));

    let response = client
        .post(format!("{base_url}/jobs/{job_id}/edit"))
        .form(&[("status", "Cleared")])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let view = dashboard(&client, &base_url, "?status=Cleared").await;
    let jobs = view["jobs"].as_array().unwrap();
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0]["status"], "Cleared");
    assert_eq!(jobs[0]["importer_name"], "Acme");

    let pending = dashboard(&client, &base_url, "?status=Pending").await;
    assert_eq!(pending["jobs"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_e2e_requires_login() {
    let (pool, _) = seeded_pool(1).await;
    let base_url = spawn_app(pool).await;
    let client = browser();

    let response = client.get(format!("{base_url}/dashboard")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login");

    let response = client.get(format!("{base_url}/api/v1/jobs")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "unauthenticated");

    let response = client.get(format!("{base_url}/login")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.text().await.unwrap().contains("action=\"/login\""));
}

#[tokio::test]
async fn test_e2e_bad_credentials_redirect_back_to_login() {
    let (pool, _) = seeded_pool(1).await;
    let base_url = spawn_app(pool).await;
    let client = browser();

    for (username, password) in [("user01", "wrong"), ("nobody", "Pass01!")] {
        let response = client
            .post(format!("{base_url}/login"))
            .form(&[("username", username), ("password", password)])
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert!(location(&response).starts_with("/login?error="));
        assert!(response.headers().get(reqwest::header::SET_COOKIE).is_none());
    }
}

#[tokio::test]
async fn test_e2e_logout_ends_session() {
    let (pool, _) = seeded_pool(1).await;
    let base_url = spawn_app(pool).await;
    let client = browser();

    login(&client, &base_url, "admin", "admin123").await;
    dashboard(&client, &base_url, "").await;

    let response = client.get(format!("{base_url}/logout")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login");

    let response = client.get(format!("{base_url}/dashboard")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn test_e2e_form_errors_return_to_originating_form() {
    let (pool, _) = seeded_pool(1).await;
    let base_url = spawn_app(pool).await;
    let client = browser();
    login(&client, &base_url, "user01", "Pass01!").await;

    let response = client
        .post(format!("{base_url}/jobs/add"))
        .form(&[("reference", ""), ("importer_name", "Acme")])
        .send()
        .await
        .unwrap();
    assert!(location(&response).starts_with("/jobs/add?error="));

    for _ in 0..2 {
        client
            .post(format!("{base_url}/jobs/add"))
            .form(&[("reference", "SHP-9"), ("importer_name", "Acme")])
            .send()
            .await
            .unwrap();
    }
    let view = dashboard(&client, &base_url, "?q=shp-9").await;
    assert_eq!(view["jobs"].as_array().unwrap().len(), 1);

    let response = client
        .post(format!("{base_url}/jobs/4242/edit"))
        .form(&[("status", "Cleared")])
        .send()
        .await
        .unwrap();
    assert!(location(&response).starts_with("/dashboard?error="));

    let response = client
        .post(format!("{base_url}/jobs/add"))
        .form(&[("reference", "SHP-10"), ("importer_name", "Acme"), ("assigned_username", "ghost")])
        .send()
        .await
        .unwrap();
    assert!(location(&response).contains("unassigned"));
}

#[tokio::test]
async fn test_e2e_user_management_is_admin_only() {
    let (pool, _) = seeded_pool(1).await;
    let base_url = spawn_app(pool).await;

    let staff = browser();
    login(&staff, &base_url, "user01", "Pass01!").await;

    let response = staff
        .post(format!("{base_url}/users/add"))
        .form(&[("username", "sneaky"), ("password", "pw")])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert!(location(&response).starts_with("/dashboard?error="));

    let response = staff
        .post(format!("{base_url}/api/v1/users"))
        .json(&json!({"username": "sneaky", "password": "pw"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "forbidden");

    let admin = browser();
    login(&admin, &base_url, "admin", "admin123").await;

    let response = admin
        .post(format!("{base_url}/users/add"))
        .form(&[("username", "clerk"), ("full_name", "Desk Clerk"), ("password", "clerk-pass"), ("role", "staff")])
        .send()
        .await
        .unwrap();
    assert!(location(&response).starts_with("/users?message="));

    let users: Value = admin
        .get(format!("{base_url}/api/v1/users"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let names: Vec<_> = users
        .as_array()
        .unwrap()
        .iter()
        .map(|u| u["username"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, vec!["admin", "clerk", "user01"]);
    assert!(!names.contains(&"sneaky".to_string()));
}

#[tokio::test]
async fn test_e2e_json_api_jobs() {
    let (pool, _) = seeded_pool(1).await;
    let base_url = spawn_app(pool).await;
    let client = browser();
    login(&client, &base_url, "user01", "Pass01!").await;

    let response = client
        .post(format!("{base_url}/api/v1/jobs"))
        .json(&json!({
            "reference": "SHP-1",
            "importer_name": "Acme",
            "received_time": "2024-01-02T03:04:05Z",
            "assigned_username": "user01"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let job: Value = response.json().await.unwrap();
    assert_eq!(job["assignee_username"], "user01");
    assert_eq!(job["status"], "Pending");
    let job_id = job["id"].as_i64().unwrap();

    let duplicate = client
        .post(format!("{base_url}/api/v1/jobs"))
        .json(&json!({"reference": "SHP-1", "importer_name": "Other"}))
        .send()
        .await
        .unwrap();
    assert_eq!(duplicate.status(), StatusCode::CONFLICT);

    let invalid = client
        .post(format!("{base_url}/api/v1/jobs"))
        .json(&json!({"reference": "", "importer_name": "Acme"}))
        .send()
        .await
        .unwrap();
    assert_eq!(invalid.status(), StatusCode::BAD_REQUEST);

    let patched: Value = client
        .patch(format!("{base_url}/api/v1/jobs/{job_id}"))
        .json(&json!({"status": "On Hold", "assigned_username": ""}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(patched["status"], "On Hold");
    assert!(patched["assignee_username"].is_null());

    let missing = client
        .patch(format!("{base_url}/api/v1/jobs/999"))
        .json(&json!({"status": "Cleared"}))
        .send()
        .await
        .unwrap();
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);

    let listed: Value = client
        .get(format!("{base_url}/api/v1/jobs?status=On%20Hold"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(listed.as_array().unwrap().len(), 1);

    let health = client.get(format!("{base_url}/health")).send().await.unwrap();
    assert_eq!(health.status(), StatusCode::OK);
    let health: Value = health.json().await.unwrap();
    assert_eq!(health["jobs"], 1);
}
