use anyhow::Result;
use axum::http::StatusCode;
use axum_test::multipart::{MultipartForm, Part};
use serde_json::{Value, json};
use vidshelf_model::api_routes::{self, utils as route_utils};

mod support;

use support::{BASE_URL, bearer, build_test_app, build_test_app_with_limit, signup};

fn item(template: &str, id: impl ToString) -> String {
    route_utils::replace_param(template, "{id}", id)
}

fn engagement(id: impl ToString, action: &str) -> String {
    route_utils::replace_param(&item(api_routes::v1::videos::ENGAGEMENT, id), "{action}", action)
}

#[tokio::test]
async fn listing_catalogues_new_files_once() -> Result<()> {
    let app = build_test_app()?;
    let (_, token) = signup(&app.server, "ana").await;

    app.drop_file("a.mp4", b"aaaa");
    app.drop_file("b.MKV", b"bbbb");
    app.drop_file("notes.txt", b"not a video");
    app.drop_file(".hidden.mp4", b"hidden");
    app.drop_file("c.mp4.part", b"half written");

    let first: Value = app
        .server
        .get(api_routes::v1::videos::COLLECTION)
        .add_header("Authorization", bearer(&token))
        .await
        .json();
    let videos = first["data"].as_array().unwrap();
    assert_eq!(videos.len(), 2);
    assert_eq!(videos[0]["title"], "a");
    assert_eq!(videos[0]["video_url"], format!("{BASE_URL}/uploads/a.mp4"));
    assert_eq!(videos[0]["views"], 0);
    assert_eq!(videos[1]["title"], "b");

    let second: Value = app
        .server
        .get(api_routes::v1::videos::COLLECTION)
        .add_header("Authorization", bearer(&token))
        .await
        .json();
    assert_eq!(first["data"], second["data"]);
    Ok(())
}

#[tokio::test]
async fn removed_files_keep_their_entries() -> Result<()> {
    let app = build_test_app()?;
    let (_, token) = signup(&app.server, "ana").await;
    app.drop_file("gone.mp4", b"x");

    let list = |token: String| {
        app.server
            .get(api_routes::v1::videos::COLLECTION)
            .add_header("Authorization", bearer(&token))
    };

    let before: Value = list(token.clone()).await.json();
    std::fs::remove_file(app.upload_path("gone.mp4"))?;
    let after: Value = list(token).await.json();

    assert_eq!(before["data"], after["data"]);
    assert_eq!(after["data"].as_array().unwrap().len(), 1);
    Ok(())
}

#[tokio::test]
async fn video_detail_and_lookup_errors() -> Result<()> {
    let app = build_test_app()?;
    let (_, token) = signup(&app.server, "ana").await;
    app.drop_file("My Trip.mp4", b"x");
    app.server
        .get(api_routes::v1::videos::COLLECTION)
        .add_header("Authorization", bearer(&token))
        .await
        .assert_status_ok();

    let response = app
        .server
        .get(&item(api_routes::v1::videos::ITEM, 1))
        .add_header("Authorization", bearer(&token))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["data"]["title"], "My Trip");
    assert_eq!(body["data"]["video_url"], format!("{BASE_URL}/uploads/My%20Trip.mp4"));

    let missing = app
        .server
        .get(&item(api_routes::v1::videos::ITEM, 9999))
        .add_header("Authorization", bearer(&token))
        .await;
    missing.assert_status(StatusCode::NOT_FOUND);
    let body: Value = missing.json();
    assert_eq!(body["status"], "error");
    assert_eq!(body["error"], "catalog entry 9999 not found");

    app.server
        .get(&item(api_routes::v1::videos::ITEM, "abc"))
        .add_header("Authorization", bearer(&token))
        .await
        .assert_status(StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn engagement_counters_accumulate() -> Result<()> {
    let app = build_test_app()?;
    let (_, token) = signup(&app.server, "ana").await;
    app.drop_file("a.mp4", b"x");
    app.server
        .get(api_routes::v1::videos::COLLECTION)
        .add_header("Authorization", bearer(&token))
        .await
        .assert_status_ok();

    for expected in 1..=2 {
        let body: Value = app
            .server
            .post(&engagement(1, "like"))
            .add_header("Authorization", bearer(&token))
            .await
            .json();
        assert_eq!(body["data"]["count"], expected);
        assert_eq!(body["data"]["counter"], "likes");
    }

    let body: Value = app
        .server
        .post(&engagement(1, "view"))
        .add_header("Authorization", bearer(&token))
        .await
        .json();
    assert_eq!(body["data"]["count"], 1);

    let detail: Value = app
        .server
        .get(&item(api_routes::v1::videos::ITEM, 1))
        .add_header("Authorization", bearer(&token))
        .await
        .json();
    assert_eq!(detail["data"]["likes"], 2);
    assert_eq!(detail["data"]["views"], 1);
    assert_eq!(detail["data"]["dislikes"], 0);

    app.server
        .post(&engagement(1, "share"))
        .add_header("Authorization", bearer(&token))
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    app.server
        .post(&engagement(9999, "view"))
        .add_header("Authorization", bearer(&token))
        .await
        .assert_status(StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn comments_are_posted_as_the_caller() -> Result<()> {
    let app = build_test_app()?;
    let (_, _) = signup(&app.server, "ana").await;
    let (bob_id, bob) = signup(&app.server, "bob").await;
    app.drop_file("a.mp4", b"x");
    app.server
        .get(api_routes::v1::videos::COLLECTION)
        .add_header("Authorization", bearer(&bob))
        .await
        .assert_status_ok();

    let comments = item(api_routes::v1::videos::COMMENTS, 1);
    let empty: Value = app
        .server
        .get(&comments)
        .add_header("Authorization", bearer(&bob))
        .await
        .json();
    assert_eq!(empty["data"], json!([]));

    let posted = app
        .server
        .post(&comments)
        .add_header("Authorization", bearer(&bob))
        .json(&json!({ "text": "  nice video  " }))
        .await;
    posted.assert_status(StatusCode::CREATED);
    let body: Value = posted.json();
    assert_eq!(body["data"]["text"], "nice video");
    assert_eq!(body["data"]["author_id"], bob_id);
    assert_eq!(body["data"]["entry_id"], 1);

    let listed: Value = app
        .server
        .get(&comments)
        .add_header("Authorization", bearer(&bob))
        .await
        .json();
    assert_eq!(listed["data"].as_array().unwrap().len(), 1);
    assert_eq!(listed["data"][0]["text"], "nice video");

    app.server
        .post(&comments)
        .add_header("Authorization", bearer(&bob))
        .json(&json!({ "text": "   " }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    app.server
        .post(&item(api_routes::v1::videos::COMMENTS, 42))
        .add_header("Authorization", bearer(&bob))
        .json(&json!({ "text": "hello?" }))
        .await
        .assert_status(StatusCode::NOT_FOUND);

    let unknown: Value = app
        .server
        .get(&item(api_routes::v1::videos::COMMENTS, 42))
        .add_header("Authorization", bearer(&bob))
        .await
        .json();
    assert_eq!(unknown["data"], json!([]));
    Ok(())
}

#[tokio::test]
async fn upload_stores_the_file_and_catalogues_it_once() -> Result<()> {
    let app = build_test_app()?;
    let (_, token) = signup(&app.server, "ana").await;

    let form = MultipartForm::new().add_text("title", "Holiday").add_part(
        "video",
        Part::bytes(b"fake mp4 bytes".to_vec())
            .file_name("clip.MP4")
            .mime_type("video/mp4"),
    );
    let response = app
        .server
        .post(api_routes::v1::videos::UPLOAD)
        .add_header("Authorization", bearer(&token))
        .multipart(form)
        .await;
    response.assert_status(StatusCode::CREATED);

    let body: Value = response.json();
    assert_eq!(body["data"]["title"], "Holiday");
    let video_url = body["data"]["video_url"].as_str().unwrap().to_string();
    assert!(video_url.starts_with(&format!("{BASE_URL}/uploads/")));
    assert!(video_url.ends_with(".mp4"));

    let files = app.upload_dir_listing();
    assert_eq!(files.len(), 1);
    assert!(!files[0].ends_with(".part"));

    let listed: Value = app
        .server
        .get(api_routes::v1::videos::COLLECTION)
        .add_header("Authorization", bearer(&token))
        .await
        .json();
    assert_eq!(listed["data"].as_array().unwrap().len(), 1);
    assert_eq!(listed["data"][0]["video_url"], video_url.as_str());

    let served = app.server.get(video_url.trim_start_matches(BASE_URL)).await;
    served.assert_status_ok();
    assert_eq!(served.as_bytes().as_ref(), b"fake mp4 bytes");
    Ok(())
}

#[tokio::test]
async fn staging_files_and_dotfiles_are_not_served() -> Result<()> {
    let app = build_test_app()?;
    app.drop_file("a.mp4", b"published");
    app.drop_file("b.mp4.part", b"half written");
    app.drop_file(".hidden.mp4", b"hidden");

    app.server.get("/uploads/a.mp4").await.assert_status_ok();
    for path in [
        "/uploads/b.mp4.part",
        "/uploads/b.mp4%2Epart",
        "/uploads/.hidden.mp4",
        "/uploads/%2Ehidden.mp4",
    ] {
        app.server.get(path).await.assert_status(StatusCode::NOT_FOUND);
    }
    Ok(())
}

#[tokio::test]
async fn upload_without_title_uses_the_file_name() -> Result<()> {
    let app = build_test_app()?;
    let (_, token) = signup(&app.server, "ana").await;

    let form = MultipartForm::new().add_part(
        "video",
        Part::bytes(b"webm".to_vec()).file_name("talk.webm"),
    );
    let response = app
        .server
        .post(api_routes::v1::videos::UPLOAD)
        .add_header("Authorization", bearer(&token))
        .multipart(form)
        .await;
    response.assert_status(StatusCode::CREATED);

    let body: Value = response.json();
    let video_url = body["data"]["video_url"].as_str().unwrap();
    let locator = video_url.rsplit('/').next().unwrap();
    assert_eq!(body["data"]["title"], locator.trim_end_matches(".webm"));
    Ok(())
}

#[tokio::test]
async fn rejected_uploads_leave_nothing_behind() -> Result<()> {
    let app = build_test_app()?;
    let (_, token) = signup(&app.server, "ana").await;

    let wrong_type = MultipartForm::new().add_part(
        "video",
        Part::bytes(b"text".to_vec()).file_name("notes.txt"),
    );
    app.server
        .post(api_routes::v1::videos::UPLOAD)
        .add_header("Authorization", bearer(&token))
        .multipart(wrong_type)
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    let missing_file = MultipartForm::new().add_text("title", "Nothing");
    app.server
        .post(api_routes::v1::videos::UPLOAD)
        .add_header("Authorization", bearer(&token))
        .multipart(missing_file)
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    let empty_file = MultipartForm::new().add_part(
        "video",
        Part::bytes(Vec::new()).file_name("empty.mp4"),
    );
    app.server
        .post(api_routes::v1::videos::UPLOAD)
        .add_header("Authorization", bearer(&token))
        .multipart(empty_file)
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    assert!(app.upload_dir_listing().is_empty());
    Ok(())
}

#[tokio::test]
async fn oversized_uploads_are_refused() -> Result<()> {
    let app = build_test_app_with_limit(256)?;
    let (_, token) = signup(&app.server, "ana").await;

    let too_large = MultipartForm::new().add_part(
        "video",
        Part::bytes(vec![0u8; 4096]).file_name("big.mp4"),
    );
    let response = app
        .server
        .post(api_routes::v1::videos::UPLOAD)
        .add_header("Authorization", bearer(&token))
        .multipart(too_large)
        .await;
    assert!(response.status_code().is_client_error());

    assert!(app.upload_dir_listing().is_empty());
    Ok(())
}
