use std::io::{Cursor, Read};

use serde_json::json;
use zip::ZipArchive;

use crate::common::{routes, TestApp, SHARE_BASE_URL};

const JPEG_BYTES: &[u8] = b"\xff\xd8\xff\xe0fake-jpeg-payload";
const PNG_BYTES: &[u8] = b"\x89PNG\r\nfake-png-payload";

fn read_zip(bytes: &[u8]) -> Vec<(String, Vec<u8>)> {
    let mut archive = ZipArchive::new(Cursor::new(bytes.to_vec())).expect("invalid zip archive");
    let mut entries = Vec::new();
    for i in 0..archive.len() {
        let mut file = archive.by_index(i).expect("failed to read zip entry");
        let mut contents = Vec::new();
        file.read_to_end(&mut contents).expect("failed to read zip entry body");
        entries.push((file.name().to_string(), contents));
    }
    entries.sort();
    entries
}

mod creation {
    use super::*;

    #[tokio::test]
    async fn returns_token_and_share_url() {
        let app = TestApp::spawn().await;
        let id = app.upload_photo("alien.jpg", JPEG_BYTES).await;

        let res = app
            .post_json_admin(routes::SHARES, &json!({ "photo_ids": [id] }))
            .await;

        assert_eq!(res.status, 201);
        let token = res.body["token"].as_str().unwrap();
        assert_eq!(token.len(), 32);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));

        let share_url = format!("{SHARE_BASE_URL}/share/{token}");
        assert_eq!(res.body["share_url"], share_url.as_str());
        assert_eq!(res.body["qr_payload"], share_url.as_str());
        assert_eq!(res.body["photos"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn requires_admin_password() {
        let app = TestApp::spawn().await;
        let id = app.upload_photo("alien.jpg", JPEG_BYTES).await;

        let res = app
            .post_json(routes::SHARES, &json!({ "photo_ids": [id] }))
            .await;

        assert_eq!(res.status, 403);
        assert_eq!(res.error_code(), "FORBIDDEN");
    }

    #[tokio::test]
    async fn rejects_empty_selection() {
        let app = TestApp::spawn().await;

        let res = app
            .post_json_admin(routes::SHARES, &json!({ "photo_ids": [] }))
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.error_code(), "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn rejects_selection_with_no_known_photo() {
        let app = TestApp::spawn().await;

        let res = app
            .post_json_admin(routes::SHARES, &json!({ "photo_ids": [7, 8, 9] }))
            .await;

        assert_eq!(res.status, 404);
        assert_eq!(res.error_code(), "NOT_FOUND");
    }

    #[tokio::test]
    async fn duplicate_ids_collapse_to_one_member() {
        let app = TestApp::spawn().await;
        let id = app.upload_photo("alien.jpg", JPEG_BYTES).await;

        let res = app
            .post_json_admin(routes::SHARES, &json!({ "photo_ids": [id, id, id] }))
            .await;

        assert_eq!(res.status, 201);
        assert_eq!(res.body["photos"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn tokens_are_unique_per_share() {
        let app = TestApp::spawn().await;
        let id = app.upload_photo("alien.jpg", JPEG_BYTES).await;

        let first = app.create_share(&[id]).await;
        let second = app.create_share(&[id]).await;

        assert_ne!(first, second);
    }
}

mod viewing {
    use super::*;

    #[tokio::test]
    async fn lists_member_photos_without_auth() {
        let app = TestApp::spawn().await;
        let older = app.upload_photo("older.jpg", JPEG_BYTES).await;
        let newer = app.upload_photo("newer.png", PNG_BYTES).await;
        let token = app.create_share(&[older, newer]).await;

        let res = app.get(&routes::share(&token)).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["token"], token.as_str());
        let ids: Vec<i64> = res.body["photos"]
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["id"].as_i64().unwrap())
            .collect();
        assert_eq!(ids, vec![newer, older]);
    }

    #[tokio::test]
    async fn unknown_token_returns_404() {
        let app = TestApp::spawn().await;

        let res = app.get(&routes::share(&"0".repeat(32))).await;

        assert_eq!(res.status, 404);
        assert_eq!(res.error_code(), "NOT_FOUND");
    }

    #[tokio::test]
    async fn deleted_photos_disappear_from_shares() {
        let app = TestApp::spawn().await;
        let kept = app.upload_photo("kept.jpg", JPEG_BYTES).await;
        let removed = app.upload_photo("removed.png", PNG_BYTES).await;
        let token = app.create_share(&[kept, removed]).await;

        let res = app
            .delete_json_admin(routes::PHOTOS, &json!({ "photo_ids": [removed] }))
            .await;
        assert_eq!(res.status, 200);

        let share = app.get(&routes::share(&token)).await;
        assert_eq!(share.status, 200);
        let ids: Vec<i64> = share.body["photos"]
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["id"].as_i64().unwrap())
            .collect();
        assert_eq!(ids, vec![kept]);
    }
}

mod single_download {
    use super::*;

    #[tokio::test]
    async fn serves_member_photo_without_auth() {
        let app = TestApp::spawn().await;
        let id = app.upload_photo("alien.jpg", JPEG_BYTES).await;
        let token = app.create_share(&[id]).await;

        let res = app.get(&routes::share_file(&token, id)).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.bytes, JPEG_BYTES);
    }

    #[tokio::test]
    async fn non_member_photo_returns_404() {
        let app = TestApp::spawn().await;
        let shared = app.upload_photo("shared.jpg", JPEG_BYTES).await;
        let private = app.upload_photo("private.png", PNG_BYTES).await;
        let token = app.create_share(&[shared]).await;

        let res = app.get(&routes::share_file(&token, private)).await;

        assert_eq!(res.status, 404);
        assert_eq!(res.error_code(), "NOT_FOUND");
    }

    #[tokio::test]
    async fn missing_blob_returns_410() {
        let app = TestApp::spawn().await;
        let id = app.upload_photo("gone.jpg", JPEG_BYTES).await;
        let token = app.create_share(&[id]).await;
        app.wipe_blob_files();

        let res = app.get(&routes::share_file(&token, id)).await;

        assert_eq!(res.status, 410);
        assert_eq!(res.error_code(), "GONE");
    }
}

mod zip_download {
    use super::*;

    #[tokio::test]
    async fn bundles_every_member_by_default() {
        let app = TestApp::spawn().await;
        let a = app.upload_photo("a.jpg", JPEG_BYTES).await;
        let b = app.upload_photo("b.png", PNG_BYTES).await;
        let token = app.create_share(&[a, b]).await;

        let res = app.post_without_body(&routes::share_download(&token)).await;

        assert_eq!(res.status, 200);
        assert_eq!(
            res.headers
                .get("content-type")
                .and_then(|v| v.to_str().ok()),
            Some("application/zip")
        );
        let disposition = res
            .headers
            .get("content-disposition")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();
        assert_eq!(
            disposition,
            format!("attachment; filename=\"alienshot_{token}.zip\"")
        );

        let entries = read_zip(&res.bytes);
        assert_eq!(
            entries,
            vec![
                ("a.jpg".to_string(), JPEG_BYTES.to_vec()),
                ("b.png".to_string(), PNG_BYTES.to_vec()),
            ]
        );
    }

    #[tokio::test]
    async fn subset_selection_limits_entries() {
        let app = TestApp::spawn().await;
        let a = app.upload_photo("a.jpg", JPEG_BYTES).await;
        let b = app.upload_photo("b.png", PNG_BYTES).await;
        let token = app.create_share(&[a, b]).await;

        let res = app
            .post_json(&routes::share_download(&token), &json!({ "photo_ids": [b] }))
            .await;

        assert_eq!(res.status, 200);
        let entries = read_zip(&res.bytes);
        assert_eq!(entries, vec![("b.png".to_string(), PNG_BYTES.to_vec())]);
    }

    #[tokio::test]
    async fn empty_selection_means_all_members() {
        let app = TestApp::spawn().await;
        let a = app.upload_photo("a.jpg", JPEG_BYTES).await;
        let token = app.create_share(&[a]).await;

        let res = app
            .post_json(&routes::share_download(&token), &json!({ "photo_ids": [] }))
            .await;

        assert_eq!(res.status, 200);
        assert_eq!(read_zip(&res.bytes).len(), 1);
    }

    #[tokio::test]
    async fn selecting_non_member_returns_404() {
        let app = TestApp::spawn().await;
        let shared = app.upload_photo("shared.jpg", JPEG_BYTES).await;
        let private = app.upload_photo("private.png", PNG_BYTES).await;
        let token = app.create_share(&[shared]).await;

        let res = app
            .post_json(
                &routes::share_download(&token),
                &json!({ "photo_ids": [private] }),
            )
            .await;

        assert_eq!(res.status, 404);
    }

    #[tokio::test]
    async fn missing_blobs_are_skipped() {
        let app = TestApp::spawn().await;
        let a = app.upload_photo("a.jpg", JPEG_BYTES).await;
        let before: std::collections::HashSet<_> = app.blob_files().into_iter().collect();
        let b = app.upload_photo("b.png", PNG_BYTES).await;
        let token = app.create_share(&[a, b]).await;

        // Remove only the blob backing the second upload.
        for path in app.blob_files() {
            if !before.contains(&path) {
                std::fs::remove_file(path).expect("Failed to remove blob file");
            }
        }

        let res = app.post_without_body(&routes::share_download(&token)).await;

        assert_eq!(res.status, 200);
        let entries = read_zip(&res.bytes);
        assert_eq!(entries, vec![("a.jpg".to_string(), JPEG_BYTES.to_vec())]);
    }

    #[tokio::test]
    async fn share_emptied_by_deletion_returns_404() {
        let app = TestApp::spawn().await;
        let id = app.upload_photo("only.jpg", JPEG_BYTES).await;
        let token = app.create_share(&[id]).await;

        let res = app
            .delete_json_admin(routes::PHOTOS, &json!({ "photo_ids": [id] }))
            .await;
        assert_eq!(res.status, 200);

        let res = app.post_without_body(&routes::share_download(&token)).await;
        assert_eq!(res.status, 404);
    }
}

mod end_to_end {
    use super::*;

    #[tokio::test]
    async fn upload_share_fetch_and_download() {
        let app = TestApp::spawn().await;

        let id = app.upload_photo("alien.jpg", JPEG_BYTES).await;

        let token = app.create_share(&[id]).await;

        let share = app.get(&routes::share(&token)).await;
        assert_eq!(share.status, 200);
        assert_eq!(share.body["photos"][0]["original_name"], "alien.jpg");

        let single = app.get(&routes::share_file(&token, id)).await;
        assert_eq!(single.status, 200);
        assert_eq!(single.bytes, JPEG_BYTES);

        let bundle = app.post_without_body(&routes::share_download(&token)).await;
        assert_eq!(bundle.status, 200);
        let entries = read_zip(&bundle.bytes);
        assert_eq!(entries, vec![("alien.jpg".to_string(), JPEG_BYTES.to_vec())]);
    }
}
