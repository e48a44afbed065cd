use lambda_http::{http::StatusCode, tracing, Error, IntoResponse, Request};
use shared::core::{RedirectRecord, RedirectStore, ResponseEnvelope, ShortenUrlRequest};
use shared::error::HandlerError;
use shared::utils::json_response;
use shared::validation::validate_url;

pub(crate) struct HandlerDeps<S: RedirectStore> {
    pub store: S,
    pub short_domain: String,
}

pub(crate) async fn function_handler<S: RedirectStore>(
    deps: &HandlerDeps<S>,
    event: Request,
) -> Result<impl IntoResponse, Error> {
    tracing::debug!(
        "Received body: {}",
        String::from_utf8_lossy(event.body().as_ref())
    );

    match store_redirect(deps, event.body().as_ref()).await {
        Ok(slug) => {
            let envelope = ResponseEnvelope::with_slug("OK", &slug, &deps.short_domain);
            tracing::debug!("Responding 200 with url {:?}", envelope.url);
            json_response(&StatusCode::OK, &envelope)
        }
        Err(e) => {
            let status = e.status_code();
            match &e {
                HandlerError::StorageWrite { .. }
                | HandlerError::Http { .. }
                | HandlerError::Unexpected { .. } => {
                    tracing::error!("Failed to store redirect: {:?}", e)
                }
                _ => tracing::debug!("Rejected request: {}", e),
            }
            json_response(&status, &ResponseEnvelope::error(e.message()))
        }
    }
}

async fn store_redirect<S: RedirectStore>(
    deps: &HandlerDeps<S>,
    body: &[u8],
) -> Result<String, HandlerError> {
    let request = ShortenUrlRequest::from_body(body)?;
    tracing::debug!("Shortening {:?}", request);

    let long_url = validate_url(&request.long_url)?;
    let slug = request.slug()?.to_string();
    deps.store
        .put_redirect(RedirectRecord::new(slug.clone(), long_url))
        .await?;

    Ok(slug)
}

#[cfg(test)]
mod tests {
    use super::{function_handler, HandlerDeps};
    use lambda_http::http::Request;
    use lambda_http::{Body, IntoResponse};
    use mockall::predicate;
    use serde_json::{json, Value};
    use shared::core::{MockRedirectStore, RedirectRecord};
    use shared::error::HandlerError;

    const SHORT_DOMAIN: &str = "https://sho.rt";

    fn deps(store: MockRedirectStore) -> HandlerDeps<MockRedirectStore> {
        HandlerDeps {
            store,
            short_domain: SHORT_DOMAIN.to_string(),
        }
    }

    fn json_request(body: Value) -> Request<Body> {
        Request::builder()
            .header("Content-Type", "application/json")
            .body(body.to_string().into())
            .unwrap()
    }

    fn untouched_store() -> MockRedirectStore {
        let mut store = MockRedirectStore::new();
        store.expect_put_redirect().times(0);
        store
    }

    async fn call(deps: &HandlerDeps<MockRedirectStore>, request: Request<Body>) -> (u16, Value) {
        let response = function_handler(deps, request)
            .await
            .unwrap()
            .into_response()
            .await;
        assert_eq!(response.headers()["Access-Control-Allow-Origin"], "*");
        let body: Value = serde_json::from_slice(response.body()).unwrap();
        (response.status().as_u16(), body)
    }

    #[tokio::test]
    async fn when_valid_link_is_passed_should_store_and_return_short_url() {
        let mut store = MockRedirectStore::new();
        store
            .expect_put_redirect()
            .with(predicate::eq(RedirectRecord {
                slug: "abc123".to_string(),
                long_url: "https://example.com/page".to_string(),
            }))
            .times(1)
            .returning(|_| Ok(()));
        let deps = deps(store);

        let (status, body) = call(
            &deps,
            json_request(json!({"url": "https://example.com/page", "slug": "abc123"})),
        )
        .await;

        assert_eq!(status, 200);
        assert_eq!(
            body,
            json!({
                "message": "OK",
                "slug": "abc123",
                "url": "https://sho.rt/abc123"
            })
        );
    }

    #[tokio::test]
    async fn when_body_is_not_json_should_return_400() {
        let deps = deps(untouched_store());
        let request = Request::builder()
            .body(Body::Text("{\"url\": ".to_string()))
            .unwrap();

        let (status, body) = call(&deps, request).await;

        assert_eq!(status, 400);
        assert_eq!(
            body,
            json!({"message": "Event doesn't contain a parsable JSON body"})
        );
    }

    #[tokio::test]
    async fn when_body_is_empty_should_return_400() {
        let deps = deps(untouched_store());
        let request = Request::builder().body(Body::Empty).unwrap();

        let (status, body) = call(&deps, request).await;

        assert_eq!(status, 400);
        assert_eq!(body["message"], "Event doesn't contain a parsable JSON body");
    }

    #[tokio::test]
    async fn when_url_or_slug_missing_should_return_400() {
        let deps = deps(untouched_store());

        for payload in [
            json!({"slug": "abc123"}),
            json!({"url": "https://example.com/page"}),
            json!({}),
            json!({"url": "", "slug": "abc123"}),
            json!({"url": "https://example.com/page", "slug": null}),
        ] {
            let (status, body) = call(&deps, json_request(payload.clone())).await;

            assert_eq!(status, 400, "{}", payload);
            assert_eq!(
                body,
                json!({"message": "Event body must contain a `url` and `slug`"}),
                "{}",
                payload
            );
        }
    }

    #[tokio::test]
    async fn when_url_has_no_rooted_path_should_return_400() {
        let deps = deps(untouched_store());

        for url in ["mailto:test@example.com", "example.com/page"] {
            let (status, body) =
                call(&deps, json_request(json!({"url": url, "slug": "abc123"}))).await;

            assert_eq!(status, 400, "{}", url);
            assert_eq!(body, json!({"message": "Not a valid URL for shortening"}));
        }
    }

    #[tokio::test]
    async fn when_url_cannot_be_parsed_should_return_400() {
        let deps = deps(untouched_store());

        let (status, body) = call(
            &deps,
            json_request(json!({"url": "http://[::1/", "slug": "abc123"})),
        )
        .await;

        assert_eq!(status, 400);
        assert_eq!(body, json!({"message": "Not a valid URL"}));
    }

    #[tokio::test]
    async fn when_url_is_not_a_string_should_return_400_invalid_url() {
        let deps = deps(untouched_store());

        for url in [json!(123), json!({"a": 1})] {
            let (status, body) =
                call(&deps, json_request(json!({"url": url, "slug": "abc123"}))).await;

            assert_eq!(status, 400, "{}", url);
            assert_eq!(body, json!({"message": "Not a valid URL"}));
        }
    }

    #[tokio::test]
    async fn when_url_is_falsy_but_not_a_string_should_return_missing_fields() {
        let deps = deps(untouched_store());

        for url in [json!(0), json!(false)] {
            let (status, body) =
                call(&deps, json_request(json!({"url": url, "slug": "abc123"}))).await;

            assert_eq!(status, 400, "{}", url);
            assert_eq!(
                body,
                json!({"message": "Event body must contain a `url` and `slug`"})
            );
        }
    }

    #[tokio::test]
    async fn when_special_scheme_lacks_slashes_should_return_400() {
        let deps = deps(untouched_store());

        for url in ["http:example.com/page", "https://"] {
            let (status, body) =
                call(&deps, json_request(json!({"url": url, "slug": "abc123"}))).await;

            assert_eq!(status, 400, "{}", url);
            assert_eq!(body, json!({"message": "Not a valid URL for shortening"}));
        }
    }

    #[tokio::test]
    async fn when_url_has_surrounding_whitespace_should_store_it_untouched() {
        let mut store = MockRedirectStore::new();
        store
            .expect_put_redirect()
            .with(predicate::eq(RedirectRecord {
                slug: "abc123".to_string(),
                long_url: " /page".to_string(),
            }))
            .times(1)
            .returning(|_| Ok(()));
        let deps = deps(store);

        let (status, body) =
            call(&deps, json_request(json!({"url": " /page", "slug": "abc123"}))).await;

        assert_eq!(status, 200);
        assert_eq!(body["url"], "https://sho.rt/abc123");
    }

    #[tokio::test]
    async fn when_lenient_parse_accepts_port_and_opaque_host_should_store() {
        let mut store = MockRedirectStore::new();
        store.expect_put_redirect().times(2).returning(|_| Ok(()));
        let deps = deps(store);

        for url in ["http://example.com:99999/", "data:text/plain,hello"] {
            let (status, _) =
                call(&deps, json_request(json!({"url": url, "slug": "abc123"}))).await;

            assert_eq!(status, 200, "{}", url);
        }
    }

    #[tokio::test]
    async fn when_slug_is_not_a_string_should_return_500_without_storing() {
        let deps = deps(untouched_store());

        let (status, body) = call(
            &deps,
            json_request(json!({"url": "https://example.com/page", "slug": 42})),
        )
        .await;

        assert_eq!(status, 500);
        assert_eq!(
            body,
            json!({"message": "Expected slug to be a string, got 42"})
        );
    }

    #[tokio::test]
    async fn when_slug_is_not_a_string_and_url_is_bad_should_report_url_first() {
        let deps = deps(untouched_store());

        let (status, body) = call(
            &deps,
            json_request(json!({"url": "mailto:test@example.com", "slug": 42})),
        )
        .await;

        assert_eq!(status, 400);
        assert_eq!(body, json!({"message": "Not a valid URL for shortening"}));
    }

    #[tokio::test]
    async fn when_storage_fails_should_return_500_with_message() {
        let mut store = MockRedirectStore::new();
        store.expect_put_redirect().times(1).returning(|_| {
            Err(HandlerError::StorageWrite {
                message: "dispatch failure".to_string(),
            })
        });
        let deps = deps(store);

        let (status, body) = call(
            &deps,
            json_request(json!({"url": "https://example.com/page", "slug": "abc123"})),
        )
        .await;

        assert_eq!(status, 500);
        assert_eq!(body, json!({"message": "dispatch failure"}));
    }

    #[tokio::test]
    async fn when_storage_fails_with_status_should_return_that_status() {
        let mut store = MockRedirectStore::new();
        store
            .expect_put_redirect()
            .times(1)
            .returning(|_| Err(HandlerError::http(403, "Access Denied")));
        let deps = deps(store);

        let (status, body) = call(
            &deps,
            json_request(json!({"url": "https://example.com/page", "slug": "abc123"})),
        )
        .await;

        assert_eq!(status, 403);
        assert_eq!(body, json!({"message": "Access Denied"}));
        assert!(body.get("url").is_none());
    }

    #[tokio::test]
    async fn when_same_link_stored_twice_should_respond_identically() {
        let mut store = MockRedirectStore::new();
        store
            .expect_put_redirect()
            .with(predicate::eq(RedirectRecord {
                slug: "abc123".to_string(),
                long_url: "https://example.com/page".to_string(),
            }))
            .times(2)
            .returning(|_| Ok(()));
        let deps = deps(store);
        let payload = json!({"url": "https://example.com/page", "slug": "abc123"});

        let first = call(&deps, json_request(payload.clone())).await;
        let second = call(&deps, json_request(payload)).await;

        assert_eq!(first.0, 200);
        assert_eq!(first, second);
    }
}
