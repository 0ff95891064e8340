use actix_cors::Cors;
use actix_web::dev::Service as _;
use actix_web::http::StatusCode;
use actix_web::{web, App, HttpRequest, HttpResponse, HttpServer, Result as ActixResult};
use matchmaker_core::{suggestions_for, Error, FieldSchema, Profile};
use matchmaker_storage::StoreManager;
use serde::Serialize;
use std::sync::Arc;
use tracing::warn;

use crate::auth::AuthConfig;

/// Requests carrying this header are not counted in the hit statistics.
pub const IGNORE_HIT_HEADER: &str = "matchmaker-ignorehit";

#[derive(Serialize)]
struct HitsResponse {
    hits: u64,
}

#[derive(Serialize)]
struct CountResponse {
    count: usize,
}

#[derive(Serialize)]
struct SuggestionsResponse {
    suggestions: Vec<Profile>,
}

pub struct RestApi;

impl RestApi {
    pub async fn start(
        store: Arc<StoreManager>,
        auth: AuthConfig,
        schema: FieldSchema,
        port: u16,
    ) -> std::io::Result<()> {
        HttpServer::new(move || {
            let cors = Cors::default()
                .allow_any_origin()
                .allow_any_method()
                .allow_any_header()
                .max_age(3600);

            let hit_store = store.clone();

            App::new()
                .wrap(cors)
                .wrap_fn(move |req, srv| {
                    // count the hit unless the client asks us not to
                    let counted = !req.headers().contains_key(IGNORE_HIT_HEADER);
                    let store = hit_store.clone();
                    let fut = srv.call(req);
                    async move {
                        if counted {
                            if let Err(e) = store.increment_hits() {
                                warn!("Failed to record hit: {}", e);
                            }
                        }
                        fut.await
                    }
                })
                .app_data(web::Data::new(store.clone()))
                .app_data(web::Data::new(auth.clone()))
                .app_data(web::Data::new(schema.clone()))
                .configure(routes)
        })
        .bind(("0.0.0.0", port))?
        .run()
        .await
    }
}

/// Register the API routes. `/api/profiles/count` must come before the
/// `{id}` routes so "count" is not taken as a profile id.
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/api", web::get().to(api_root))
        .route("/api/hits", web::get().to(get_hits))
        .route("/api/profiles/count", web::get().to(profile_count))
        .route(
            "/api/profiles/{id}/suggestions",
            web::get().to(get_suggestions),
        )
        .route("/api/profiles/{id}", web::get().to(get_profile))
        .route("/api/profiles/{id}", web::put().to(create_profile))
        .route("/api/profiles/{id}", web::patch().to(patch_profile))
        .route("/api/developer/reset", web::post().to(reset_database))
        .default_service(web::route().to(not_found));
}

async fn api_root() -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Hello from server!"
    })))
}

async fn get_hits(store: web::Data<Arc<StoreManager>>) -> ActixResult<HttpResponse> {
    match store.hits() {
        Ok(hits) => Ok(HttpResponse::Ok().json(HitsResponse { hits })),
        Err(e) => Ok(error_status(&e)),
    }
}

async fn profile_count(store: web::Data<Arc<StoreManager>>) -> ActixResult<HttpResponse> {
    match store.profile_count() {
        Ok(count) => Ok(HttpResponse::Ok().json(CountResponse { count })),
        Err(e) => Ok(error_status(&e)),
    }
}

async fn get_profile(
    store: web::Data<Arc<StoreManager>>,
    auth: web::Data<AuthConfig>,
    path: web::Path<String>,
    req: HttpRequest,
) -> ActixResult<HttpResponse> {
    if !auth.authenticate(&req) {
        return Ok(unauthorized());
    }
    let id = path.into_inner();

    match store.get_profile(&id) {
        Ok(Some(profile)) => Ok(HttpResponse::Ok().json(profile)),
        Ok(None) => Ok(error_response(StatusCode::NOT_FOUND, "Profile not found")),
        Err(e) => Ok(error_status(&e)),
    }
}

async fn create_profile(
    store: web::Data<Arc<StoreManager>>,
    auth: web::Data<AuthConfig>,
    schema: web::Data<FieldSchema>,
    path: web::Path<String>,
    req: HttpRequest,
    body: web::Json<serde_json::Value>,
) -> ActixResult<HttpResponse> {
    if !auth.authenticate(&req) {
        return Ok(unauthorized());
    }
    let id = path.into_inner();

    let profile = match Profile::from_value(&body) {
        Ok(profile) => profile,
        Err(e) => return Ok(bad_request(&e)),
    };
    if let Err(e) = schema.validate_create(&profile) {
        return Ok(bad_request(&e));
    }

    match store.create_profile(&id, &profile) {
        Ok(()) => Ok(HttpResponse::Ok().json(serde_json::json!({
            "message": "Profile created",
            "profile": profile,
        }))),
        Err(e) => Ok(error_status(&e)),
    }
}

async fn patch_profile(
    store: web::Data<Arc<StoreManager>>,
    auth: web::Data<AuthConfig>,
    schema: web::Data<FieldSchema>,
    path: web::Path<String>,
    req: HttpRequest,
    body: web::Json<serde_json::Value>,
) -> ActixResult<HttpResponse> {
    if !auth.authenticate(&req) {
        return Ok(unauthorized());
    }
    let id = path.into_inner();

    let patch = match Profile::from_value(&body) {
        Ok(patch) => patch,
        Err(e) => return Ok(bad_request(&e)),
    };
    // validate the whole patch up front; nothing is applied on failure
    if let Err(e) = schema.validate_patch(&patch) {
        return Ok(bad_request(&e));
    }

    match store.patch_profile(&id, &patch) {
        Ok(_) => Ok(HttpResponse::Ok().json(serde_json::json!({
            "message": "Profile updated"
        }))),
        Err(e) => Ok(error_status(&e)),
    }
}

async fn get_suggestions(
    store: web::Data<Arc<StoreManager>>,
    auth: web::Data<AuthConfig>,
    path: web::Path<String>,
    req: HttpRequest,
) -> ActixResult<HttpResponse> {
    if !auth.authenticate(&req) {
        return Ok(unauthorized());
    }
    let id = path.into_inner();

    let profiles = match store.profiles() {
        Ok(profiles) => profiles,
        Err(e) => return Ok(error_status(&e)),
    };
    if !profiles.contains_key(&id) {
        return Ok(error_response(StatusCode::NOT_FOUND, "Profile not found"));
    }

    match suggestions_for(&id, &profiles) {
        Ok(suggestions) if suggestions.is_empty() => Ok(error_response(
            StatusCode::NOT_FOUND,
            "No suggestions found",
        )),
        Ok(suggestions) => Ok(HttpResponse::Ok().json(SuggestionsResponse { suggestions })),
        Err(e) => Ok(error_status(&e)),
    }
}

async fn reset_database(
    store: web::Data<Arc<StoreManager>>,
    auth: web::Data<AuthConfig>,
    req: HttpRequest,
) -> ActixResult<HttpResponse> {
    if !auth.authenticate(&req) {
        return Ok(unauthorized());
    }

    match store.reset_all() {
        Ok(()) => Ok(HttpResponse::Ok().json(serde_json::json!({
            "message": "Database reset"
        }))),
        Err(e) => Ok(error_status(&e)),
    }
}

async fn not_found() -> ActixResult<HttpResponse> {
    Ok(error_response(
        StatusCode::NOT_FOUND,
        "API endpoint not found",
    ))
}

fn error_response(status: StatusCode, message: &str) -> HttpResponse {
    HttpResponse::build(status).json(serde_json::json!({
        "error": status.as_u16(),
        "message": message,
    }))
}

fn unauthorized() -> HttpResponse {
    error_response(StatusCode::UNAUTHORIZED, "Unauthorized")
}

fn bad_request(error: &Error) -> HttpResponse {
    error_response(StatusCode::BAD_REQUEST, &error.to_string())
}

/// Map a core error to its HTTP status. Validation errors are client
/// mistakes; store failures are ours.
fn error_status(error: &Error) -> HttpResponse {
    match error {
        Error::ProfileNotFound(_) => error_response(StatusCode::NOT_FOUND, "Profile not found"),
        Error::ProfileExists(_) => {
            error_response(StatusCode::CONFLICT, "Profile already exists")
        }
        Error::MissingField(_) | Error::UnknownField(_) | Error::InvalidFieldValue(_) => {
            bad_request(error)
        }
        _ => error_response(StatusCode::INTERNAL_SERVER_ERROR, &error.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::SHARED_SECRET_HEADER;
    use actix_web::test;
    use serde_json::{json, Value};

    const SECRET: &str = "s3cret";

    fn test_auth() -> AuthConfig {
        AuthConfig {
            shared_secret: Some(SECRET.to_string()),
            skip_authentication: false,
        }
    }

    macro_rules! test_app {
        ($store:expr) => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new($store.clone()))
                    .app_data(web::Data::new(test_auth()))
                    .app_data(web::Data::new(FieldSchema::default()))
                    .configure(routes),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn protected_routes_require_the_shared_secret() {
        let store = Arc::new(StoreManager::in_memory());
        let app = test_app!(store);

        let req = test::TestRequest::get()
            .uri("/api/profiles/alice")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn create_then_fetch_roundtrips() {
        let store = Arc::new(StoreManager::in_memory());
        let app = test_app!(store);

        let req = test::TestRequest::put()
            .uri("/api/profiles/alice")
            .insert_header((SHARED_SECRET_HEADER, SECRET))
            .set_json(json!({"name": "Alice", "bio": "I love hiking"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let req = test::TestRequest::get()
            .uri("/api/profiles/alice")
            .insert_header((SHARED_SECRET_HEADER, SECRET))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({"name": "Alice", "bio": "I love hiking"}));
    }

    #[actix_web::test]
    async fn creating_an_existing_profile_conflicts() {
        let store = Arc::new(StoreManager::in_memory());
        let app = test_app!(store);

        for expected in [StatusCode::OK, StatusCode::CONFLICT] {
            let req = test::TestRequest::put()
                .uri("/api/profiles/alice")
                .insert_header((SHARED_SECRET_HEADER, SECRET))
                .set_json(json!({"name": "Alice", "bio": "hi"}))
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), expected);
        }
    }

    #[actix_web::test]
    async fn create_rejects_missing_and_unknown_fields() {
        let store = Arc::new(StoreManager::in_memory());
        let app = test_app!(store);

        let req = test::TestRequest::put()
            .uri("/api/profiles/alice")
            .insert_header((SHARED_SECRET_HEADER, SECRET))
            .set_json(json!({"name": "Alice"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "Missing required field: bio");

        let req = test::TestRequest::put()
            .uri("/api/profiles/alice")
            .insert_header((SHARED_SECRET_HEADER, SECRET))
            .set_json(json!({"name": "Alice", "bio": "hi", "petName": "Rex"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "Invalid field: petName");
    }

    #[actix_web::test]
    async fn patch_updates_allowed_fields_only() {
        let store = Arc::new(StoreManager::in_memory());
        let app = test_app!(store);

        let req = test::TestRequest::put()
            .uri("/api/profiles/alice")
            .insert_header((SHARED_SECRET_HEADER, SECRET))
            .set_json(json!({"name": "Alice", "bio": "old"}))
            .to_request();
        test::call_service(&app, req).await;

        let req = test::TestRequest::patch()
            .uri("/api/profiles/alice")
            .insert_header((SHARED_SECRET_HEADER, SECRET))
            .set_json(json!({"bio": "new", "shoeSize": "43"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        // the rejected patch must not have touched the profile
        assert_eq!(
            store.get_profile("alice").unwrap().unwrap().bio().unwrap(),
            "old"
        );

        let req = test::TestRequest::patch()
            .uri("/api/profiles/alice")
            .insert_header((SHARED_SECRET_HEADER, SECRET))
            .set_json(json!({"bio": "new"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            store.get_profile("alice").unwrap().unwrap().bio().unwrap(),
            "new"
        );
    }

    #[actix_web::test]
    async fn suggestions_distinguish_not_found_from_no_matches() {
        let store = Arc::new(StoreManager::in_memory());
        let app = test_app!(store);

        let profiles = [
            ("alice", json!({"name": "Alice", "bio": "I love hiking"})),
            ("bob", json!({"name": "Bob", "bio": "I love hiking"})),
            ("carol", json!({"name": "Carol", "bio": "synths only"})),
        ];
        for (id, body) in profiles {
            let req = test::TestRequest::put()
                .uri(&format!("/api/profiles/{id}"))
                .insert_header((SHARED_SECRET_HEADER, SECRET))
                .set_json(body)
                .to_request();
            test::call_service(&app, req).await;
        }

        let req = test::TestRequest::get()
            .uri("/api/profiles/alice/suggestions")
            .insert_header((SHARED_SECRET_HEADER, SECRET))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["suggestions"].as_array().unwrap().len(), 1);
        assert_eq!(body["suggestions"][0]["name"], "Bob");

        // carol shares nothing with anyone
        let req = test::TestRequest::get()
            .uri("/api/profiles/carol/suggestions")
            .insert_header((SHARED_SECRET_HEADER, SECRET))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "No suggestions found");

        let req = test::TestRequest::get()
            .uri("/api/profiles/ghost/suggestions")
            .insert_header((SHARED_SECRET_HEADER, SECRET))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "Profile not found");
    }

    #[actix_web::test]
    async fn count_and_hits_need_no_authentication() {
        let store = Arc::new(StoreManager::in_memory());
        store.increment_hits().unwrap();
        let app = test_app!(store);

        let resp =
            test::call_service(&app, test::TestRequest::get().uri("/api/hits").to_request())
                .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["hits"], 1);

        let resp = test::call_service(
            &app,
            test::TestRequest::get().uri("/api/profiles/count").to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["count"], 0);
    }

    #[actix_web::test]
    async fn reset_clears_everything() {
        let store = Arc::new(StoreManager::in_memory());
        let app = test_app!(store);

        let req = test::TestRequest::put()
            .uri("/api/profiles/alice")
            .insert_header((SHARED_SECRET_HEADER, SECRET))
            .set_json(json!({"name": "Alice", "bio": "hi"}))
            .to_request();
        test::call_service(&app, req).await;

        let req = test::TestRequest::post()
            .uri("/api/developer/reset")
            .insert_header((SHARED_SECRET_HEADER, SECRET))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        assert_eq!(store.profile_count().unwrap(), 0);
    }

    #[actix_web::test]
    async fn unknown_api_routes_return_a_json_404() {
        let store = Arc::new(StoreManager::in_memory());
        let app = test_app!(store);

        let resp = test::call_service(
            &app,
            test::TestRequest::get().uri("/api/nope").to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "API endpoint not found");
    }
}
