use std::sync::Arc;
use std::time::Instant;

use axum::Router;
use testcontainers::runners::AsyncRunner;
use testcontainers::ContainerAsync;
use testcontainers_modules::minio::MinIO;
use testcontainers_modules::mongo::Mongo;

use folio::auth::AuthContext;
use folio::config::AppConfig;
use folio::db::code_files::{CodeFileRepository, MongoCodeFileRepository};
use folio::db::hero_slides::{HeroSlideRepository, MongoHeroSlideRepository};
use folio::db::projects::{MongoProjectRepository, ProjectRepository};
use folio::router::build_router;
use folio::state::AppState;
use folio::storage::client::{S3StorageClient, StorageClient};

pub const TEST_ADMIN_PASSWORD: &str = "test-admin-pass";
pub const TEST_JWT_SECRET: &str = "test-jwt-secret";

/// Holds running containers and provides the Axum router for integration
/// tests.
///
/// Containers are kept alive for as long as this struct lives. When dropped,
/// containers are stopped and cleaned up automatically.
pub struct TestEnv {
    _mongo: ContainerAsync<Mongo>,
    _minio: ContainerAsync<MinIO>,
    pub router: Router,
    pub code_files: Arc<dyn CodeFileRepository>,
    pub projects: Arc<dyn ProjectRepository>,
    pub hero_slides: Arc<dyn HeroSlideRepository>,
    pub storage: Arc<dyn StorageClient>,
}

impl TestEnv {
    /// Spin up MongoDB and MinIO and build a router wired to real services.
    pub async fn start() -> Self {
        let mongo_fut = Mongo::default().start();
        let minio_fut = MinIO::default().start();
        let (mongo_container, minio_container) = tokio::join!(mongo_fut, minio_fut);
        let mongo_container = mongo_container.expect("Failed to start MongoDB container");
        let minio_container = minio_container.expect("Failed to start MinIO container");

        // --- MongoDB ---
        let mongo_port = mongo_container
            .get_host_port_ipv4(27017)
            .await
            .expect("Failed to get MongoDB port");
        let mongo_uri = format!("mongodb://127.0.0.1:{}", mongo_port);
        let mongo_client = mongodb::Client::with_uri_str(&mongo_uri)
            .await
            .expect("Failed to connect to MongoDB");
        let db = mongo_client.database("folio_test");

        let code_files: Arc<dyn CodeFileRepository> = Arc::new(MongoCodeFileRepository::new(&db));
        let projects: Arc<dyn ProjectRepository> = Arc::new(MongoProjectRepository::new(&db));
        let hero_slides: Arc<dyn HeroSlideRepository> =
            Arc::new(MongoHeroSlideRepository::new(&db));

        // --- MinIO (S3) ---
        let minio_port = minio_container
            .get_host_port_ipv4(9000)
            .await
            .expect("Failed to get MinIO port");
        let minio_endpoint = format!("http://127.0.0.1:{}", minio_port);

        // Set env vars for AWS SDK to pick up MinIO credentials
        unsafe {
            std::env::set_var("AWS_ACCESS_KEY_ID", "minioadmin");
            std::env::set_var("AWS_SECRET_ACCESS_KEY", "minioadmin");
            std::env::set_var("AWS_REGION", "us-east-1");
        }

        let s3_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .endpoint_url(&minio_endpoint)
            .region(aws_config::Region::new("us-east-1"))
            .load()
            .await;

        let s3_client = aws_sdk_s3::Client::from_conf(
            aws_sdk_s3::config::Builder::from(&s3_config)
                .force_path_style(true)
                .build(),
        );

        let bucket_name = "folio-test";
        let _ = s3_client.create_bucket().bucket(bucket_name).send().await;

        let storage: Arc<dyn StorageClient> =
            Arc::new(S3StorageClient::new(s3_client, bucket_name.to_string()));

        // --- Build AppState ---
        let config = AppConfig {
            port: 0,
            mongodb_uri: mongo_uri,
            mongodb_database: "folio_test".to_string(),
            jwt_secret: TEST_JWT_SECRET.to_string(),
            jwt_expiry_hours: 24 * 7,
            admin_password: Some(TEST_ADMIN_PASSWORD.to_string()),
            admin_password_hash: None,
            s3_bucket: bucket_name.to_string(),
            s3_endpoint: Some(minio_endpoint),
            allowed_origins: None,
            environment: "test".to_string(),
        };

        let state = AppState {
            code_files: code_files.clone(),
            projects: projects.clone(),
            hero_slides: hero_slides.clone(),
            storage: storage.clone(),
            auth: AuthContext::from_config(&config),
            environment: config.environment.clone(),
            started_at: Instant::now(),
        };

        let router = build_router(state, None);

        Self {
            _mongo: mongo_container,
            _minio: minio_container,
            router,
            code_files,
            projects,
            hero_slides,
            storage,
        }
    }

    /// Build an `axum_test::TestServer` from this environment's router.
    pub fn server(&self) -> axum_test::TestServer {
        axum_test::TestServer::builder()
            .expect_success_by_default()
            .build(self.router.clone())
    }

    /// Build a `TestServer` that does NOT expect success by default (for
    /// error tests).
    pub fn server_permissive(&self) -> axum_test::TestServer {
        axum_test::TestServer::builder()
            .build(self.router.clone())
    }

    /// Log in as the admin and return the bearer token.
    pub async fn login(&self, server: &axum_test::TestServer) -> String {
        let response = server
            .post("/api/auth/login")
            .json(&serde_json::json!({ "password": TEST_ADMIN_PASSWORD }))
            .await;
        let body: serde_json::Value = response.json();
        body["token"]
            .as_str()
            .expect("login response should carry a token")
            .to_string()
    }

    /// Helper: create a code file via the API.
    pub async fn create_file(
        &self,
        server: &axum_test::TestServer,
        token: &str,
        file_name: &str,
        language: &str,
    ) -> axum_test::TestResponse {
        server
            .post("/api/files")
            .authorization_bearer(token)
            .json(&serde_json::json!({
                "fileName": file_name,
                "folderPath": "src/demo",
                "description": "A sample file used by the integration suite",
                "programmingLanguage": language,
                "codeContent": "fn main() {}",
                "tags": ["sample"]
            }))
            .await
    }
}
