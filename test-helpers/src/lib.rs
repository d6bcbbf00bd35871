pub mod mock;
pub mod routes;

use actix_web::dev::Server;
use actix_web::{App, HttpServer, web};
use payloads::geo::OsmGeocoder;
use payloads::{APIClient, ClientError, User, requests};
use reqwest::StatusCode;
use std::net::TcpListener;
use std::sync::Mutex;
use tracing_log::LogTracer;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt};

pub struct TestApp {
    #[allow(unused)]
    pub port: u16,
    pub client: APIClient,
    pub geocoder: OsmGeocoder,
}

impl TestApp {
    /// Log in as the seeded user, keeping the token on the client.
    pub async fn login_alice(&mut self) -> anyhow::Result<User> {
        let response = self.client.login(&alice_credentials()).await?;
        self.client.token = Some(response.token);
        Ok(response.user)
    }
}

pub fn alice_credentials() -> requests::LoginCredentials {
    requests::LoginCredentials {
        email: mock::ALICE_EMAIL.into(),
        password: mock::ALICE_PASSWORD.into(),
    }
}

/// Build the mock server on an already-bound listener, but not await it.
pub fn build(listener: TcpListener) -> std::io::Result<Server> {
    let store = web::Data::new(Mutex::new(mock::Store::seeded()));
    let server = HttpServer::new(move || {
        App::new()
            .app_data(store.clone())
            .service(routes::api_services())
            .service(routes::geo_services())
    })
    .workers(1)
    .listen(listener)?
    .run();
    Ok(server)
}

/// Start a fresh mock backend on an OS-assigned port.
///
/// Every call gets its own seeded store, so tests can run in parallel.
pub async fn spawn_mock_backend() -> TestApp {
    init_test_tracing();

    let listener = TcpListener::bind("127.0.0.1:0")
        .expect("Failed to bind mock backend");
    let port = listener
        .local_addr()
        .expect("Mock backend has no local address")
        .port();
    let server = build(listener).expect("Failed to build mock backend");
    tokio::spawn(server);

    let address = format!("http://127.0.0.1:{port}");
    TestApp {
        port,
        client: APIClient::new(&address),
        geocoder: OsmGeocoder {
            geocoder_url: address.clone(),
            router_url: address,
            inner_client: reqwest::Client::new(),
        },
    }
}

/// Install a test-friendly subscriber once per process. Later calls are
/// no-ops. `RUST_LOG` overrides the default `error` filter.
pub fn init_test_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("error"));
    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_test_writer());
    let _ = LogTracer::init();
    let _ = tracing::subscriber::set_global_default(subscriber);
}

/// Assert that the result of an API action results in a specific status code.
pub fn assert_status_code<T>(
    result: Result<T, ClientError>,
    expected: StatusCode,
) {
    match result {
        Err(ClientError::APIError { status, .. }) => {
            assert_eq!(status, expected)
        }
        _ => panic!("Expected APIError"),
    };
}
