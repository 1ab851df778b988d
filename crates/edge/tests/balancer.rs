use std::net::SocketAddr;

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::{Request, Response, StatusCode, body::Incoming, service::service_fn};
use hyper_util::{
    client::legacy::{Client, connect::HttpConnector},
    rt::{TokioExecutor, TokioIo},
};
use tokio::net::TcpListener;

use switchyard_config::config::{Config, Listen, LoadBalancing, Log};
use switchyard_edge::Server;

/// Backend that answers `<name> <path>` so tests can tell who served a request.
async fn start_named_backend(name: &'static str) -> std::io::Result<SocketAddr> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        loop {
            let (stream, _) = match listener.accept().await {
                Ok(v) => v,
                Err(_) => break,
            };
            let service = service_fn(move |req: Request<Incoming>| async move {
                let body = format!("{} {}", name, req.uri().path());
                Ok::<_, std::convert::Infallible>(Response::new(Full::new(Bytes::from(body))))
            });

            tokio::spawn(async move {
                let _ = hyper::server::conn::http1::Builder::new()
                    .serve_connection(TokioIo::new(stream), service)
                    .await;
            });
        }
    });

    Ok(addr)
}

fn base_config(lb_type: &str) -> Config {
    Config {
        listen: Listen {
            port: 0,
            address: "127.0.0.1".to_string(),
        },
        load_balancing: LoadBalancing {
            lb_type: lb_type.to_string(),
        },
        log: Log::default(),
        ..Config::default()
    }
}

async fn start_balancer(config: Config) -> SocketAddr {
    let server = Server::bind(&config).await.unwrap();
    let addr = server.local_addr().unwrap();
    tokio::spawn(server.run());
    addr
}

async fn get(lb: SocketAddr, path: &str) -> (StatusCode, String) {
    let client: Client<HttpConnector, Full<Bytes>> =
        Client::builder(TokioExecutor::new()).build(HttpConnector::new());
    let req = Request::builder()
        .uri(format!("http://{lb}{path}"))
        .body(Full::new(Bytes::new()))
        .unwrap();

    let response = client.request(req).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, String::from_utf8(body.to_vec()).unwrap())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn path_mode_routes_by_exact_path() {
    let trip = start_named_backend("trip").await.unwrap();
    let notification = start_named_backend("notification").await.unwrap();

    let mut config = base_config("path");
    config.routes.insert("/trip".to_string(), format!("http://{trip}"));
    config
        .routes
        .insert("/notification".to_string(), format!("http://{notification}"));
    let lb = start_balancer(config).await;

    assert_eq!(get(lb, "/trip").await, (StatusCode::OK, "trip /trip".to_string()));
    assert_eq!(
        get(lb, "/notification?x=1").await,
        (StatusCode::OK, "notification /notification".to_string())
    );
    assert_eq!(
        get(lb, "/geolocation").await,
        (StatusCode::NOT_FOUND, "Not Found\n".to_string())
    );
    assert_eq!(
        get(lb, "/trip/7").await,
        (StatusCode::NOT_FOUND, "Not Found\n".to_string())
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn rotation_mode_cycles_through_backends() {
    let mut config = base_config("round-robin");
    for name in ["a", "b", "c"] {
        let addr = start_named_backend(name).await.unwrap();
        config.backends.push(format!("http://{addr}"));
    }
    let lb = start_balancer(config).await;

    let mut served = Vec::new();
    for _ in 0..4 {
        let (status, body) = get(lb, "/work").await;
        assert_eq!(status, StatusCode::OK);
        served.push(body);
    }
    assert_eq!(served, vec!["a /work", "b /work", "c /work", "a /work"]);
}

#[tokio::test]
async fn unreachable_backend_is_bad_gateway() {
    let closed = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = closed.local_addr().unwrap();
    drop(closed);

    let mut config = base_config("rr");
    config.backends.push(format!("http://{addr}"));
    let lb = start_balancer(config).await;

    let (status, body) = get(lb, "/").await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(body.is_empty());
}

#[tokio::test]
async fn malformed_backend_fails_to_bind() {
    let mut config = base_config("path");
    config
        .routes
        .insert("/trip".to_string(), "ftp://localhost:21".to_string());

    assert!(Server::bind(&config).await.is_err());
}
