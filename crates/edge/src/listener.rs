use std::{convert::Infallible, net::SocketAddr, sync::Arc, time::Duration};

use hyper::{Request, body::Incoming, server::conn::http1, service::service_fn};
use hyper_util::rt::TokioIo;
use log::{debug, error, info};
use tokio::net::TcpListener;

use switchyard_bridge::ClientAddr;
use switchyard_config::config::Config;
use switchyard_lb::Backend;
use switchyard_transport::HttpClient;

use crate::{
    Server,
    balancer::{Balancer, bad_gateway},
    builder::{BuildError, build_load_balancing},
};

#[derive(Debug)]
pub enum ServerError {
    Build(BuildError),
    Bind(std::io::Error),
}

impl std::fmt::Display for ServerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServerError::Build(err) => write!(f, "Failed to build load balancer: {}", err),
            ServerError::Bind(err) => write!(f, "Failed to bind listener: {}", err),
        }
    }
}

impl std::error::Error for ServerError {}

const ACCEPT_BACKOFF_START: Duration = Duration::from_millis(5);
const ACCEPT_BACKOFF_MAX: Duration = Duration::from_secs(1);

/// Delay before retrying `accept` after another failure: 5ms, doubling up to 1s.
fn next_accept_backoff(current: Option<Duration>) -> Duration {
    match current {
        None => ACCEPT_BACKOFF_START,
        Some(delay) => (delay * 2).min(ACCEPT_BACKOFF_MAX),
    }
}

impl Server {
    /// Builds the balancer from `config` and binds the listening socket.
    pub async fn bind(config: &Config) -> Result<Self, ServerError> {
        let client = HttpClient::new();
        let load_balancing = build_load_balancing(config, &client).map_err(ServerError::Build)?;
        info!(
            "Load balancing via {} over {} backend(s)",
            load_balancing.strategy().name(),
            load_balancing.len()
        );

        let socket_address = format!("{}:{}", config.listen.address, config.listen.port);
        let listener = TcpListener::bind(socket_address.as_str())
            .await
            .map_err(ServerError::Bind)?;

        Ok(Self {
            listener,
            balancer: Arc::new(Balancer::new(load_balancing)),
        })
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    pub async fn run(self) {
        if let Ok(addr) = self.local_addr() {
            info!("Serving requests at '{}'", addr);
        }
        serve(self.listener, self.balancer).await
    }
}

/// Accepts connections forever, one task per connection.
pub async fn serve<B>(listener: TcpListener, balancer: Arc<Balancer<B>>)
where
    B: Backend<Body = Incoming>,
{
    let mut backoff = None;
    loop {
        let (stream, peer) = match listener.accept().await {
            Ok(v) => {
                backoff = None;
                v
            }
            Err(err) => {
                let delay = next_accept_backoff(backoff);
                backoff = Some(delay);
                error!("Failed to accept connection: {}; retrying in {:?}", err, delay);
                tokio::time::sleep(delay).await;
                continue;
            }
        };

        let balancer = balancer.clone();
        let service = service_fn(move |mut req: Request<Incoming>| {
            let balancer = balancer.clone();
            req.extensions_mut().insert(ClientAddr(peer));
            async move {
                let response = match balancer.handle(req).await {
                    Ok(response) => response,
                    Err(err) => {
                        error!("Upstream request failed: {}", err);
                        bad_gateway()
                    }
                };
                Ok::<_, Infallible>(response)
            }
        });

        tokio::spawn(async move {
            if let Err(err) = http1::Builder::new()
                .serve_connection(TokioIo::new(stream), service)
                .await
            {
                debug!("Connection from {} closed with error: {:?}", peer, err);
            }
        });
    }
}
