use std::{convert::Infallible, net::SocketAddr, sync::Arc};

use bytes::Bytes;
use clap::Parser;
use http_body_util::Full;
use hyper::{Request, Response, body::Incoming, server::conn::http1, service::service_fn};
use hyper_util::rt::TokioIo;
use tokio::net::TcpListener;

#[derive(Parser)]
#[command(version, about = "Minimal HTTP/1.1 backend for trying out switchyard")]
struct Cli {
    #[arg(long, default_value_t = 3081)]
    port: u16,

    /// Name echoed back in every response
    #[arg(long, default_value = "backend")]
    name: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let cli = Cli::parse();
    let addr: SocketAddr = format!("127.0.0.1:{}", cli.port).parse()?;
    let name: Arc<str> = Arc::from(cli.name);

    let listener = TcpListener::bind(addr).await?;
    println!("{} listening on http://{}", name, addr);

    loop {
        let (stream, _) = listener.accept().await?;
        let io = TokioIo::new(stream);
        let name = name.clone();
        let service = service_fn(move |req: Request<Incoming>| {
            let body = format!("{} {} {}\n", name, req.method(), req.uri().path());
            async move { Ok::<_, Infallible>(Response::new(Full::new(Bytes::from(body)))) }
        });

        tokio::spawn(async move {
            let _ = http1::Builder::new().serve_connection(io, service).await;
        });
    }
}
