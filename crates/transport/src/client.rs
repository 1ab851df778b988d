use hyper::{Request, Response, body::Incoming};
use hyper_util::{
    client::legacy::{Client, connect::HttpConnector},
    rt::TokioExecutor,
};

/// Pooled HTTP/1.1 client shared by every backend.
///
/// Cloning is cheap; clones share one connection pool.
pub struct HttpClient<B = Incoming> {
    client: Client<HttpConnector, B>,
}

impl<B> HttpClient<B>
where
    B: hyper::body::Body + Send + Unpin + 'static,
    B::Data: Send,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    pub fn new() -> Self {
        let mut http = HttpConnector::new();
        http.set_nodelay(true);

        let client = Client::builder(TokioExecutor::new()).build(http);

        Self { client }
    }

    pub async fn send(
        &self,
        req: Request<B>,
    ) -> Result<Response<Incoming>, hyper_util::client::legacy::Error> {
        self.client.request(req).await
    }
}

impl<B> Clone for HttpClient<B> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
        }
    }
}

impl<B> Default for HttpClient<B>
where
    B: hyper::body::Body + Send + Unpin + 'static,
    B::Data: Send,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    fn default() -> Self {
        Self::new()
    }
}
