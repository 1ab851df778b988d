use log::info;

use switchyard_config::{config::Config, validator::check_backend_uri};
use switchyard_lb::{LoadBalancing, PathRegistry, RegistryError, RotationRegistry, Strategy};
use switchyard_transport::{HttpBackend, HttpClient};

#[derive(Debug)]
pub enum BuildError {
    Strategy(String),
    InvalidUri(String),
    Registry(RegistryError),
}

impl std::fmt::Display for BuildError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BuildError::Strategy(msg) => write!(f, "{msg}"),
            BuildError::InvalidUri(msg) => write!(f, "{msg}"),
            BuildError::Registry(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for BuildError {}

fn http_backend(address: &str, client: &HttpClient) -> Result<HttpBackend, BuildError> {
    let uri = check_backend_uri(address).map_err(BuildError::InvalidUri)?;
    Ok(HttpBackend::new(uri, client.clone()))
}

/// Builds the configured policy and its registry. All backends share `client`.
pub fn build_load_balancing(
    config: &Config,
    client: &HttpClient,
) -> Result<LoadBalancing<HttpBackend>, BuildError> {
    let strategy =
        Strategy::from_config(&config.load_balancing.lb_type).map_err(BuildError::Strategy)?;

    match strategy {
        Strategy::Path => {
            let routes = config
                .routes
                .iter()
                .map(|(path, address)| {
                    info!("Route {} -> {}", path, address);
                    Ok((path.clone(), http_backend(address, client)?))
                })
                .collect::<Result<Vec<_>, BuildError>>()?;
            Ok(LoadBalancing::path(PathRegistry::new(routes)))
        }
        Strategy::RoundRobin => {
            let backends = config
                .backends
                .iter()
                .map(|address| {
                    info!("Backend {}", address);
                    http_backend(address, client)
                })
                .collect::<Result<Vec<_>, BuildError>>()?;
            let registry = RotationRegistry::new(backends).map_err(BuildError::Registry)?;
            Ok(LoadBalancing::round_robin(registry))
        }
    }
}

#[cfg(test)]
mod tests {
    use switchyard_config::loader::parse_config;
    use switchyard_lb::Backend;

    use super::*;

    #[test]
    fn builds_path_registry() {
        let config = parse_config(
            r#"
routes:
  /trip: http://localhost:3081
  /notification: http://localhost:3082
"#,
        )
        .unwrap();

        let lb = build_load_balancing(&config, &HttpClient::new()).unwrap();
        assert_eq!(lb.strategy(), Strategy::Path);
        assert_eq!(lb.len(), 2);
        let backend = lb.select("/notification").unwrap();
        assert_eq!(backend.address().port_u16(), Some(3082));
    }

    #[test]
    fn builds_rotation_in_order() {
        let config = parse_config(
            r#"
load_balancing: { type: round-robin }
backends: [ "http://localhost:3082", "http://localhost:3081" ]
"#,
        )
        .unwrap();

        let lb = build_load_balancing(&config, &HttpClient::new()).unwrap();
        assert_eq!(lb.strategy(), Strategy::RoundRobin);
        assert_eq!(lb.select("/").unwrap().address().port_u16(), Some(3082));
        assert_eq!(lb.select("/").unwrap().address().port_u16(), Some(3081));
    }

    #[test]
    fn malformed_uri_fails() {
        let config = parse_config("routes: { /trip: 'http://bad host' }").unwrap();
        assert!(matches!(
            build_load_balancing(&config, &HttpClient::new()),
            Err(BuildError::InvalidUri(_))
        ));
    }

    #[test]
    fn empty_rotation_fails() {
        let config = parse_config("load_balancing: { type: rr }").unwrap();
        assert!(matches!(
            build_load_balancing(&config, &HttpClient::new()),
            Err(BuildError::Registry(RegistryError::Empty))
        ));
    }

    #[test]
    fn unknown_strategy_fails() {
        let config = parse_config("load_balancing: { type: random }").unwrap();
        assert!(matches!(
            build_load_balancing(&config, &HttpClient::new()),
            Err(BuildError::Strategy(_))
        ));
    }
}
