use http::Uri;
use log::{error, info};

use crate::config::Config;

pub const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error", "off"];

pub const PATH_LB_TYPES: &[&str] = &["path", "path-exact", "path_exact"];

pub const ROTATION_LB_TYPES: &[&str] = &["round-robin", "round_robin", "rr"];

/// Checks that `value` is an absolute `http://host[:port][/path]` uri.
pub fn check_backend_uri(value: &str) -> Result<Uri, String> {
    let uri: Uri = value
        .parse()
        .map_err(|err| format!("malformed backend uri '{}': {}", value, err))?;

    match uri.scheme_str() {
        Some("http") => {}
        Some(other) => {
            return Err(format!(
                "unsupported scheme '{}' in backend uri '{}' (only http is supported)",
                other, value
            ));
        }
        None => return Err(format!("backend uri '{}' has no scheme", value)),
    }

    if uri.host().is_none_or(str::is_empty) {
        return Err(format!("backend uri '{}' has no host", value));
    }

    Ok(uri)
}

fn is_one_of(set: &[&str], value: &str) -> bool {
    set.iter().any(|item| item.eq_ignore_ascii_case(value.trim()))
}

pub fn validate(config: &Config) -> bool {
    info!("Starting configuration validation...");

    // --- Validate Log level ---
    if !is_one_of(VALID_LOG_LEVELS, &config.log.level) {
        error!("Invalid log level: {}", config.log.level);
        return false;
    }

    if config.log.enabled && config.log.file.is_empty() {
        error!("File logging is enabled but no log file is set");
        return false;
    }

    // --- Validate listen address ---
    if config.listen.address.is_empty() {
        error!("Listen address is empty");
        return false;
    }

    // --- Validate listen port ---
    if config.listen.port == 0 || config.listen.port > 65535 {
        error!(
            "Invalid listen port: {} (must be between 1 and 65535)",
            config.listen.port
        );
        return false;
    }

    // --- Validate load balancing type and its registry ---
    let lb_type = &config.load_balancing.lb_type;
    if is_one_of(PATH_LB_TYPES, lb_type) {
        if config.routes.is_empty() {
            error!("No routes configured for path load balancing");
            return false;
        }

        for (path, address) in &config.routes {
            if !path.starts_with('/') {
                error!("Route path '{}' must start with '/'", path);
                return false;
            }

            if let Err(err) = check_backend_uri(address) {
                error!("Route '{}': {}", path, err);
                return false;
            }
        }
    } else if is_one_of(ROTATION_LB_TYPES, lb_type) {
        if config.backends.is_empty() {
            error!("No backends configured for round-robin load balancing");
            return false;
        }

        for (index, address) in config.backends.iter().enumerate() {
            if let Err(err) = check_backend_uri(address) {
                error!("Backend #{}: {}", index, err);
                return false;
            }
        }
    } else {
        error!("Invalid load balancing type: {}", lb_type);
        return false;
    }

    info!("Configuration validation passed successfully");

    true
}
