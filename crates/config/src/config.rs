use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::default::{
    get_default_address, get_default_lb_type, get_default_load_balancing, get_default_log,
    get_default_log_file, get_default_log_level, get_default_port,
};

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub listen: Listen,

    #[serde(default = "get_default_load_balancing")]
    pub load_balancing: LoadBalancing,

    // key = exact request path, value = backend base uri (path mode)
    #[serde(default)]
    pub routes: BTreeMap<String, String>,

    // rotation order (round-robin mode)
    #[serde(default)]
    pub backends: Vec<String>,

    #[serde(default = "get_default_log")]
    pub log: Log,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Listen {
    #[serde(default = "get_default_port")]
    pub port: u32, // 9090

    #[serde(default = "get_default_address")]
    pub address: String, // "0.0.0.0"
}

impl Default for Listen {
    fn default() -> Self {
        Self {
            port: get_default_port(),
            address: get_default_address(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoadBalancing {
    #[serde(rename = "type", default = "get_default_lb_type")]
    pub lb_type: String, // "path" | "round-robin"
}

impl Default for LoadBalancing {
    fn default() -> Self {
        get_default_load_balancing()
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Log {
    #[serde(default = "get_default_log_level")]
    pub level: String, // "trace, debug, info, warn, error, off"

    #[serde(default)]
    pub enabled: bool, // also write to `file` instead of stderr

    #[serde(default = "get_default_log_file")]
    pub file: String,
}

impl Default for Log {
    fn default() -> Self {
        get_default_log()
    }
}
