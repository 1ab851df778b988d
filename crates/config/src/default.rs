use crate::config::{LoadBalancing, Log};

// default values
pub fn get_default_port() -> u32 {
    9090
}

pub fn get_default_address() -> String {
    String::from("0.0.0.0")
}

pub fn get_default_log_level() -> String {
    String::from("info")
}

pub fn get_default_log_file() -> String {
    String::from("./logs/switchyard.log")
}

pub fn get_default_lb_type() -> String {
    String::from("path")
}

pub fn get_default_load_balancing() -> LoadBalancing {
    LoadBalancing {
        lb_type: get_default_lb_type(),
    }
}

pub fn get_default_log() -> Log {
    Log {
        level: get_default_log_level(),
        enabled: false,
        file: get_default_log_file(),
    }
}
