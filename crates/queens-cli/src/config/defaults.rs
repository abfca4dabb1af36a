use std::thread;

pub const DEFAULT_ADDRESS: &str = "127.0.0.1:7744";

pub struct DefaultsConfig {
    pub parallel: bool,
    pub workers: usize,
    pub listen: String,
    pub connect: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            parallel: false,
            workers: thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
            listen: DEFAULT_ADDRESS.to_string(),
            connect: DEFAULT_ADDRESS.to_string(),
        }
    }
}
