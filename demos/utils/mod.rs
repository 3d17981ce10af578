mod args;
pub mod rpc_client;

pub use args::parse_inputs;
