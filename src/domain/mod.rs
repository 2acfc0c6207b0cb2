// Domain layer: term records, the request/response object graph of the
// accounting engine, and the ports (interfaces) the core talks through.

pub mod model;
pub mod ports;
pub mod request;
pub mod response;
