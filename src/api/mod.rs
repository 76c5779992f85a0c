//! HTTP API Module
//!
//! Serves the in-memory store over the WebHDFS REST protocol.

mod http;

pub use http::{
    AppState, BooleanResponse, HealthResponse, HttpServer, RemoteException,
    RemoteExceptionResponse,
};
