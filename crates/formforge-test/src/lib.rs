//! # formforge-test
//!
//! Testing helpers for the formforge framework. Provides a request factory
//! for building [`HttpRequest`](formforge_http::HttpRequest) values that
//! exercise views directly, without binding a socket.

pub mod request_factory;

pub use request_factory::RequestFactory;
