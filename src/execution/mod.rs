//! Execution layer: header construction and the HTTP transport seam.

pub mod http;
