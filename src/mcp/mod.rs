//! Model Context Protocol (MCP) server handling and JSON-RPC implementations
//!
//! Provides protocol-level specifics surrounding JSON-RPC decoding, envelope
//! formatting, error mapping, and method routing.

pub mod rpc;
pub mod server;
