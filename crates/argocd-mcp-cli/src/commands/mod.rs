pub mod serve_mcp;
