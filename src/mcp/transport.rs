//! Newline-delimited JSON-RPC transport over stdio
//!
//! One request is read, dispatched and answered before the next is read.
//! Malformed frames get an error response and the loop keeps going; only an
//! I/O failure on either stream ends it early.

use std::io::{BufRead, BufReader, Write};

use serde_json::Value;

use super::handler::McpHandler;
use super::protocol::{error_codes, McpRequest, McpResponse};
use crate::error::Result;

/// Transport loop state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    AwaitingRequest,
    ShuttingDown,
}

/// MCP Server handling stdio communication
pub struct McpServer<H>
where
    H: McpHandler,
{
    handler: H,
}

impl<H: McpHandler> McpServer<H> {
    /// Create a new MCP server
    pub fn new(handler: H) -> Self {
        Self { handler }
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }

    /// Run the server, reading from stdin and writing to stdout
    pub fn run(&self) -> Result<()> {
        let stdin = std::io::stdin();
        let stdout = std::io::stdout();
        let mut reader = BufReader::new(stdin.lock());
        let mut writer = stdout.lock();
        self.serve(&mut reader, &mut writer)
    }

    /// Serve until end of input. Returns `Err` on read or write failure.
    pub fn serve<R, W>(&self, reader: &mut R, writer: &mut W) -> Result<()>
    where
        R: BufRead,
        W: Write,
    {
        let mut state = LoopState::AwaitingRequest;
        let mut line = String::new();

        while state == LoopState::AwaitingRequest {
            line.clear();
            match reader.read_line(&mut line) {
                Ok(0) => {
                    tracing::info!("Input closed, shutting down");
                    state = LoopState::ShuttingDown;
                }
                Ok(_) => {
                    let trimmed = line.trim();
                    if trimmed.is_empty() {
                        continue;
                    }
                    if let Some(response) = self.process_frame(trimmed) {
                        write_response(writer, &response)?;
                    }
                }
                Err(e) => {
                    tracing::error!("Error reading stdin: {}", e);
                    return Err(e.into());
                }
            }
        }

        Ok(())
    }

    /// Handle one frame; `None` means nothing should be written back
    pub fn process_frame(&self, frame: &str) -> Option<McpResponse> {
        let value: Value = match serde_json::from_str(frame) {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!("Unparseable frame: {}", e);
                return Some(McpResponse::error(
                    None,
                    error_codes::PARSE_ERROR,
                    format!("Parse error: {}", e),
                ));
            }
        };

        let id = value.get("id").cloned().filter(|v| !v.is_null());
        let request = match McpRequest::from_value(value) {
            Ok(request) => request,
            Err(e) => {
                tracing::warn!("Invalid request: {}", e);
                return Some(McpResponse::from_error(id, e));
            }
        };

        tracing::debug!("Handling {}", request.method);
        let notification = request.is_notification();
        let response = self.handler.handle_request(request);
        if notification {
            None
        } else {
            Some(response)
        }
    }
}

fn write_response<W: Write>(writer: &mut W, response: &McpResponse) -> Result<()> {
    let response_json = serde_json::to_string(response)?;
    writeln!(writer, "{}", response_json)?;
    writer.flush()?;
    Ok(())
}
