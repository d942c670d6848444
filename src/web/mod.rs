//! HTTP API for fragment matching.
//!
//! ## Starting the Server
//!
//! ```text
//! # Start on default port 8080 with the embedded sample corpus
//! fragment-matcher serve
//!
//! # Custom corpus, bind to all interfaces
//! fragment-matcher serve --corpus chapters.json --address 0.0.0.0
//! ```
//!
//! ## API Endpoints
//!
//! - `POST /api/search` - Score a sign annotation (`{"signs": "...", "min_signs": 2}`)
//! - `GET /api/corpus` - List the texts and chapters of the corpus
//! - `GET /healthz` - Liveness probe

pub mod server;
