//! In-app navigation
//!
//! ## L3 Molecular Layer
//! - `fetcher` - Document fetching boundary and its reqwest implementation
//! - `document` - Content container extraction
//! - `history` - Session history boundary and in-memory stack
//! - `links` - Link eligibility and binding
//!
//! ## L1 Page Layer
//! - `controller` - Transition state machine

// L3 Molecular Layer
pub mod document;
pub mod fetcher;
pub mod history;
pub mod links;

// L1 Page Layer
pub mod controller;

pub use controller::{NavigationOutcome, NavigationRequest, TransitionController, TransitionEvent};
pub use document::{parse_document, ParsedDocument};
pub use fetcher::{DocumentFetcher, FetchedDocument, HttpFetcher};
pub use history::{History, SessionHistory};
pub use links::LinkInterceptor;
