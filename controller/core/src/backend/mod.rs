//! Text-Processing Backend
//!
//! Abstracted access to the remote text-processing endpoint through a
//! common trait, so the form client can be driven by HTTP in production and
//! by an in-process double in tests.
//!
//! # Usage
//!
//! ```ignore
//! use page_controller_core::backend::{HttpTextProcessor, TextProcessor};
//!
//! let processor = HttpTextProcessor::new(&config.endpoint)?;
//! let result = processor.process("hello").await?;
//! println!("{}", result.processed_text);
//! ```

mod http;
mod traits;

pub use http::HttpTextProcessor;
pub use traits::{
    EndpointStatus, ProcessRequest, ProcessedText, ProcessingError, TextProcessor,
};
