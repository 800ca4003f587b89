//! Input and output for contractlens: PDF page extraction (lopdf) and the
//! JSON/CSV result sink.

mod error;
pub use error::SinkError;

mod pdf;
pub use pdf::PdfReader;

mod sink;
pub use sink::{ResultSink, SinkReport};
