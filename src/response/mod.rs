//! Response Parsing - extract a think segment and a data payload from raw
//! chat output

mod parser;

pub use parser::{
    Data, ExtractionStrategy, ParseDiagnostic, ParsedResponse, extract_think, parse_response,
};
