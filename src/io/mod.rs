//! I/O module: Survex 3D decoding and SVG output

pub mod survex;
pub mod svg;

pub use survex::{decode, decode_all, decode_bytes, decode_stream, NetworkDecoder, SurvexReader};
pub use svg::SvgWriter;
