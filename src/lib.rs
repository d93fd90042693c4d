//! # speleodraw
//!
//! A pure Rust library for turning Survex `.3d` cave survey files into 2D
//! vector drawings.
//!
//! The pipeline has three stages, each taking an immutable view of the
//! previous one:
//!
//! 1. **Decode**: a 3D file (format versions 3 to 8) becomes a [`Network`] of
//!    stations, legs, cross-sections and a survey tree.
//! 2. **Project**: stations are placed on the page in plan, elevation or
//!    extended (unrolled) view at a chosen bearing and scale.
//! 3. **Assemble**: the projected network becomes an ordered list of
//!    [`DrawPrimitive`]s (polylines, markers, labels, scale bar) ready for a
//!    vector-graphics writer such as [`SvgWriter`].
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use speleodraw::{assemble, decode_bytes, project, DrawingOptions, NameFilter};
//! use speleodraw::{ProjectionParams, SvgWriter, View};
//!
//! let network = decode_bytes(&std::fs::read("cave.3d")?)?;
//! let projection = project(&network, &ProjectionParams::new(View::Plan).with_bearing(30.0))?;
//! let primitives = assemble(&network, &projection, &NameFilter::new(), &DrawingOptions::default())?;
//!
//! SvgWriter::new(std::fs::File::create("cave.svg")?).write(&primitives)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! Non-fatal decode issues (skipped items, trailing bytes) are reported in
//! [`Network::notifications`].

#![allow(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod drawing;
pub mod error;
pub mod io;
pub mod network;
pub mod notification;
pub mod projection;
pub mod types;

// Re-export commonly used types
pub use error::{FormatError, Result};
pub use notification::{Notification, NotificationCollection, NotificationType};
pub use types::{BoundingBox2D, BoundingBox3D, Vector2, Vector3};

// Re-export the network model
pub use network::{CrossSection, Leg, LegFlags, Network, NetworkBuilder, Station, StationFlags};

// Re-export the pipeline stages
pub use drawing::{assemble, DrawPrimitive, DrawingOptions, LabelPolicy, MarkerScheme, NameFilter, SurveyHandling};
pub use io::survex::{decode, decode_all, decode_bytes, decode_stream, DecoderConfiguration, FormatVersion};
pub use io::svg::SvgWriter;
pub use projection::{project, Projection, ProjectionParams, Scale, View};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
