//! Shared test utilities for speleodraw integration tests.
//!
//! Fixture files are generated in memory by [`builders::FixtureWriter`];
//! the helpers here decode and project them with panicking error messages.

#![allow(dead_code)]

pub mod builders;

use speleodraw::drawing::{assemble, DrawPrimitive, DrawingOptions, NameFilter};
use speleodraw::projection::{project, Projection, ProjectionParams};
use speleodraw::{decode_bytes, Network};

// ===========================================================================
// Version constants
// ===========================================================================

/// Every format version the decoder accepts.
pub const ALL_VERSIONS: [u32; 6] = [3, 4, 5, 6, 7, 8];

// ===========================================================================
// Pipeline helpers
// ===========================================================================

/// Decode a fixture, panicking on failure.
pub fn decode_fixture(data: &[u8]) -> Network {
    decode_bytes(data).unwrap_or_else(|e| panic!("Failed to decode fixture: {e}"))
}

pub fn project_with(network: &Network, params: &ProjectionParams) -> Projection {
    project(network, params).unwrap_or_else(|e| panic!("Failed to project: {e}"))
}

/// Decode, project with `params` and assemble with `options`.
pub fn draw(
    data: &[u8],
    params: &ProjectionParams,
    filter: &NameFilter,
    options: &DrawingOptions,
) -> Vec<DrawPrimitive> {
    let network = decode_fixture(data);
    let projection = project_with(&network, params);
    assemble(&network, &projection, filter, options)
        .unwrap_or_else(|e| panic!("Failed to assemble: {e}"))
}

// ===========================================================================
// Assertions
// ===========================================================================

pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}
