//! Shared UI primitives.
//!
//! - name-addressable screens (`screen`)
//! - the fill image and slider widgets those screens drive (`widgets`)
pub mod screen;
pub mod widgets;
