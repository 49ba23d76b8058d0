//! Integration tests for the calcsweep engine
//!
//! Tests are organized by topic:
//! - `sweeps` - Enumeration order, row counts and skip mode
//! - `export_roundtrip` - Delimited files written by calculations and read back
//! - `root_finding` - Newton-Raphson termination guarantees
//! - `calculations` - Calculation lifecycle, file layout and plot context
