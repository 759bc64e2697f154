//! Diagnostic engine.
//!
//! Stands in for the native renderer/simulator behind the engine boundary:
//! a torsional needle anchored at the world origin, swung by acceleration and
//! stiffened by the strength parameter, drawn with one wgpu pipeline.

mod diagnostic;
mod marker;
mod needle;

pub use diagnostic::DiagnosticEngine;
