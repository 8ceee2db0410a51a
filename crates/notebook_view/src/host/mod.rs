//! Host-side collaborators consumed by the view core.
//!
//! These stand in for the capabilities a windowing host provides: markdown
//! rendering, output rendering, coalesced size observation, and measurement.

pub mod markdown;
pub mod measure;
pub mod observer;
pub mod outputs;

pub use markdown::{CommonMarkRenderer, MarkdownRenderer};
pub use measure::HeadlessMeasurer;
pub use observer::{NodeId, ResizeObserver, SizeChange, Subscription};
pub use outputs::{OutputElement, OutputRegistry, RenderedOutput};
