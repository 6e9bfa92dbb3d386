//! Synthesis: staged schemas and operations → descriptors.

pub mod client;
pub mod operation;
pub mod schema;
pub mod support;

pub use client::{synthesize_client, synthesize_group};
pub use operation::synthesize_operation;
pub use schema::{collect_imports, synthesize_definition};
pub use support::synthesize_support;
