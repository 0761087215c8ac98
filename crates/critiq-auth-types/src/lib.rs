//! Auth types shared across the workspace.
//!
//! Provides JWT issuance/validation and the `Identity` bearer-token extractor.

pub mod identity;
pub mod token;
