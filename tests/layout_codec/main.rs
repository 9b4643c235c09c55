//! Workspace test suite for the layout codec
//!
//! One module per area, all exercising the crate through the `walvault`
//! facade the way a consuming backup tool would.

mod common;

mod decode;
mod interval_set;
mod round_trip;
mod segment_ordering;
