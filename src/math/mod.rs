//! Mathematical utilities for orientation handling

/// Quarter-turn rotation group and quaternion classification
pub mod rotation;
