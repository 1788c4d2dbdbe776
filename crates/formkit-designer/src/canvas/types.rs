//! Canvas type definitions: Alignment, DistributeDirection.

use serde::{Deserialize, Serialize};

/// Edge or center to align a group of elements against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    Left,
    Center,
    Right,
    Top,
    Middle,
    Bottom,
}

/// Axis along which to distribute a group of elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistributeDirection {
    Horizontal,
    Vertical,
}
