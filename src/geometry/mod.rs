//! Page geometry.
//!
//! Sizes are in PDF points (1/72 inch) with the origin at the bottom-left
//! corner of the page.

use serde::{Deserialize, Serialize};

/// Paper size of a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageSize {
    /// ISO A3, 297 x 420 mm
    A3,
    /// ISO A4, 210 x 297 mm
    #[default]
    A4,
    /// ISO A5, 148 x 210 mm
    A5,
    /// US Letter, 8.5 x 11 in
    Letter,
    /// US Legal, 8.5 x 14 in
    Legal,
    /// Explicit portrait dimensions in points
    Custom {
        /// Width in points
        width: i32,
        /// Height in points
        height: i32,
    },
}

impl PageSize {
    /// Portrait `(width, height)` in points.
    pub fn dimensions(&self) -> (i32, i32) {
        match *self {
            PageSize::A3 => (842, 1190),
            PageSize::A4 => (595, 842),
            PageSize::A5 => (420, 595),
            PageSize::Letter => (612, 792),
            PageSize::Legal => (612, 1008),
            PageSize::Custom { width, height } => (width, height),
        }
    }
}

/// Page orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// Height is the long side
    #[default]
    Portrait,
    /// Width is the long side
    Landscape,
}

/// Oriented page dimensions `(width, height)`.
pub fn page_dimensions(size: PageSize, orientation: Orientation) -> (i32, i32) {
    let (w, h) = size.dimensions();
    match orientation {
        Orientation::Portrait => (w, h),
        Orientation::Landscape => (h, w),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_sizes() {
        assert_eq!(PageSize::A4.dimensions(), (595, 842));
        assert_eq!(PageSize::Letter.dimensions(), (612, 792));
        assert_eq!(PageSize::default(), PageSize::A4);
    }

    #[test]
    fn test_landscape_swaps_dimensions() {
        assert_eq!(page_dimensions(PageSize::A5, Orientation::Landscape), (595, 420));
        assert_eq!(page_dimensions(PageSize::A3, Orientation::Portrait), (842, 1190));
    }

    #[test]
    fn test_custom_size_from_json() {
        let size: PageSize = serde_json::from_str(r#"{"custom":{"width":300,"height":400}}"#).unwrap();
        assert_eq!(size.dimensions(), (300, 400));
        let size: PageSize = serde_json::from_str(r#""legal""#).unwrap();
        assert_eq!(size, PageSize::Legal);
    }
}
