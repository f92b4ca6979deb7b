//! Map collaborator for Kor datasets.
//!
//! Takes a clean dataset, drops readings without a usable GPS fix and builds
//! a scatter-map figure that can be exported as GeoJSON.

mod error;
mod figure;
mod filter;

pub use error::{MapError, Result};
pub use figure::{
    DEFAULT_HEIGHT, DEFAULT_ZOOM, MAP_STYLE, MapFigure, MapLayout, MapPoint, SERIAL_PALETTE,
    build_map, hover_columns,
};
pub use filter::{is_plottable, valid_coordinates};
