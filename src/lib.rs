//! G25 genetic-distance engine: panel parsing, nearest-population ranking,
//! sample projection onto map points, and the color encodings used to draw them.

pub mod color;
pub mod config;
pub mod geo;
pub mod parser;
pub mod search;
pub mod vector_entry;
pub mod vector_ops;

pub use color::{distance_to_color, haplogroup_color, Hsl};
pub use geo::{
    annotate_distances, project, project_counted, FeatureCollection, GeoFeature, SampleRecord,
};
pub use parser::{parse, parse_g25_vector, parse_vector};
pub use search::{compare_all, plot, Distance, DistanceMatch, PanelLimits, PlotView, TargetResult};
pub use vector_entry::LabeledVector;
