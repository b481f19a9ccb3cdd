//! # Distance Server
//!
//! Distance metrics between numeric vectors and chart rendering for point sets.
//!
//! This library provides:
//! - Euclidean, Manhattan, Cosine, Hamming and Jaccard distances
//! - Single-pair and all-pairs (batch) computation
//! - Scatter, heatmap, network, histogram and line charts as PNG images
//! - JSON response encoding and result export
//! - An HTTP API server
//!
//! ## Example
//!
//! ```rust
//! use distance_server::{DistanceEngine, DistanceType, Point};
//!
//! let engine = DistanceEngine::default();
//!
//! let a = Point::new(vec![1.0, 0.0, 1.0]);
//! let b = Point::new(vec![1.0, 1.0, 1.0]);
//! let d = engine.compute(&a, &b, DistanceType::Hamming).unwrap();
//! assert_eq!(d, 1.0);
//!
//! let matrix = engine
//!     .compute_batch(&[a, b], DistanceType::Euclidean)
//!     .unwrap();
//! assert_eq!(matrix.get(0, 1), Some(1.0));
//! ```

pub mod chart;
pub mod config;
pub mod distance;
pub mod encode;
pub mod engine;
pub mod error;
pub mod export;
pub mod point;
pub mod server;
pub mod validate;

pub use chart::{ChartSpec, ChartType, RenderedChart, Renderer, Scene, Style};
pub use config::{EngineConfig, RenderConfig};
pub use distance::DistanceType;
pub use engine::{DistanceEngine, DistanceMatrix};
pub use error::{AnalysisError, Result};
pub use point::Point;
