//! # sqsforge
//!
//! Parallel search engine for Special Quasirandom Structures (SQS) in
//! multicomponent alloys.
//!
//! Given a parent crystal structure, a target composition, and target
//! Warren-Cowley short-range-order parameters, this crate searches the space
//! of site-to-species assignments (either exhaustively or by random
//! sampling) for configurations whose SRO best matches the target, and
//! returns a ranked, deduplicated list of the best candidates found.
//!
//! ## Example
//!
//! ```
//! use sqsforge::lattice::Lattice;
//! use sqsforge::settings::{self, AllMarker, RawSettings, StructureInput, TargetObjectiveInput, WhichSelector};
//! use sqsforge::species::Species;
//! use sqsforge::structure::Structure;
//! use sqsforge::worker;
//! use indexmap::IndexMap;
//!
//! let structure = Structure::new(
//!     Lattice::cubic(4.12),
//!     vec![Species::from_symbol("Cs").unwrap(), Species::from_symbol("Cl").unwrap()],
//!     vec![[0.0, 0.0, 0.0], [0.5, 0.5, 0.5]],
//! );
//!
//! let mut composition = IndexMap::new();
//! composition.insert("Cs".to_string(), 1);
//! composition.insert("Cl".to_string(), 1);
//! let mut shell_weights = IndexMap::new();
//! shell_weights.insert(1, 1.0);
//!
//! let raw = RawSettings {
//!     structure: StructureInput::Native(structure),
//!     composition,
//!     which: WhichSelector::All(AllMarker::default()),
//!     target_objective: TargetObjectiveInput::Scalar(0.0),
//!     pair_weights: None,
//!     shell_weights: Some(shell_weights),
//!     iterations: None,
//!     max_output_configurations: Some(10),
//!     shell_distances: None,
//!     threads_per_rank: Some(vec![1]),
//!     atol: None,
//!     rtol: None,
//!     mode: Some("systematic".to_string()),
//!     seed: None,
//! };
//!
//! let settings = settings::validate(raw).unwrap();
//! let (results, _timings) = worker::pair_sqs_iteration(&settings);
//! // Exactly 2 distinct site-to-species assignments exist for one Cs and
//! // one Cl over 2 sites; exhaustive search finds both.
//! assert_eq!(results.len(), 2);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;

// Core types
pub mod composition;
pub mod element;
pub mod lattice;
pub mod species;
pub mod structure;

// Geometry and SRO search
pub mod cache;
pub mod generator;
pub mod objective;
pub mod pbc;
pub mod settings;
pub mod shells;
pub mod sro;
pub mod worker;

// Re-exports for convenience
pub use cache::SQSResult;
pub use error::{Result, SqsError};
pub use settings::IterationSettings;
pub use worker::pair_sqs_iteration;
