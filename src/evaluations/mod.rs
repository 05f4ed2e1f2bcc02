//! Evaluation distributor.
//!
//! Bulk files (one paper or leaderboard, many languages) are fanned out into
//! each language's `benchmarks.yaml`, rebuilt from scratch on every run. At
//! render time the auto-distributed entries are merged with the language's
//! `manual_evaluations.yaml`, where manual results win on the same
//! (model, test set) key.

mod distribute;
mod merge;

pub use distribute::{
    distribute, load_bulk_files, run_distribute, tracked_languages, write_distribution, Distribution,
};
pub use merge::{merge, merge_all, BenchmarkTable, MergedRow, Origin, TableRow, EMPTY_CELL};
