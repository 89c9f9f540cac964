//! Professor allocation problem (PAP).
//!
//! Professors are assigned to disciplines, and each discipline is
//! scheduled in as many weekly periods as it requires. A solution is a set
//! of [`Assignment`]s, each covering one discipline; its value is the sum of
//! the professors' preferences for the periods they teach.
//!
//! Constraints:
//!
//! - one professor per discipline, teaching exactly `hd[d]` distinct periods
//! - a professor teaches only in periods where `rpt[p][t] > 0`, one class at a time
//! - at most `S` classes run in the same period
//! - a professor teaches at most `H` periods in total
//!
//! # Examples
//!
//! ```
//! use u_grasp::grasp::{GraspConfig, GraspRunner};
//! use u_grasp::pap::{Pap, PapInstance};
//!
//! let instance: PapInstance = "\
//! P: 2
//! D: 2
//! T: 2
//! S: 1
//! H: 2
//! hd:
//! 1
//! 1
//! apd:
//! 3 1
//! 1 2
//! rpt:
//! 1 1
//! 1 1
//! "
//! .parse()
//! .unwrap();
//!
//! let pap = Pap::new(instance);
//! let config = GraspConfig::default().with_max_iterations(10).with_seed(7);
//! let result = GraspRunner::run(&pap, &config);
//! assert_eq!(result.best_cost, 5.0);
//! ```

mod evaluator;
mod instance;

pub use evaluator::{Assignment, Pap};
pub use instance::{PapDimensions, PapInstance};
