//! Kaplan-Meier survival estimation for right-censored time-to-event data.
//!
//! This crate provides the estimation core used by the remis tools:
//!
//! - **Validated samples**: Input records checked once, up front, with
//!   explicit errors instead of silent fallback curves
//! - **Product-limit curves**: Kaplan-Meier survival estimates that account
//!   for right-censored observations
//! - **Confidence bands**: Pointwise Greenwood intervals on the log-minus-log
//!   scale, bounded to `[0, 1]` by construction
//! - **Median survival**: Step-function median with an explicit marker when
//!   the curve never reaches 50%
//!
//! # Modules
//!
//! - [`sample`]: Event records and the validated [`sample::EventSample`]
//! - [`survival`]: The [`survival::SurvivalCurve`] product-limit estimator
//! - [`confidence`]: Confidence levels and pointwise bands
//! - [`median`]: Median survival resolution
//!
//! # Examples
//!
//! ## Fitting a survival curve
//!
//! ```
//! use remis_stats::{sample::EventSample, survival::SurvivalCurve};
//!
//! // (duration, event_observed); false marks a right-censored record
//! let sample = EventSample::from_pairs([
//!     (6.0, true),
//!     (9.0, false),
//!     (13.0, true),
//!     (17.0, false),
//! ])
//! .unwrap();
//!
//! let curve = SurvivalCurve::fit(&sample);
//! assert_eq!(curve.survival_at(0.0), 1.0);
//! assert_eq!(curve.survival_at(6.0), 0.75);
//! ```
//!
//! ## Attaching a confidence band
//!
//! ```
//! use remis_stats::{
//!     confidence::{ConfidenceBand, ConfidenceLevel},
//!     sample::EventSample,
//!     survival::SurvivalCurve,
//! };
//!
//! let sample = EventSample::from_pairs([(3.0, true), (8.0, true), (12.0, false)]).unwrap();
//! let curve = SurvivalCurve::fit(&sample);
//! let band = ConfidenceBand::from_curve(&curve, ConfidenceLevel::default());
//!
//! assert_eq!(band.intervals().len(), curve.points().len());
//! ```
//!
//! ## Resolving the median
//!
//! ```
//! use remis_stats::{median::MedianSurvival, sample::EventSample, survival::SurvivalCurve};
//!
//! let sample = EventSample::from_pairs([(2.0, true), (4.0, true), (9.0, false)]).unwrap();
//! let curve = SurvivalCurve::fit(&sample);
//!
//! match curve.median_survival() {
//!     MedianSurvival::Reached { time } => println!("median survival: {time}"),
//!     MedianSurvival::NotReached => println!("median survival not reached"),
//! }
//! ```

pub mod confidence;
pub mod median;
pub mod sample;
pub mod survival;
