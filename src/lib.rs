//! Desktop dashboard over the 2015 Korea Welfare Panel Study extract.
//!
//! The data layer loads a raw survey file, normalizes its coded columns
//! into readable ones and joins job names from a codebook; the UI layer
//! renders mean-income summaries by sex, age and job with sidebar filters.

pub mod app;
pub mod color;
pub mod data;
pub mod state;
pub mod ui;
