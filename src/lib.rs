//! Loading of paired feature/label arrays and their division into train and test partitions.

#![deny(unsafe_code, rust_2018_idioms, rust_2021_compatibility)]
#![warn(missing_docs)]

pub mod dataset;
