#![warn(clippy::pedantic)]

pub mod json;
