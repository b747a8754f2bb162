//! # Recipe Generator
//!
//! A recipe-generation backend that asks a generative model for recipes
//! constrained to a grocery catalog, then parses, cleans and optionally
//! verifies the model's ingredient references against that catalog.

pub mod api;
pub mod catalog_model;
pub mod catalog_store;
pub mod config;
pub mod context_builder;
pub mod errors;
pub mod generation;
pub mod prompt;
pub mod recipe_model;
pub mod recipe_service;
pub mod response_parser;
pub mod telemetry;
pub mod verifier;
