//! Integration tests for group menu grafting

mod anchors;
mod links;
mod persistence;
mod properties;
mod scenario;
mod support;
