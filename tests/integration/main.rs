//! Integration tests for Link-Sonar
//!
//! These tests use wiremock to stand up mock sites and exercise sitemap
//! discovery, link checking and full jobs end-to-end.

mod checker_tests;
mod common;
mod job_tests;
mod sitemap_tests;
