//! Edge case tests for mexc-par
