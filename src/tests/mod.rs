//! Application-level test suite.
//!
//! Covers the tide properties the clock must hold over long runs, the
//! reference entry flow end to end, and command line parsing.
