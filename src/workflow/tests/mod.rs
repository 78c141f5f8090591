//! Unit tests for the workflow module.
//!
//! Tests are organised by concept: the status cycle, column ordering, the
//! blocking relation, domain validation, the in-memory adapter and the
//! service, including storage failure paths.
