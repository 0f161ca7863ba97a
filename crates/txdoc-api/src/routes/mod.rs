//! # API Route Modules
//!
//! | Prefix | Module | Domain |
//! |--------|--------|--------|
//! | `/v1/compliance-records/*` | [`records`] | Record lifecycle and associations |
//! | `/v1/organizations/*` | [`organizations`] | Records by organization |

pub mod organizations;
pub mod records;
