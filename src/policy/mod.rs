//! Replacement policies.
//!
//! | Policy | Module  | Lists                                  |
//! |--------|---------|----------------------------------------|
//! | ARC    | [`arc`] | Recency, Frequency and their two ghosts |

pub mod arc;
