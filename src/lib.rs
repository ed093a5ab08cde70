//! # docs-indexer
//!
//! Builds a hosted search index from a tree of documentation files.
//!
//! Every run walks the content root, turns each Markdown/MDX document into a
//! flattened search record, then replaces the remote index contents with the
//! fresh record set (clear, then bulk write).
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────┐   ┌─────────────┐   ┌────────────┐   ┌────────────┐   ┌──────────┐
//! │ Scanner │──▶│ Front matter│──▶│ Normalizer │──▶│ Synthesizer│──▶│   Sync   │
//! │ walkdir │   │ YAML / TOML │   │  md → text │   │ SearchRec. │   │ clear+put│
//! └─────────┘   └─────────────┘   └────────────┘   └────────────┘   └────┬─────┘
//!                                                                         ▼
//!                                                                 ┌──────────────┐
//!                                                                 │ Algolia REST │
//!                                                                 └──────────────┘
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration and index settings |
//! | [`error`] | Error taxonomy |
//! | [`models`] | Documents, records, snapshots |
//! | [`scanner`] | Content tree discovery |
//! | [`frontmatter`] | Front-matter / body split |
//! | [`normalize`] | Markdown to plain text |
//! | [`record`] | Search record synthesis |
//! | [`index`] | Remote index trait, Algolia and in-memory backends |
//! | [`sync`] | Full-replace synchronization |
//! | [`pipeline`] | End-to-end run |

pub mod config;
pub mod error;
pub mod frontmatter;
pub mod index;
pub mod models;
pub mod normalize;
pub mod pipeline;
pub mod record;
pub mod scanner;
pub mod sync;
