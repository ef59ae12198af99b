// crates/couch/src/field.rs

use filter::Selector;

/// A well-known field of a stored document.
///
/// Search code builds comparison leaves from these instead of spelling out
/// raw path strings at every call site.
pub trait DbField {
    /// Path segments inside the stored JSON document.
    fn path(&self) -> &'static [&'static str];

    /// Dot-joined name as CouchDB addresses the field.
    fn db_name(&self) -> String {
        self.path().join(".")
    }

    /// Typed selector for building filter expressions.
    fn selector(&self) -> Selector {
        Selector::new(self.path().iter().copied()).expect("field paths have at least one segment")
    }
}

/// Bookkeeping fields CouchDB maintains on every stored document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CouchDbField {
    Type,
    Revision,
    Id,
}

impl DbField for CouchDbField {
    fn path(&self) -> &'static [&'static str] {
        match self {
            Self::Type => &["type"],
            Self::Revision => &["_rev"],
            Self::Id => &["_id"],
        }
    }
}

/// CSAF document fields exposed for advisory searches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvisorySearchField {
    Document,
    DocumentTitle,
    DocumentTrackingId,
    DocumentTrackingVersion,
    DocumentTrackingStatus,
    DocumentTrackingGeneratorEngineName,
    DocumentTrackingGeneratorEngineVersion,
    DocumentTrackingCurrentReleaseDate,
    DocumentTrackingInitialReleaseDate,
}

impl DbField for AdvisorySearchField {
    fn path(&self) -> &'static [&'static str] {
        match self {
            Self::Document => &["csaf", "document"],
            Self::DocumentTitle => &["csaf", "document", "title"],
            Self::DocumentTrackingId => &["csaf", "document", "tracking", "id"],
            Self::DocumentTrackingVersion => &["csaf", "document", "tracking", "version"],
            Self::DocumentTrackingStatus => &["csaf", "document", "tracking", "status"],
            Self::DocumentTrackingGeneratorEngineName => {
                &["csaf", "document", "tracking", "generator", "engine", "name"]
            }
            Self::DocumentTrackingGeneratorEngineVersion => {
                &["csaf", "document", "tracking", "generator", "engine", "version"]
            }
            Self::DocumentTrackingCurrentReleaseDate => {
                &["csaf", "document", "tracking", "current_release_date"]
            }
            Self::DocumentTrackingInitialReleaseDate => {
                &["csaf", "document", "tracking", "initial_release_date"]
            }
        }
    }
}

/// Object types stored in the advisory database, discriminated by the
/// top-level `type` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectType {
    Advisory,
    AdvisoryVersion,
    AuditTrailDocument,
    AuditTrailWorkflow,
    Comment,
    CommentAuditTrail,
    Counter,
}

impl ObjectType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Advisory => "Advisory",
            Self::AdvisoryVersion => "AdvisoryVersion",
            Self::AuditTrailDocument => "AuditTrailDocument",
            Self::AuditTrailWorkflow => "AuditTrailWorkflow",
            Self::Comment => "Comment",
            Self::CommentAuditTrail => "CommentAuditTrail",
            Self::Counter => "Counter",
        }
    }
}
