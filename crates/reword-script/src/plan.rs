//! Rewrite plans

use serde::{Deserialize, Serialize};

use crate::error::ScriptError;

/// Annotation used for commits whose message is blank
pub const EMPTY_SUMMARY: &str = "(empty message)";

/// One commit and the message it should end up with
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanEntry {
    /// Full commit SHA
    pub sha: String,
    /// Replacement message
    pub message: String,
}

impl PlanEntry {
    /// One-line annotation for script comments and todo lines
    ///
    /// The first non-blank line of the message, or [`EMPTY_SUMMARY`].
    #[must_use]
    pub fn summary(&self) -> &str {
        self.message
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .unwrap_or(EMPTY_SUMMARY)
    }
}

/// Ordered `(sha, message)` pairs, oldest commit first, no duplicate SHAs
///
/// Serialized as a JSON array of entries. Deserializing an array that
/// repeats a SHA fails.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<PlanEntry>", into = "Vec<PlanEntry>")]
pub struct RewritePlan {
    entries: Vec<PlanEntry>,
}

impl RewritePlan {
    /// Create an empty plan
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a plan from pairs, rejecting duplicates
    ///
    /// # Errors
    ///
    /// Returns `ScriptError::DuplicateSha` if a SHA appears twice.
    pub fn from_pairs<I, S, M>(pairs: I) -> Result<Self, ScriptError>
    where
        I: IntoIterator<Item = (S, M)>,
        S: Into<String>,
        M: Into<String>,
    {
        let mut plan = Self::new();
        for (sha, message) in pairs {
            plan.push(sha, message)?;
        }
        Ok(plan)
    }

    /// Append the next (newer) commit
    ///
    /// # Errors
    ///
    /// Returns `ScriptError::DuplicateSha` if the SHA is already planned.
    pub fn push(
        &mut self,
        sha: impl Into<String>,
        message: impl Into<String>,
    ) -> Result<(), ScriptError> {
        let sha = sha.into();
        if self.contains(&sha) {
            return Err(ScriptError::DuplicateSha { sha });
        }
        self.entries.push(PlanEntry {
            sha,
            message: message.into(),
        });
        Ok(())
    }

    /// Whether `sha` is already in the plan
    #[must_use]
    pub fn contains(&self, sha: &str) -> bool {
        self.entries.iter().any(|e| e.sha == sha)
    }

    /// Entries, oldest first
    #[must_use]
    pub fn entries(&self) -> &[PlanEntry] {
        &self.entries
    }

    /// Iterate over entries, oldest first
    pub fn iter(&self) -> std::slice::Iter<'_, PlanEntry> {
        self.entries.iter()
    }

    /// Number of commits in the plan
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the plan is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The oldest commit in the plan
    #[must_use]
    pub fn oldest(&self) -> Option<&PlanEntry> {
        self.entries.first()
    }

}

impl TryFrom<Vec<PlanEntry>> for RewritePlan {
    type Error = ScriptError;

    fn try_from(entries: Vec<PlanEntry>) -> Result<Self, Self::Error> {
        Self::from_pairs(entries.into_iter().map(|e| (e.sha, e.message)))
    }
}

impl From<RewritePlan> for Vec<PlanEntry> {
    fn from(plan: RewritePlan) -> Self {
        plan.entries
    }
}

impl<'a> IntoIterator for &'a RewritePlan {
    type Item = &'a PlanEntry;
    type IntoIter = std::slice::Iter<'a, PlanEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
