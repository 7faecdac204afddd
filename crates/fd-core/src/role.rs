//! Worker role enum shared across the dispatch and worker crates.
//!
//! The role drives eligibility (some priority tags disqualify robotic
//! workers) and selection bias (human estimates carry a penalty factor when
//! robotic workers compete for the same task).

/// The kind of mobile worker executing transport tasks.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum WorkerRole {
    /// Autonomous vehicle (AGV, AMR).
    #[default]
    Robotic,
    /// Human operator with a tug or cart.
    Human,
}

impl WorkerRole {
    /// Human-readable label, useful for CSV column values and logs.
    pub fn as_str(self) -> &'static str {
        match self {
            WorkerRole::Robotic => "robotic",
            WorkerRole::Human   => "human",
        }
    }
}

impl std::fmt::Display for WorkerRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
