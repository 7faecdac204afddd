//! Dispatch configuration: eligibility rules, selection bias, and per-tag
//! timing adjustments.
//!
//! All tag rules use **first-substring-match**: rules are scanned in
//! configuration order and the first whose pattern occurs in the priority
//! tag wins.

use fd_worker::EtaAdjust;

/// Per-tag additions applied while estimating the raw ETA (a configuration
/// of the estimate, not of execution).
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TagAdjustRule {
    /// Substring matched against the priority tag.
    pub pattern: String,
    pub extra_mount_secs: f64,
    pub extra_unmount_secs: f64,
    pub travel_multiplier: f64,
}

/// Maps a tag pattern to the integer priority used for queue preemption.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TagPriorityRule {
    /// Substring matched against the priority tag.
    pub pattern: String,
    pub priority: i32,
}

/// Dispatcher configuration.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DispatchConfig {
    /// Tags that disqualify robotic workers when matched exactly.
    pub robotic_disallow_exact: Vec<String>,

    /// Substrings that disqualify robotic workers when contained in the tag
    /// (case-insensitive).
    pub robotic_disallow_substrings: Vec<String>,

    /// Multiplier (≥ 1) applied to human raw ETAs when robotic workers are
    /// in the candidate pool.  Biases ties toward robots without touching
    /// the ETA stored on the task.
    pub human_eta_penalty: f64,

    /// Optional scoring variant: per-tag timing adjustments folded into the
    /// raw-ETA computation.
    pub tag_adjustments: Vec<TagAdjustRule>,

    /// Tag → priority value rules; the fallback is the first unsigned
    /// integer embedded in the tag, else 0.
    pub tag_priorities: Vec<TagPriorityRule>,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            robotic_disallow_exact:      Vec::new(),
            robotic_disallow_substrings: Vec::new(),
            human_eta_penalty:           1.0,
            tag_adjustments:             Vec::new(),
            tag_priorities:              Vec::new(),
        }
    }
}

impl DispatchConfig {
    /// `true` when no disallow rule matches `tag` — robotic workers may
    /// compete for the task.
    pub fn robotic_compatible(&self, tag: &str) -> bool {
        if self.robotic_disallow_exact.iter().any(|t| t == tag) {
            return false;
        }
        let tag_lower = tag.to_lowercase();
        !self
            .robotic_disallow_substrings
            .iter()
            .any(|s| tag_lower.contains(&s.to_lowercase()))
    }

    /// The timing adjustment for `tag` — first matching rule, else neutral.
    pub fn adjustment_for(&self, tag: &str) -> EtaAdjust {
        self.tag_adjustments
            .iter()
            .find(|rule| tag.contains(&rule.pattern))
            .map(|rule| EtaAdjust {
                extra_mount_secs:   rule.extra_mount_secs,
                extra_unmount_secs: rule.extra_unmount_secs,
                travel_multiplier:  rule.travel_multiplier,
            })
            .unwrap_or(EtaAdjust::NONE)
    }

    /// The queue priority for `tag`.
    ///
    /// First matching priority rule wins; without one, the first unsigned
    /// integer embedded in the tag (`urgent-3` → 3), else 0.
    pub fn priority_for(&self, tag: &str) -> i32 {
        if let Some(rule) = self.tag_priorities.iter().find(|r| tag.contains(&r.pattern)) {
            return rule.priority;
        }
        embedded_int(tag).unwrap_or(0)
    }
}

/// First run of ASCII digits in `s`, parsed; `None` if there is none or it
/// overflows.
fn embedded_int(s: &str) -> Option<i32> {
    let start = s.find(|c: char| c.is_ascii_digit())?;
    let digits: &str = &s[start..];
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    digits[..end].parse().ok()
}
